pub mod image_io;

pub use image_io::{
    load_frame_sequence, load_image, normalize_to_unit, save_image, save_unit_tiff,
};
