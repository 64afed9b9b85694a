use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoloError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid volume shape {shape:?}: {reason}")]
    InvalidVolumeShape { shape: Vec<usize>, reason: String },

    #[error("Invalid background image: {0}")]
    InvalidBackground(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, HoloError>;
