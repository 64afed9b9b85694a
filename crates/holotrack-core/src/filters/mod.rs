pub mod bandpass;
pub mod median;

pub use bandpass::{bandpass_filter, bandpass_mask, BandpassCache};
pub use median::median_filter;
