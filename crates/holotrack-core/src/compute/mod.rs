pub mod fft;

pub use fft::{fft2d, fft2d_real, fftshift, ifft2d, ifftshift};
