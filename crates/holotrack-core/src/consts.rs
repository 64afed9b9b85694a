/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum plane count to propagate defocus planes in parallel.
pub const PARALLEL_PLANE_THRESHOLD: usize = 4;

/// Minimum active track count to evaluate track matches in parallel.
pub const PARALLEL_TRACK_THRESHOLD: usize = 64;

/// Refractive index of water.
pub const DEFAULT_REFRACTIVE_INDEX: f64 = 1.3226;

/// Illumination wavelength in micrometres (HeNe red line as recorded).
pub const DEFAULT_WAVELENGTH_UM: f64 = 0.642;

/// Sensor sampling frequency in pixels per micrometre at 10x magnification.
pub const DEFAULT_SAMPLING_FREQUENCY: f64 = 0.711;

/// Distance between consecutive defocus planes, in micrometres.
pub const DEFAULT_STEP_SIZE: f64 = 10.0;

/// Number of defocus planes in a reconstruction volume.
pub const DEFAULT_NUM_STEPS: usize = 150;

/// Default objective magnification.
pub const DEFAULT_MAGNIFICATION: f64 = 10.0;

/// Number of frames sampled for the median background.
pub const DEFAULT_BACKGROUND_SAMPLES: usize = 20;

/// Small bandpass cutoff radius in pixels.
pub const DEFAULT_BANDPASS_SMALL: f64 = 2.0;

/// Large bandpass cutoff radius in pixels.
pub const DEFAULT_BANDPASS_LARGE: f64 = 30.0;

/// Window size of the optional median pre-filter.
pub const DEFAULT_PRE_FILTER_SIZE: usize = 3;

/// Minimum separation between 2D peaks in the depth-max projection.
pub const DEFAULT_PEAK_MIN_DISTANCE: usize = 30;

/// Search sphere radius for linking, in detection units.
pub const DEFAULT_SEARCH_RADIUS: f64 = 15.0;

/// Maximum number of consecutive missed frames a track tolerates.
pub const DEFAULT_FRAME_SKIP: usize = 10;

/// Minimum number of points for a track to be emitted.
pub const DEFAULT_MIN_TRACK_LENGTH: usize = 50;

/// Half-width (in planes) of the depth window used for sub-voxel refinement.
pub const REFINE_HALF_WINDOW: usize = 2;

/// Number of samples used to resample the fitted depth parabola.
pub const REFINE_RESAMPLE_COUNT: usize = 401;

/// Fewest points a quadratic depth fit accepts.
pub const MIN_REFINE_POINTS: usize = 4;

/// Spatial weights of the depth-gradient kernel (Sobel-type smoothing).
pub const Z_GRADIENT_WEIGHTS: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];
