use ndarray::Array2;

/// A single grayscale hologram frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f32>, frame_index: usize, timestamp: f64) -> Self {
        Self {
            data,
            metadata: FrameMetadata {
                frame_index,
                timestamp,
            },
        }
    }

    /// Frame whose timestamp is its index divided by the acquisition rate.
    pub fn at_rate(data: Array2<f32>, frame_index: usize, fps: f64) -> Self {
        let timestamp = if fps > 0.0 {
            frame_index as f64 / fps
        } else {
            frame_index as f64
        };
        Self::new(data, frame_index, timestamp)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn index(&self) -> usize {
        self.metadata.frame_index
    }

    pub fn timestamp(&self) -> f64 {
        self.metadata.timestamp
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    pub frame_index: usize,
    /// Acquisition time in seconds.
    pub timestamp: f64,
}
