use serde::{Deserialize, Serialize};

use crate::propagate::OpticsConfig;

/// One localized particle in one frame.
///
/// `x` is the column and `y` the row of the 2D peak; `z` is the
/// (possibly fractional) defocus plane index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub frame: usize,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// False when sub-plane refinement had too few samples and `z` is the
    /// coarse plane.
    pub refined: bool,
    /// Reconstructed intensity at the nearest voxel.
    pub reconstruction_value: f32,
    /// Focus-metric value at the nearest voxel.
    pub focus_value: f32,
}

impl Detection {
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance_to(&self, position: [f64; 3]) -> f64 {
        let dx = self.x - position[0];
        let dy = self.y - position[1];
        let dz = self.z - position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Convert pixel/plane coordinates to micrometres.
    pub fn to_physical(&self, optics: &OpticsConfig) -> Self {
        let [x, y, z] = optics.to_physical(self.position());
        Self { x, y, z, ..*self }
    }
}

/// All detections of one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDetections {
    pub frame_index: usize,
    /// Acquisition time in seconds.
    pub timestamp: f64,
    pub detections: Vec<Detection>,
}

impl FrameDetections {
    pub fn new(frame_index: usize, timestamp: f64, detections: Vec<Detection>) -> Self {
        Self {
            frame_index,
            timestamp,
            detections,
        }
    }

    pub fn to_physical(&self, optics: &OpticsConfig) -> Self {
        Self {
            frame_index: self.frame_index,
            timestamp: self.timestamp,
            detections: self
                .detections
                .iter()
                .map(|d| d.to_physical(optics))
                .collect(),
        }
    }
}
