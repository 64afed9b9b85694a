use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::propagate::OpticsConfig;

/// Lifecycle of a track during and after linking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackState {
    /// Still accepting points.
    Growing,
    /// Missed more than `frame_skip` consecutive frames.
    Terminated,
    /// Kept after cleaning and length filtering.
    Accepted,
    /// Dropped for being shorter than `min_track_length`.
    DiscardedTooShort,
}

impl std::fmt::Display for TrackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Growing => write!(f, "growing"),
            Self::Terminated => write!(f, "terminated"),
            Self::Accepted => write!(f, "accepted"),
            Self::DiscardedTooShort => write!(f, "discarded (too short)"),
        }
    }
}

/// A detection together with the timestamp of its frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub detection: Detection,
    /// Frame time in seconds.
    pub time: f64,
}

impl TrackPoint {
    pub fn new(detection: Detection, time: f64) -> Self {
        Self { detection, time }
    }

    pub fn frame(&self) -> usize {
        self.detection.frame
    }

    pub fn position(&self) -> [f64; 3] {
        self.detection.position()
    }
}

/// One particle's trajectory, points ordered by frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub particle: usize,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(particle: usize) -> Self {
        Self {
            particle,
            points: Vec::new(),
        }
    }

    pub fn with_points(particle: usize, points: Vec<TrackPoint>) -> Self {
        Self { particle, points }
    }

    pub fn push(&mut self, point: TrackPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_frame(&self) -> Option<usize> {
        self.points.first().map(TrackPoint::frame)
    }

    pub fn last_frame(&self) -> Option<usize> {
        self.points.last().map(TrackPoint::frame)
    }

    pub fn frames(&self) -> Vec<usize> {
        self.points.iter().map(TrackPoint::frame).collect()
    }

    /// Flatten into table rows.
    pub fn records(&self) -> Vec<TrackRecord> {
        self.points
            .iter()
            .map(|p| TrackRecord {
                x: p.detection.x,
                y: p.detection.y,
                z: p.detection.z,
                time: p.time,
                frame: p.detection.frame,
                particle: self.particle,
            })
            .collect()
    }
}

/// Flat row of a track table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub time: f64,
    pub frame: usize,
    pub particle: usize,
}

impl TrackRecord {
    /// Same row with the position in micrometres.
    pub fn to_physical(&self, optics: &OpticsConfig) -> Self {
        let [x, y, z] = optics.to_physical([self.x, self.y, self.z]);
        Self { x, y, z, ..*self }
    }
}

/// Group table rows back into tracks.
///
/// Tracks appear in order of their first row; points keep row order.
/// Intensity values are not part of a row and come back as zero.
pub fn tracks_from_records(records: &[TrackRecord]) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();
    for r in records {
        let point = TrackPoint::new(
            Detection {
                frame: r.frame,
                x: r.x,
                y: r.y,
                z: r.z,
                refined: true,
                reconstruction_value: 0.0,
                focus_value: 0.0,
            },
            r.time,
        );
        match tracks.iter_mut().find(|t| t.particle == r.particle) {
            Some(track) => track.push(point),
            None => tracks.push(Track::with_points(r.particle, vec![point])),
        }
    }
    tracks
}
