use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::PARALLEL_TRACK_THRESHOLD;
use crate::detection::{Detection, FrameDetections};
use crate::error::{HoloError, Result};

use super::clean::clean_track;
use super::config::LinkerConfig;
use super::types::{Track, TrackPoint, TrackState};

/// Counts gathered while linking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub frames_processed: usize,
    pub tracks_started: usize,
    pub tracks_terminated: usize,
    pub tracks_accepted: usize,
    pub tracks_discarded: usize,
}

struct LiveTrack {
    track: Track,
    last: [f64; 3],
    misses: usize,
    state: TrackState,
}

impl LiveTrack {
    fn start(particle: usize, point: TrackPoint) -> Self {
        Self {
            last: point.position(),
            track: Track::with_points(particle, vec![point]),
            misses: 0,
            state: TrackState::Growing,
        }
    }
}

/// Link per-frame detections into tracks.
///
/// See [`link_with_summary`].
pub fn link(frames: &[FrameDetections], config: &LinkerConfig) -> Result<Vec<Track>> {
    link_with_summary(frames, config).map(|(tracks, _)| tracks)
}

/// Search-sphere linking over frames in increasing index order.
///
/// Every growing track takes the nearest detection of each frame (first in
/// detection order on ties) when it lies within `search_radius`; tracks are
/// matched independently and may share a detection. A track missing more
/// than `frame_skip` consecutive frames terminates. Detections no track
/// claimed start new tracks. Frame indices absent from the input count as
/// empty frames while any track is growing; stretches with no growing track
/// are skipped.
///
/// Finished tracks are cleaned, filtered to `min_track_length` and returned
/// sorted by particle id.
pub fn link_with_summary(
    frames: &[FrameDetections],
    config: &LinkerConfig,
) -> Result<(Vec<Track>, LinkSummary)> {
    config.validate()?;

    let mut by_index: BTreeMap<usize, &FrameDetections> = BTreeMap::new();
    for frame in frames {
        if by_index.insert(frame.frame_index, frame).is_some() {
            return Err(HoloError::InvalidConfig(format!(
                "duplicate frame index {} in detections",
                frame.frame_index
            )));
        }
    }

    let mut summary = LinkSummary::default();
    let (Some(&first), Some(&last)) = (by_index.keys().next(), by_index.keys().next_back()) else {
        return Ok((Vec::new(), summary));
    };

    let mut live: Vec<LiveTrack> = Vec::new();
    let mut finished: Vec<Track> = Vec::new();
    let mut next_particle = 0usize;

    let mut cursor = Some(first);
    while let Some(index) = cursor {
        let (timestamp, detections): (f64, &[Detection]) = match by_index.get(&index) {
            Some(f) => (f.timestamp, f.detections.as_slice()),
            None => (0.0, &[]),
        };

        let matches = match_tracks(&live, detections);
        let mut claimed = vec![false; detections.len()];

        for (entry, matched) in live.iter_mut().zip(matches) {
            match matched {
                Some((i, dist)) if dist <= config.search_radius => {
                    let point = TrackPoint::new(detections[i], timestamp);
                    entry.last = point.position();
                    entry.track.push(point);
                    entry.misses = 0;
                    claimed[i] = true;
                }
                _ => {
                    entry.misses += 1;
                    if entry.misses > config.frame_skip {
                        entry.state = TrackState::Terminated;
                    }
                }
            }
        }

        let (growing, done): (Vec<LiveTrack>, Vec<LiveTrack>) = live
            .into_iter()
            .partition(|t| t.state == TrackState::Growing);
        summary.tracks_terminated += done.len();
        finished.extend(done.into_iter().map(|t| t.track));
        live = growing;

        for (detection, _) in detections.iter().zip(&claimed).filter(|&(_, &c)| !c) {
            live.push(LiveTrack::start(
                next_particle,
                TrackPoint::new(*detection, timestamp),
            ));
            next_particle += 1;
            summary.tracks_started += 1;
        }
        summary.frames_processed += 1;

        cursor = if index == last {
            None
        } else if live.is_empty() {
            // Nothing can miss an absent frame; resume at the next recorded one.
            by_index.range(index + 1..).next().map(|(&i, _)| i)
        } else {
            Some(index + 1)
        };
    }

    finished.extend(live.into_iter().map(|t| t.track));

    let mut tracks = Vec::new();
    for track in finished {
        let cleaned = clean_track(&track);
        let state = if cleaned.len() >= config.min_track_length {
            TrackState::Accepted
        } else {
            TrackState::DiscardedTooShort
        };
        debug!(particle = cleaned.particle, len = cleaned.len(), %state, "Track finished");
        match state {
            TrackState::Accepted => {
                summary.tracks_accepted += 1;
                tracks.push(cleaned);
            }
            _ => summary.tracks_discarded += 1,
        }
    }
    tracks.sort_by_key(|t| t.particle);

    info!(
        frames = summary.frames_processed,
        started = summary.tracks_started,
        accepted = summary.tracks_accepted,
        discarded = summary.tracks_discarded,
        "Linked tracks"
    );
    Ok((tracks, summary))
}

/// Nearest detection index and distance for every live track.
fn match_tracks(live: &[LiveTrack], detections: &[Detection]) -> Vec<Option<(usize, f64)>> {
    let nearest = |entry: &LiveTrack| -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, d) in detections.iter().enumerate() {
            let dist = d.distance_to(entry.last);
            if best.map_or(true, |(_, bd)| dist < bd) {
                best = Some((i, dist));
            }
        }
        best
    };

    if live.len() >= PARALLEL_TRACK_THRESHOLD {
        live.par_iter().map(nearest).collect()
    } else {
        live.iter().map(nearest).collect()
    }
}
