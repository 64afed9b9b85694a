use super::types::{Track, TrackPoint};

/// Length of the run of equal values each position belongs to.
///
/// `[0, 0, 0, 1, 2, 2]` gives `[3, 3, 3, 1, 2, 2]`.
pub fn contiguous_repeats<T: PartialEq>(seq: &[T]) -> Vec<usize> {
    let mut out = Vec::with_capacity(seq.len());
    let mut start = 0;
    while start < seq.len() {
        let mut end = start + 1;
        while end < seq.len() && seq[end] == seq[start] {
            end += 1;
        }
        out.extend(std::iter::repeat(end - start).take(end - start));
        start = end;
    }
    out
}

/// Drop same-frame duplicates from a track.
///
/// Within each run of points sharing a frame index the one nearest the
/// previously kept point survives (first on ties). A run at the start of
/// the track keeps its first point.
pub fn clean_track(track: &Track) -> Track {
    let mut kept: Vec<TrackPoint> = Vec::with_capacity(track.len());
    for run in frame_runs(&track.points) {
        let chosen = match kept.last() {
            None => run[0],
            Some(prev) => nearest(run, prev.position()).unwrap_or(run[0]),
        };
        kept.push(chosen);
    }
    Track::with_points(track.particle, kept)
}

/// Re-walk a track with duplicates using its own points as candidates.
///
/// Each candidate of the first frame seeds a search-sphere walk over the
/// later frames of the track; the longest walk is kept (earliest seed on
/// ties). Tracks without same-frame duplicates come back unchanged.
pub fn relink_track(track: &Track, search_radius: f64, frame_skip: usize) -> Track {
    if contiguous_repeats(&track.frames()).iter().all(|&n| n == 1) {
        return track.clone();
    }

    let runs = frame_runs(&track.points);
    let Some((seeds, rest)) = runs.split_first() else {
        return track.clone();
    };

    let mut best: Vec<TrackPoint> = Vec::new();
    for seed in seeds.iter() {
        let mut walk = vec![*seed];
        let mut last = *seed;
        for run in rest {
            let gap = run[0].frame().saturating_sub(last.frame() + 1);
            if gap > frame_skip {
                break;
            }
            if let Some(next) = nearest(run, last.position()) {
                if next.detection.distance_to(last.position()) <= search_radius {
                    walk.push(next);
                    last = next;
                }
            }
        }
        if walk.len() > best.len() {
            best = walk;
        }
    }
    Track::with_points(track.particle, best)
}

fn frame_runs(points: &[TrackPoint]) -> Vec<&[TrackPoint]> {
    let lengths = contiguous_repeats(&points.iter().map(TrackPoint::frame).collect::<Vec<_>>());
    let mut runs = Vec::new();
    let mut start = 0;
    while start < points.len() {
        let end = start + lengths[start];
        runs.push(&points[start..end]);
        start = end;
    }
    runs
}

fn nearest(candidates: &[TrackPoint], from: [f64; 3]) -> Option<TrackPoint> {
    let mut best: Option<(f64, TrackPoint)> = None;
    for &c in candidates {
        let d = c.detection.distance_to(from);
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, c));
        }
    }
    best.map(|(_, c)| c)
}
