pub mod clean;
pub mod config;
pub mod linker;
pub mod types;

pub use clean::{clean_track, contiguous_repeats, relink_track};
pub use config::LinkerConfig;
pub use linker::{link, link_with_summary, LinkSummary};
pub use types::{tracks_from_records, Track, TrackPoint, TrackRecord, TrackState};
