//! Pipeline module - track generation for a draft genome

pub mod plot;
pub mod summary;

pub use plot::{build_tracks, run, write_tracks, TrackConfig, TrackSet};
pub use summary::{write_summary, ContigCoverage, RunSummary};
