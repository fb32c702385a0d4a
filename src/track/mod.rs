//! Track builders: karyotype layout, windowed GC/coverage deviation, and
//! rRNA/tRNA position markers.

pub mod coverage;
pub mod features;
pub mod gc;
pub mod karyotype;
pub mod window;

pub use coverage::{coverage_track, CoverageTrack, CoverageWindows};
pub use features::{build_feature_tracks, CdsTally, FeaturePoint, FeatureTrackBuilder, FeatureTracks};
pub use gc::{gc_track, mean_gc, GcTrack};
pub use karyotype::{GenomeStats, Karyotype, KaryotypeBuilder, LayoutSegment, RankPolicy, SegmentKind};
pub use window::{WindowBounds, WindowedPoint};
