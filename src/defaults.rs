//! Default parameters shared by the CLI and the library.

/// Contigs shorter than this are folded into the "other" karyotype segment.
pub const MIN_CONTIG_LEN: usize = 1;

/// Maximum number of contigs drawn individually (longest first).
pub const MAX_CONTIGS: usize = 10_000;

pub const GC_WINDOW_SIZE: usize = 1000;
pub const COV_WINDOW_SIZE: usize = 1000;

pub const COMPLETENESS: f64 = 100.0;

/// Products counted as hypothetical proteins when tallying CDS features.
pub const HYPOTHETICAL_PROTEINS: &[&str] = &["hypothetical protein"];

/// Name of the directory, inside the output directory, holding the tracks.
pub const TRACK_DIR: &str = "circos";
