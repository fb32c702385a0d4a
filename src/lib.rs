//! circos_mag: genomic signal tracks for circular plots of draft genomes
//!
//! Reads an assembly (FASTA/FASTQ, optionally gzipped), its GFF3
//! annotation and optionally a per-base depth file, and produces the
//! karyotype, GC deviation, coverage deviation, rRNA and tRNA tracks plus a
//! genome statistics report.

pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod stats;
pub mod style;
pub mod track;

pub use diagnostics::{CapturedDiagnostics, Diagnostics, TracingDiagnostics};
pub use error::{Result, TrackError};
