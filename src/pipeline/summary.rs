//! Genome statistics report written next to the tracks.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::io::tracks::export_track;
use crate::track::GenomeStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContigCoverage {
    pub contig: String,
    pub mean_depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub genome: GenomeStats,
    /// Genome-wide GC in percent
    pub mean_gc: f64,
    pub mean_coverage: Option<f64>,
    pub contig_coverage: Vec<ContigCoverage>,
    pub rrna_counts: BTreeMap<String, usize>,
    pub trna_counts: BTreeMap<String, usize>,
    pub total_trnas: usize,
    pub unique_trnas: usize,
}

/// `key = value` report with `[Assembly Statistics]`, `[rRNA Statistics]`
/// and `[tRNA Statistics]` sections.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    let stats = &summary.genome;

    writeln!(writer, "[Assembly Statistics]")?;
    writeln!(writer, "Genome size = {}", stats.genome_size)?;
    writeln!(writer, "No. contigs = {}", stats.num_contigs)?;
    writeln!(writer, "N50 (contigs) = {}", stats.n50)?;
    writeln!(writer, "L50 (contigs) = {}", stats.l50)?;
    writeln!(writer, "GC = {:.3}", summary.mean_gc)?;
    if let Some(coverage) = summary.mean_coverage {
        writeln!(writer, "Coverage = {:.3}", coverage)?;
    }
    writeln!(writer, "No. CDS = {}", stats.num_cds)?;
    writeln!(writer, "No. annotated proteins = {}", stats.num_annotated_proteins)?;
    writeln!(writer, "No. hypothetical proteins = {}", stats.num_hypothetical_proteins)?;
    if stats.num_filtered_contigs > 0 {
        writeln!(writer, "No. filtered contigs = {}", stats.num_filtered_contigs)?;
    }

    writeln!(writer)?;
    writeln!(writer, "[rRNA Statistics]")?;
    for (label, count) in &summary.rrna_counts {
        writeln!(writer, "{} = {}", label, count)?;
    }

    writeln!(writer)?;
    writeln!(writer, "[tRNA Statistics]")?;
    writeln!(writer, "No. tRNAs = {}", summary.total_trnas)?;
    writeln!(writer, "No. unique tRNAs = {}", summary.unique_trnas)?;
    for (label, count) in &summary.trna_counts {
        writeln!(writer, "{} = {}", label, count)?;
    }
    Ok(())
}

pub fn export_summary_tsv<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    export_track(path, |w| write_summary(w, summary))
}

pub fn export_summary_json<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    export_track(path, |w| writeln!(w, "{}", json))
}
