//! End-to-end track generation for one genome.
//!
//! Every track is computed in memory first. Files are only written once all
//! stages succeeded, so a failed run does not leave a fresh set of tracks
//! behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::{COMPLETENESS, MAX_CONTIGS, MIN_CONTIG_LEN, TRACK_DIR};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::io::sequence::read_contigs;
use crate::io::tracks::{export_track, write_features, write_karyotype, write_windows};
use crate::pipeline::summary::{export_summary_json, export_summary_tsv, ContigCoverage, RunSummary};
use crate::stats::contig_lengths;
use crate::style::PlotStyle;
use crate::track::{
    build_feature_tracks, coverage_track, gc_track, CoverageTrack, FeatureTracks, GcTrack,
    Karyotype, KaryotypeBuilder, RankPolicy,
};

#[derive(Debug, Clone)]
pub struct TrackConfig {
    pub genome_file: String,
    pub gff_file: String,
    pub output_dir: PathBuf,
    pub coverage_file: Option<String>,
    pub completeness: f64,
    pub min_contig_len: usize,
    pub max_contigs: usize,
    pub rank_policy: RankPolicy,
    pub style: PlotStyle,
}

impl TrackConfig {
    pub fn new(genome_file: &str, gff_file: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            genome_file: genome_file.to_string(),
            gff_file: gff_file.to_string(),
            output_dir: output_dir.into(),
            coverage_file: None,
            completeness: COMPLETENESS,
            min_contig_len: MIN_CONTIG_LEN,
            max_contigs: MAX_CONTIGS,
            rank_policy: RankPolicy::default(),
            style: PlotStyle::default(),
        }
    }

    /// Directory holding the track files
    pub fn track_dir(&self) -> PathBuf {
        self.output_dir.join(TRACK_DIR)
    }
}

/// All tracks of a run, ready to be written.
#[derive(Debug, Clone)]
pub struct TrackSet {
    pub karyotype: Karyotype,
    pub gc: GcTrack,
    pub coverage: Option<CoverageTrack>,
    pub features: FeatureTracks,
}

impl TrackSet {
    pub fn summary(&self) -> RunSummary {
        let contig_coverage = self
            .coverage
            .as_ref()
            .map(|cov| {
                cov.contig_coverage
                    .iter()
                    .map(|(contig, depth)| ContigCoverage {
                        contig: contig.clone(),
                        mean_depth: *depth,
                    })
                    .collect()
            })
            .unwrap_or_default();

        RunSummary {
            genome: self.karyotype.stats.clone(),
            mean_gc: self.gc.mean_gc,
            mean_coverage: self.coverage.as_ref().map(|c| c.mean_coverage),
            contig_coverage,
            rrna_counts: self.features.rrna_counts.clone(),
            trna_counts: self.features.trna_counts.clone(),
            total_trnas: self.features.total_trnas(),
            unique_trnas: self.features.unique_amino_acids(),
        }
    }
}

/// Read the inputs and compute every track without touching the output directory.
pub fn build_tracks(config: &TrackConfig, diag: &dyn Diagnostics) -> Result<TrackSet> {
    let builder = KaryotypeBuilder::new(config.completeness)?
        .min_contig_len(config.min_contig_len)
        .max_contigs(config.max_contigs)
        .rank_policy(config.rank_policy);

    let contigs = read_contigs(&config.genome_file)?;
    let lengths = contig_lengths(&contigs);

    // one pass over the annotation serves the CDS tally and both RNA tracks
    let features = build_feature_tracks(&config.gff_file, &config.style, diag)?;

    diag.info("Creating karyotype for MAG:");
    let karyotype = builder.build(&lengths, &features.cds)?;
    let stats = &karyotype.stats;
    diag.info(&format!(" - genome size = {}", stats.genome_size));
    diag.info(&format!(" - contigs = {}", stats.num_contigs));
    diag.info(&format!(" - N50 = {}", stats.n50));
    diag.info(&format!(" - L50 = {}", stats.l50));
    diag.info(&format!(" - annotated proteins = {}", stats.num_annotated_proteins));
    diag.info(&format!(" - hypothetical proteins = {}", stats.num_hypothetical_proteins));
    if stats.num_filtered_contigs > 0 {
        diag.info(&format!(" - number filtered contigs = {}", stats.num_filtered_contigs));
    }

    let (gc, coverage) = rayon::join(
        || gc_track(&contigs, &config.style.gc),
        || {
            config
                .coverage_file
                .as_deref()
                .map(|path| coverage_track(&lengths, path, &config.style.coverage, diag))
                .transpose()
        },
    );
    let gc = gc?;
    let coverage = coverage?;

    diag.info("Calculating GC content across contigs:");
    diag.info(&format!(" - mean GC = {:.1}%", gc.mean_gc));

    diag.info("Determining position of rRNA genes:");
    for (label, count) in &features.rrna_counts {
        diag.info(&format!(" - {} = {}", label, count));
    }

    diag.info("Determining position of tRNA genes:");
    for (label, count) in &features.trna_counts {
        diag.info(&format!(" - {} = {}", label, count));
    }
    diag.info(&format!(
        " - identified {} tRNAs for {} amino acids",
        features.total_trnas(),
        features.unique_amino_acids()
    ));

    if let Some(cov) = &coverage {
        diag.info("Calculating coverage across contigs:");
        diag.info(&format!(" - mean coverage = {:.1}", cov.mean_coverage));
    }

    Ok(TrackSet {
        karyotype,
        gc,
        coverage,
        features,
    })
}

/// Write the five track files into `track_dir`, creating it if needed.
///
/// Without coverage data `coverage.tsv` is still created, empty.
pub fn write_tracks(track_dir: &Path, tracks: &TrackSet, style: &PlotStyle) -> Result<()> {
    fs::create_dir_all(track_dir)?;

    export_track(track_dir.join("karyotype.tsv"), |w| {
        write_karyotype(w, &tracks.karyotype, &style.contigs)
    })?;
    export_track(track_dir.join("gc.tsv"), |w| write_windows(w, &tracks.gc.points))?;
    export_track(track_dir.join("coverage.tsv"), |w| match &tracks.coverage {
        Some(cov) => write_windows(w, &cov.points),
        None => Ok(()),
    })?;
    export_track(track_dir.join("rrna.tsv"), |w| write_features(w, &tracks.features.rrna))?;
    export_track(track_dir.join("trna.tsv"), |w| write_features(w, &tracks.features.trna))?;
    Ok(())
}

/// Build all tracks, then write them with `genome_stats.tsv` and `genome_stats.json`.
pub fn run(config: &TrackConfig, diag: &dyn Diagnostics) -> Result<RunSummary> {
    let tracks = build_tracks(config, diag)?;
    let summary = tracks.summary();

    let track_dir = config.track_dir();
    write_tracks(&track_dir, &tracks, &config.style)?;
    export_summary_tsv(config.output_dir.join("genome_stats.tsv"), &summary)?;
    export_summary_json(config.output_dir.join("genome_stats.json"), &summary)?;
    diag.info(&format!("Tracks written to {}", track_dir.display()));

    Ok(summary)
}
