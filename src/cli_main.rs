use clap::{Parser, Subcommand};
use circos_mag::defaults::{COMPLETENESS, MAX_CONTIGS, MIN_CONTIG_LEN};
use circos_mag::track::RankPolicy;

#[derive(Parser, Debug)]
#[command(name = "circos_mag", version, about = "Circular plot tracks for metagenome-assembled genomes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create karyotype, GC, coverage, rRNA and tRNA tracks for a genome
    Plot {
        /// Genome assembly in FASTA/FASTQ format, optionally gzipped
        genome_file: String,

        /// GFF3 annotation of the genome
        gff_file: String,

        /// Output directory; tracks go to <OUTPUT_DIR>/circos
        output_dir: String,

        /// Per-base depth file: contig, 0-based position, depth
        #[arg(short, long)]
        coverage_file: Option<String>,

        /// Estimated completeness of the genome, in (0, 100]
        #[arg(long, default_value_t = COMPLETENESS)]
        completeness: f64,

        /// Contigs shorter than this are merged into the "other" segment
        #[arg(long, default_value_t = MIN_CONTIG_LEN)]
        min_contig_len: usize,

        /// Maximum number of contigs drawn individually
        #[arg(long, default_value_t = MAX_CONTIGS)]
        max_contigs: usize,

        /// GC window size, overrides the plot style
        #[arg(long)]
        gc_window_size: Option<usize>,

        /// Coverage window size, overrides the plot style
        #[arg(long)]
        cov_window_size: Option<usize>,

        /// TOML file with colors, symbols and window sizes
        #[arg(long)]
        plot_style: Option<String>,

        /// Rank numbering of the synthetic karyotype segments: sequential or shared
        #[arg(long, default_value = "sequential")]
        rank_policy: RankPolicy,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,

        /// Only report errors
        #[arg(long)]
        silent: bool,
    },

    /// Display assembly statistics
    Stats {
        /// Input FASTA/FASTQ file
        #[arg(short, long)]
        input: String,

        /// Output format: json or tsv
        #[arg(short, long, default_value = "tsv")]
        format: String,
    },
}

impl Commands {
    pub fn silent(&self) -> bool {
        matches!(self, Commands::Plot { silent: true, .. })
    }
}
