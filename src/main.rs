mod cli_main;

use std::process::ExitCode;

use circos_mag::pipeline::{self, TrackConfig};
use circos_mag::stats::calculate_stats;
use circos_mag::style::PlotStyle;
use circos_mag::{Result, TracingDiagnostics, TrackError};
use clap::Parser;
use cli_main::{Cli, Commands};
use rayon::ThreadPoolBuilder;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.command.silent() {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Plot {
            genome_file,
            gff_file,
            output_dir,
            coverage_file,
            completeness,
            min_contig_len,
            max_contigs,
            gc_window_size,
            cov_window_size,
            plot_style,
            rank_policy,
            threads,
            silent: _,
        } => {
            ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .map_err(|e| TrackError::InvalidParameter(format!("thread pool: {}", e)))?;

            let mut style = match plot_style {
                Some(path) => {
                    info!("Reading plot style from {}", path);
                    PlotStyle::from_toml_file(&path)?
                }
                None => PlotStyle::default(),
            };
            if let Some(size) = gc_window_size {
                style.gc.window_size = size;
            }
            if let Some(size) = cov_window_size {
                style.coverage.window_size = size;
            }

            let mut config = TrackConfig::new(&genome_file, &gff_file, &output_dir);
            config.coverage_file = coverage_file;
            config.completeness = completeness;
            config.min_contig_len = min_contig_len;
            config.max_contigs = max_contigs;
            config.rank_policy = rank_policy;
            config.style = style;

            let start = std::time::Instant::now();
            pipeline::run(&config, &TracingDiagnostics)?;
            info!("Done in {:.2}s", start.elapsed().as_secs_f32());
        }

        Commands::Stats { input, format } => {
            info!("Calculating assembly statistics for: {}", input);
            let stats = calculate_stats(&input)?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                "tsv" => {
                    println!("contigs\ttotal_len\tavg_len\tmax_len\tn50\tl50\tgc\tambiguous");
                    println!(
                        "{}\t{}\t{:.2}\t{}\t{}\t{}\t{:.3}\t{}",
                        stats.total_contigs,
                        stats.total_length,
                        stats.average_length,
                        stats.max_length,
                        stats.n50,
                        stats.l50,
                        stats.gc,
                        stats.ambiguous_bases
                    );
                }
                other => {
                    return Err(TrackError::InvalidParameter(format!(
                        "unsupported format: {}",
                        other
                    )))
                }
            }
        }
    }
    Ok(())
}
