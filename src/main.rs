#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::uninlined_format_args)]

mod analysis;
mod csv_reader;
mod error;

use analysis::pipeline::{self, AnalysisConfig};
use clap::{Parser, Subcommand};
use csv_reader::CsvData;
use error::{KnotError, Result};
use std::path::{Path, PathBuf};

/// Knots - correlation cycle analysis for tabular data
#[derive(Parser, Debug)]
#[command(name = "knots")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the cycle basis of the pruned correlation graph
    Analyze {
        /// Input CSV/TSV file to analyze
        #[arg(short, long)]
        csv: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "./knot_output")]
        output_dir: PathBuf,

        /// Treat input as TSV instead of CSV
        #[arg(long)]
        tsv: bool,

        /// Minimum cycle size to report
        #[arg(long, default_value = "3")]
        min_cycle_size: usize,

        /// Cycles per figure batch at the renderer boundary
        #[arg(long, default_value = "4")]
        max_cycles_per_figure: usize,
    },

    /// Deconstruct each cycle into a tree from an IN feature to an OUT feature
    Deconstruct {
        /// Input CSV/TSV file to analyze
        #[arg(short, long)]
        csv: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "./knot_output")]
        output_dir: PathBuf,

        /// Treat input as TSV instead of CSV
        #[arg(long)]
        tsv: bool,

        /// Minimum cycle size to deconstruct
        #[arg(long, default_value = "4")]
        min_cycle_size: usize,

        /// Cycles per figure batch at the renderer boundary
        #[arg(long, default_value = "4")]
        max_cycles_per_figure: usize,

        /// Root feature of each deconstructed tree
        #[arg(long = "in", value_name = "FEATURE")]
        input: String,

        /// Terminal feature, duplicated once per branch
        #[arg(long = "out", value_name = "FEATURE")]
        output: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Analyze {
            csv,
            output_dir,
            tsv,
            min_cycle_size,
            max_cycles_per_figure,
        }) => run_analyze(
            &csv,
            &output_dir,
            &AnalysisConfig {
                min_cycle_size,
                max_cycles_per_figure,
            },
            tsv,
            None,
        ),

        Some(Commands::Deconstruct {
            csv,
            output_dir,
            tsv,
            min_cycle_size,
            max_cycles_per_figure,
            input,
            output,
        }) => run_analyze(
            &csv,
            &output_dir,
            &AnalysisConfig {
                min_cycle_size,
                max_cycles_per_figure,
            },
            tsv,
            Some((input, output)),
        ),

        None => {
            eprintln!("No subcommand provided. Use 'knots analyze' or 'knots deconstruct'.");
            eprintln!("Run 'knots --help' for usage information.");
            std::process::exit(1);
        }
    }
}

/// Run the analysis phase, optionally followed by per-cycle deconstruction
fn run_analyze(
    csv_path: &Path,
    output_dir: &Path,
    config: &AnalysisConfig,
    tsv: bool,
    endpoints: Option<(String, String)>,
) -> Result<()> {
    if !csv_path.exists() {
        return Err(KnotError::Config(format!(
            "CSV file not found: {}",
            csv_path.display()
        )));
    }

    std::fs::create_dir_all(output_dir)?;

    eprintln!("Analyzing: {}", csv_path.display());

    let csv_data = CsvData::from_file(csv_path, tsv)?;
    eprintln!(
        "Loaded {} rows x {} columns",
        csv_data.row_count(),
        csv_data.col_count()
    );

    eprintln!("Extracting features...");
    let features = analysis::features::FeatureMatrix::from_csv(&csv_data)?;

    eprintln!("Computing correlation graph and cycle basis...");
    let result = pipeline::run_pipeline(&features, config)?;
    eprintln!(
        "Sigma {:.4}: {} nodes, {} edges, {} basis cycles",
        result.pruned.sigma,
        result.graph.node_count(),
        result.graph.edge_count(),
        result.basis.total
    );

    eprintln!("Writing output files...");
    let summary = analysis::output::build_summary(csv_path, &csv_data, &result, config);
    analysis::output::write_summary(output_dir, &summary)?;
    analysis::output::write_cycles_csv(output_dir, &result)?;
    analysis::output::write_graph_json(output_dir, &result, config)?;

    let deconstructed = endpoints.is_some();
    if let Some((input, output)) = endpoints {
        if result.correlation.names.iter().all(|n| *n != input) {
            return Err(KnotError::Config(format!(
                "IN feature '{input}' is not a column of the input table"
            )));
        }
        if result.correlation.names.iter().all(|n| *n != output) {
            return Err(KnotError::Config(format!(
                "OUT feature '{output}' is not a column of the input table"
            )));
        }

        eprintln!("Deconstructing {} cycles ({input} -> {output})...", result.basis.filtered_count());
        let outcomes = pipeline::deconstruct_all(&result, &input, &output);
        analysis::output::write_trees_json(output_dir, &outcomes, &input, &output)?;
    }

    eprintln!("Output written to {}", output_dir.display());
    eprintln!("  - summary.txt");
    eprintln!("  - cycles.csv");
    eprintln!("  - graph.json");
    if deconstructed {
        eprintln!("  - trees.json");
    }

    Ok(())
}
