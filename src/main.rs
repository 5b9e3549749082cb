use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use metamar::{AnalysisType, DataLoader, LoaderConfig, StructureVariant};

/// Validate a meta-analysis study table.
#[derive(Parser, Debug)]
#[command(name = "metamar", version)]
struct Cli {
    /// Study table (.csv, .json, .parquet, .xlsx, .xls, .ods)
    file: PathBuf,

    /// continuous | continuous_median | binary | generic | correlation
    #[arg(short = 't', long = "type")]
    analysis_type: AnalysisType,

    /// basic | median (defaults per analysis type)
    #[arg(short, long)]
    structure: Option<StructureVariant>,

    /// Directory that relative FILE paths are resolved against
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Also print the allowed report settings for the analysis type as JSON
    #[arg(long)]
    show_settings: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let loader = DataLoader::new(LoaderConfig {
        data_dir: cli.data_dir,
    });
    let variant = cli
        .structure
        .unwrap_or_else(|| cli.analysis_type.default_variant());

    match loader.load_and_validate(&cli.file, cli.analysis_type, variant) {
        Ok(dataset) => {
            println!(
                "{}: {} studies, {} columns, valid {}/{}",
                cli.file.display(),
                dataset.len(),
                dataset.columns.len(),
                cli.analysis_type,
                variant
            );
            if cli.show_settings {
                let settings = loader.available_settings(cli.analysis_type);
                match serde_json::to_string_pretty(&settings) {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
