use clap::Parser;
use depwatch::{load_manifest, run};
use depwatch_core::DEFAULT_FIELDS;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the run finished but some fields failed.
const PARTIAL_EXIT: u8 = 2;

#[derive(Parser)]
#[command(name = "depwatch")]
#[command(version, about = "Detect the latest published version of a package")]
struct Cli {
    /// JSON manifest describing the package
    manifest: PathBuf,

    /// Fields to detect, comma separated (default: all)
    #[arg(short, long = "field", value_delimiter = ',')]
    fields: Vec<String>,

    /// Repository base URL, overriding the manifest
    #[arg(long)]
    repository: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut input = match load_manifest(&cli.manifest) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(repository) = cli.repository {
        input
            .manifest
            .options
            .insert("repository".to_string(), repository);
    }

    let fields: Vec<&str> = if cli.fields.is_empty() {
        DEFAULT_FIELDS.to_vec()
    } else {
        cli.fields.iter().map(String::as_str).collect()
    };

    let report = match run(&input, &fields).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("failed to serialize report: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(PARTIAL_EXIT)
    }
}
