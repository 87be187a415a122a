use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use ff_regional::app::{App, RunOptions};
use ff_regional::config::{ConfigLoader, parse_cutoff};
use ff_regional::download::HttpFactorSource;
use ff_regional::error::{ErrorKind, FactorError};
use ff_regional::output::{ConsoleOutput, JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "ff-regional")]
#[command(about = "Combine regional Fama-French factor files into one spreadsheet")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults to ff-regional.json when present)
    #[arg(long)]
    config: Option<String>,

    /// Directory holding the downloaded archives
    #[arg(long)]
    data_dir: Option<Utf8PathBuf>,

    /// Spreadsheet to write
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// First period kept, as YYYYMM or "common-start"
    #[arg(long)]
    min_period: Option<String>,

    /// Download every archive before loading
    #[arg(long)]
    download: bool,

    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<FactorError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &FactorError) -> u8 {
    match error.kind() {
        ErrorKind::NotFound => 2,
        ErrorKind::Network => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(min_period) = cli.min_period.as_deref() {
        config.cutoff = parse_cutoff(min_period)?;
    }

    let source = HttpFactorSource::new(&config.base_url)?;
    let app = App::new(config, source);
    let options = RunOptions {
        download: cli.download,
    };

    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.run(options, &JsonOutput)?;
            JsonOutput::print_run(&result).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            let result = app.run(options, &ConsoleOutput)?;
            ConsoleOutput::print_run(&result);
        }
    }
    Ok(())
}
