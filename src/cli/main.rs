//! api-reporting-cli
//!
//! Validates, describes and converts exported data set documents.
//!
//! # Usage
//!
//! ```bash
//! api-reporting-cli validate report.json
//! api-reporting-cli describe report.yaml --output compact
//! cat report.json | api-reporting-cli convert - report.yaml
//! ```

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_reporting_sdk::cli::commands::{convert, describe, validate};

#[derive(Parser)]
#[command(name = "api-reporting-cli")]
#[command(version)]
#[command(about = "Validate, describe and convert exported data set documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Document format of the input: json or yaml (default: from the file extension)
    #[arg(long, short = 'f', global = true)]
    format: Option<String>,

    /// Log verbosely
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    Pretty,
    Compact,
    Json,
}

impl OutputMode {
    fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Pretty => "pretty",
            OutputMode::Compact => "compact",
            OutputMode::Json => "json",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a document converts into typed tables
    Validate {
        /// Input file, `-` for stdin
        input: String,
    },

    /// Print the tables, columns and relations of a document
    Describe {
        /// Input file, `-` for stdin
        input: String,

        #[arg(long, short, default_value = "pretty", value_enum)]
        output: OutputMode,
    },

    /// Convert a document between JSON and YAML
    Convert {
        /// Input file, `-` for stdin
        input: String,

        /// Output file, `-` for stdout
        output: String,

        /// Output format: json or yaml (default: from the output file extension)
        #[arg(long)]
        to: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "api_reporting_sdk=debug" } else { "api_reporting_sdk=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format.as_deref();
    match cli.command {
        Commands::Validate { input } => {
            validate::handle_validate(&input, format).with_context(|| format!("validating {}", input))
        }
        Commands::Describe { input, output } => describe::handle_describe(&input, format, output.as_str())
            .with_context(|| format!("describing {}", input)),
        Commands::Convert { input, output, to } => {
            convert::handle_convert(&input, &output, format, to.as_deref())
                .with_context(|| format!("converting {}", input))
        }
    }
}
