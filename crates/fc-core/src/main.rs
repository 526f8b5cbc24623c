//! fedicensus: record one snapshot of federated instance statistics.

use clap::{Parser, Subcommand};
use fc_common::Result;
use fc_config::{resolve_settings, SettingsOverrides};
use fc_core::logging::{init_logging, LogFormat};
use fc_core::{init_stores, run_once, ExitCode};
use std::path::PathBuf;
use tracing::error;

#[derive(Debug, Parser)]
#[command(
    name = "fedicensus",
    version,
    about = "Append a snapshot of instance statistics to the timeline and directory stores"
)]
struct Cli {
    /// Directory holding timeline.parquet and directory.parquet
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Instance list endpoint (query parameters are added automatically)
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Log filter, e.g. `debug` or `fc_store=debug,info` (overrides RUST_LOG)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Fetch, filter and merge one batch (default)
    Run,
    /// Create empty stores that do not exist yet
    Init,
    /// Print the resolved settings as JSON
    Config,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level.as_deref());

    let code = match execute(&cli) {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            error!(code = err.code(), stage = %err.stage(), error = %err, "run failed");
            eprintln!("error[{}] {}: {}", err.code(), err.stage(), err);
            ExitCode::from(&err)
        }
    };
    std::process::exit(code.as_i32());
}

fn execute(cli: &Cli) -> Result<()> {
    let settings = resolve_settings(&SettingsOverrides {
        data_dir: cli.data_dir.clone(),
        endpoint: cli.endpoint.clone(),
    })?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let summary = run_once(&settings)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Init => {
            let report = init_stores(&settings)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Config => println!("{}", settings.to_json_pretty()?),
    }
    Ok(())
}
