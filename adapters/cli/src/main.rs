#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the toy robot.

mod config;
mod console;
mod protocol;
mod server;

use std::{
    fs::File,
    io::{self, BufReader},
    net::{SocketAddr, TcpListener},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use toy_robot_system_processor::CommandProcessor;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{config::RobotConfig, console::OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "toy-robot", version, about = "Drive a toy robot around a tabletop grid")]
struct Cli {
    /// TOML file with `[table]` and `[server]` settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured table width.
    #[arg(long, global = true)]
    width: Option<u32>,
    /// Overrides the configured table height.
    #[arg(long, global = true)]
    height: Option<u32>,
    /// Logs at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Interactive console (the default).
    Repl,
    /// Executes the requests in a script file, one per line.
    Run {
        script: PathBuf,
        /// Prints JSON responses instead of messages.
        #[arg(long)]
        json: bool,
    },
    /// Accepts requests over a line-oriented TCP connection.
    Serve {
        /// Overrides the configured bind address.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

/// Entry point for the toy robot command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = cli.mode.unwrap_or(Mode::Repl);
    init_tracing(cli.verbose, matches!(mode, Mode::Serve { .. }));

    let mut config = RobotConfig::load(cli.config.as_deref())?;
    if let Some(width) = cli.width {
        config.table.width = width;
    }
    if let Some(height) = cli.height {
        config.table.height = height;
    }
    let grid = config.grid()?;
    let mut processor = CommandProcessor::new(grid);
    info!(%grid, "table ready");

    match mode {
        Mode::Repl => console::run_repl(&mut processor, io::stdin().lock(), io::stdout().lock()),
        Mode::Run { script, json } => {
            let file = File::open(&script)
                .with_context(|| format!("failed to open script {}", script.display()))?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            let rejected =
                console::run_script(&mut processor, BufReader::new(file), io::stdout().lock(), format)?;
            if rejected > 0 {
                warn!(rejected, "script finished with rejected requests");
            }
            Ok(())
        }
        Mode::Serve { bind } => {
            let bind = bind.unwrap_or(config.server.bind);
            let listener =
                TcpListener::bind(bind).with_context(|| format!("failed to bind {bind}"))?;
            server::serve(listener, Arc::new(Mutex::new(processor)))
        }
    }
}

fn init_tracing(verbose: bool, serving: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_level(serving)))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

/// Level used when neither `--verbose` nor `RUST_LOG` is given. Console modes
/// stay at `warn` so log lines do not interleave with the prompt.
fn default_log_level(serving: bool) -> &'static str {
    if serving {
        "info"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_logs_more_than_the_console_by_default() {
        assert_eq!(default_log_level(true), "info");
        assert_eq!(default_log_level(false), "warn");
    }

    #[test]
    fn mode_defaults_to_repl() {
        let cli = Cli::try_parse_from(["toy-robot", "--width", "7"]).expect("parse");
        assert!(cli.mode.is_none());
        assert_eq!(cli.width, Some(7));
    }
}
