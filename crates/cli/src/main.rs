// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lk - named locks shared through a lock directory

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use commands::{exec, status, Settings};
use error::{LkError, EXIT_FAILURE};
use lk_core::CoordinatorConfig;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "lk",
    version,
    about = "latchkey - named locks shared between processes"
)]
struct Cli {
    /// Lock store directory
    #[arg(long, global = true, env = "LK_STORE", default_value = ".latchkey/locks")]
    store: PathBuf,

    /// Coordinator config file (TOML)
    #[arg(long, global = true, env = "LK_CONFIG")]
    config: Option<PathBuf>,

    /// Treat lock entries older than this as abandoned (e.g. "10m")
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    ttl: Option<Duration>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show who holds a lock
    Status(status::StatusArgs),
    /// List held locks
    List,
    /// Wait for a lock, then run a command while holding it
    Exec(exec::ExecArgs),
    /// Run a command under a lock only if it is free right now
    Try(exec::TryArgs),
}

fn main() -> ExitCode {
    setup_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => match e.downcast_ref::<LkError>() {
            Some(err) => {
                eprint!("{}", err);
                ExitCode::from(err.exit_code)
            }
            None => {
                eprintln!("error: {:#}", e);
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = match &cli.config {
        Some(path) => CoordinatorConfig::load(path)?,
        None => CoordinatorConfig::default(),
    };
    let mut settings = Settings {
        store_dir: cli.store,
        config,
        ttl: cli.ttl,
        format: cli.format,
    };

    match cli.command {
        Commands::Status(args) => status::status(&settings, args).map(|()| 0),
        Commands::List => status::list(&settings).map(|()| 0),
        Commands::Exec(args) => exec::exec(&mut settings, args),
        Commands::Try(args) => exec::try_exec(&settings, args),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("LK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
