//! gsc-drv - Compiler driver.
//!
//! Orchestrates the front end end to end: [`pipeline::check`] runs a
//! source file through the lexer, parser, and semantic analyzer;
//! [`pipeline::build`] continues through `gsc-ir` to produce a
//! [`gsc_ir::Module`]. [`commands`] wraps each entry point in the CLI
//! surface `gsc build`/`gsc check` expose; [`config`] loads `gsc.toml`;
//! [`error`] is this crate's `thiserror`-derived error taxonomy.
//!
//! [`run`] is the library's single entry point: it parses `std::env::args`,
//! initializes `tracing`, loads configuration, and dispatches to the
//! selected subcommand. `gsc-drv`'s `main.rs` is a thin wrapper around it.

pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{build::BuildCommand, check::CheckCommand, BuildArgs, CheckArgs};
use commands::traits::Command;
use config::Config;

/// Gunderscript compiler front end.
#[derive(Parser, Debug)]
#[command(name = "gsc")]
#[command(author = "Gunderscript Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles Gunderscript source through semantic analysis and IR generation")]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "GSC_VERBOSE")]
    verbose: bool,

    /// Path to an explicit `gsc.toml`. Overrides the default search order.
    #[arg(short, long, global = true, env = "GSC_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored log output.
    #[arg(long, global = true, env = "GSC_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a `.gs` file (or every `.gs` file under a directory) through
    /// IR generation.
    Build {
        /// Source file or directory. Defaults to the configured source
        /// directory.
        path: Option<PathBuf>,
    },
    /// Run the pipeline through semantic analysis only, for fast feedback.
    Check {
        /// Source file or directory. Defaults to the configured source
        /// directory.
        path: Option<PathBuf>,
    },
}

/// Parses CLI arguments, initializes logging, loads configuration, and
/// dispatches to the selected subcommand. Returns the process exit code.
pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;
    let config = load_config(cli.config.as_deref())?;

    let code = match cli.command {
        Commands::Build { path } => CheckedExecute::Build(BuildArgs { path }).run(config)?,
        Commands::Check { path } => CheckedExecute::Check(CheckArgs { path }).run(config)?,
    };
    Ok(code)
}

/// The parsed subcommand, still carrying its own args, ready to execute
/// once configuration is in hand.
enum CheckedExecute {
    Build(BuildArgs),
    Check(CheckArgs),
}

impl CheckedExecute {
    fn run(self, config: Config) -> error::Result<i32> {
        match self {
            CheckedExecute::Build(args) => BuildCommand::with_config(args, config).execute(),
            CheckedExecute::Check(args) => CheckCommand::with_config(args, config).execute(),
        }
    }
}

fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber = fmt::layer().with_ansi(!no_color).with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn load_config(config_path: Option<&std::path::Path>) -> error::Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}
