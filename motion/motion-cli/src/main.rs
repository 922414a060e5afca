//! motionkit: motion clip conversion for humanoid tracking policies.
//!
//! # Commands
//!
//! - `motionkit convert` - Remap a retargeted source clip onto a robot
//! - `motionkit add-start` - Prepend a stabilization hold and transition
//! - `motionkit extend` - Hold the last pose for extra frames or seconds
//! - `motionkit inspect` - Frame counts, zero columns, norm checks
//! - `motionkit robots` - List the registered robot models
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`; `--verbose`
//! raises the default level to debug.

mod convert;
mod extend;
mod inspect;
mod robots;
mod start;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motion_types::RobotRegistry;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Motion clip conversion for humanoid tracking policies
#[derive(Parser, Debug)]
#[command(name = "motionkit")]
#[command(about = "Convert and condition robot motion clips", long_about = None)]
#[command(version)]
struct Cli {
    /// Robot registry JSON to use instead of the built-in one
    #[arg(long, global = true, value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Remap a source clip (CSV or JSON dump) onto a robot's joint layout
    Convert(convert::ConvertArgs),

    /// Prepend the robot's stabilization pose with a hold and an eased transition
    AddStart(start::AddStartArgs),

    /// Append copies of the last frame
    Extend(extend::ExtendArgs),

    /// Print clip statistics
    Inspect(inspect::InspectArgs),

    /// List registered robot models and their source layouts
    Robots,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let registry = load_registry(cli.registry.as_deref())?;

    match cli.command {
        Commands::Convert(args) => convert::run(&registry, &args),
        Commands::AddStart(args) => start::run(&registry, &args),
        Commands::Extend(args) => extend::run(&args),
        Commands::Inspect(args) => inspect::run(&registry, &args),
        Commands::Robots => robots::run(&registry),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("motionkit={level}").parse()?)
            .add_directive(format!("motion_sequence={level}").parse()?)
            .add_directive(format!("motion_io={level}").parse()?)
            .add_directive(format!("motion_types={level}").parse()?),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
    Ok(())
}

fn load_registry(path: Option<&Path>) -> Result<RobotRegistry> {
    let registry = match path {
        Some(path) => RobotRegistry::from_path(path)
            .with_context(|| format!("failed to load robot registry {}", path.display()))?,
        None => RobotRegistry::builtin().context("built-in robot registry is invalid")?,
    };
    debug!(robots = registry.len(), "Loaded robot registry");
    Ok(registry)
}
