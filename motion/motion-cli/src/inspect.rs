//! Clip statistics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use motion_io::load_clip;
use motion_sequence::{summarize, ClipSummary};
use motion_types::{RobotRegistry, DEFAULT_FPS};

/// Arguments for `motionkit inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Robot model, to check the layout and name joint columns
    #[arg(long)]
    pub robot: Option<String>,

    /// Frame rate for inputs that do not record one
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Clip to inspect (.csv or .json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

pub fn run(registry: &RobotRegistry, args: &InspectArgs) -> Result<()> {
    let summary = inspect(registry, args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn inspect(registry: &RobotRegistry, args: &InspectArgs) -> Result<ClipSummary> {
    let layout = args
        .robot
        .as_deref()
        .map(|name| registry.get(name).map(|robot| robot.layout()))
        .transpose()?;

    let clip = load_clip(&args.input, args.fps)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    summarize(&clip, layout)
        .with_context(|| format!("{} does not match the robot layout", args.input.display()))
}
