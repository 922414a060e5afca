//! Source clip conversion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use motion_io::{load_clip, load_source_json, save_clip, ClipFormat};
use motion_sequence::{remap_clip, summarize};
use motion_types::{MotionClip, RobotRegistry, DEFAULT_FPS};
use tracing::warn;

/// Arguments for `motionkit convert`.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Target robot model
    #[arg(long, default_value = "g1")]
    pub robot: String,

    /// Source joint layout registered for the robot
    #[arg(long, default_value = "pbhc")]
    pub source: String,

    /// Motion to take from a JSON dump (default: the first one)
    #[arg(long)]
    pub motion: Option<String>,

    /// Frame rate for inputs that do not record one
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Source clip (.csv or .json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output clip (.csv)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

pub fn run(registry: &RobotRegistry, args: &ConvertArgs) -> Result<()> {
    let robot = registry.get(&args.robot)?;
    let source = robot.source(&args.source)?;

    let clip = load_source(args)?;
    let converted = remap_clip(&clip, source.remap())
        .with_context(|| format!("failed to remap {}", args.input.display()))?;

    // Columns the remap leaves empty are expected; any other all-zero column
    // usually means the source layout does not match the file.
    let unmapped = source.remap().unmapped_targets();
    let summary = summarize(&converted, Some(robot.layout()))?;
    for column in summary
        .zero_joints
        .iter()
        .filter(|c| !unmapped.contains(&c.joint))
    {
        warn!(
            joint = column.name.as_deref().unwrap_or("?"),
            field = column.field,
            "Mapped joint is zero in every frame"
        );
    }

    save_clip(&converted, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{}: {} frames, {} -> {} fields ({} -> {})",
        args.output.display(),
        converted.len(),
        clip.width().unwrap_or(0),
        converted.width().unwrap_or(0),
        source.name(),
        robot.name(),
    );
    Ok(())
}

fn load_source(args: &ConvertArgs) -> Result<MotionClip> {
    let input = &args.input;
    let clip = match (&args.motion, ClipFormat::from_path(input)) {
        (Some(motion), Some(ClipFormat::SourceJson)) => {
            load_source_json(input, Some(motion.as_str()), args.fps)
        }
        (Some(_), _) => anyhow::bail!("--motion only applies to JSON dumps"),
        (None, _) => load_clip(input, args.fps),
    };
    clip.with_context(|| format!("failed to load {}", input.display()))
}
