//! Final-pose holds.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use motion_io::{load_clip, save_clip};
use motion_sequence::{extend_by_duration, extend_with_last_pose};
use motion_types::DEFAULT_FPS;

/// Arguments for `motionkit extend`.
#[derive(Args, Debug, Clone)]
pub struct ExtendArgs {
    /// Number of frames to append
    #[arg(long, conflicts_with = "seconds", required_unless_present = "seconds")]
    pub frames: Option<usize>,

    /// Seconds to hold the last pose
    #[arg(long)]
    pub seconds: Option<f64>,

    /// Frame rate of the input clip
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Clip to extend (.csv or .json)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output clip (.csv)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

pub fn run(args: &ExtendArgs) -> Result<()> {
    let clip = load_clip(&args.input, args.fps)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let extended = match (args.frames, args.seconds) {
        (Some(frames), _) => extend_with_last_pose(&clip, frames),
        (None, Some(seconds)) => extend_by_duration(&clip, seconds),
        (None, None) => anyhow::bail!("either --frames or --seconds is required"),
    }
    .with_context(|| format!("cannot extend {}", args.input.display()))?;

    save_clip(&extended, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{}: {} -> {} frames ({:.2} s)",
        args.output.display(),
        clip.len(),
        extended.len(),
        extended.duration_secs(),
    );
    Ok(())
}
