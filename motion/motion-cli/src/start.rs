//! Stabilization prefix for converted clips.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use motion_io::{load_clip, save_clip};
use motion_sequence::{prepend_stabilization, TransitionParams};
use motion_types::{RobotRegistry, DEFAULT_FPS};

/// Arguments for `motionkit add-start`.
#[derive(Args, Debug, Clone)]
pub struct AddStartArgs {
    /// Robot model whose default pose starts the clip
    #[arg(long, default_value = "g1")]
    pub robot: String,

    /// Frames holding the stabilization pose
    #[arg(long, default_value_t = 30)]
    pub hold: usize,

    /// Frames easing from the stabilization pose into the clip
    #[arg(long, default_value_t = 30)]
    pub transition: usize,

    /// Root height of the stabilization pose (default: the robot's)
    #[arg(long)]
    pub height: Option<f64>,

    /// Keep the pose's own root x/y instead of moving it under the first frame
    #[arg(long)]
    pub no_align: bool,

    /// Frame rate of the input clip
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Robot clip (.csv)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output clip (.csv)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

impl AddStartArgs {
    fn params(&self) -> TransitionParams {
        let params =
            TransitionParams::new(self.hold, self.transition).with_align_horizontal(!self.no_align);
        match self.height {
            Some(height) => params.with_root_height(height),
            None => params,
        }
    }
}

pub fn run(registry: &RobotRegistry, args: &AddStartArgs) -> Result<()> {
    let robot = registry.get(&args.robot)?;

    let clip = load_clip(&args.input, args.fps)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    clip.check_layout(robot.layout())
        .with_context(|| format!("{} is not a {} clip", args.input.display(), robot.name()))?;

    let (prefixed, report) = prepend_stabilization(&clip, robot.default_pose(), &args.params())?;

    save_clip(&prefixed, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "{}: {} frames (hold {:?}, transition {:?}, motion {:?})",
        args.output.display(),
        prefixed.len(),
        report.hold,
        report.transition,
        report.motion,
    );
    Ok(())
}
