//! Registry listing.

use anyhow::Result;
use motion_types::RobotRegistry;

pub fn run(registry: &RobotRegistry) -> Result<()> {
    print!("{}", listing(registry));
    Ok(())
}

fn listing(registry: &RobotRegistry) -> String {
    let mut lines = Vec::new();
    for robot in registry.iter() {
        lines.push(format!(
            "{:<8} {:>2} DOF  {:>2} fields  {}",
            robot.name(),
            robot.dof(),
            robot.layout().width(),
            robot.description()
        ));
        for source in robot.sources() {
            let unmapped = source.remap().unmapped_targets().len();
            lines.push(format!(
                "  source {:<8} {:>2} DOF, {} target joints fixed at 0  {}",
                source.name(),
                source.layout().dof(),
                unmapped,
                source.description()
            ));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
