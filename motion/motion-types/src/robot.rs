//! Data-driven registry of robot models.
//!
//! A robot model bundles everything the sequencer needs to know about one
//! robot: its joint layout, the pose it is started from, and the remap
//! tables for every source layout that can be converted into it. Models are
//! read from a JSON resource; the built-in resource covers the Unitree G1,
//! H1 and H1-2.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MotionError, Result};
use crate::frame::MotionFrame;
use crate::layout::JointLayout;
use crate::remap::JointRemapTable;

const BUILTIN_ROBOTS: &str = include_str!("../resources/robots.json");

/// Registry file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Robot model entries.
    pub robots: Vec<RobotConfig>,
}

/// One robot model entry as written in the registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Robot identifier (e.g. `"g1"`).
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Joint names in field order.
    pub joints: JointLayout,

    /// Start pose used for stabilization.
    pub default_pose: PoseConfig,

    /// Source layouts that can be remapped into this robot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceConfig>,
}

/// A pose written by joint name. Joints not listed are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Root position `(x, y, z)`.
    pub root_position: [f64; 3],

    /// Root orientation `(qx, qy, qz, qw)`.
    #[serde(default = "identity_orientation")]
    pub root_orientation: [f64; 4],

    /// Non-zero joint angles in radians.
    #[serde(default)]
    pub joints: BTreeMap<String, f64>,
}

/// A source layout and how its joints land on the robot's joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source layout identifier (e.g. `"pbhc"`).
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Source joint names in field order.
    pub joints: JointLayout,

    /// Source joints with no counterpart on the robot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop: Vec<String>,

    /// Source joints whose robot counterpart has a different name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rename: BTreeMap<String, String>,
}

const fn identity_orientation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// A source layout resolved against a robot model.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLayout {
    name: String,
    description: String,
    layout: JointLayout,
    remap: JointRemapTable,
}

impl SourceLayout {
    /// Source layout identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Joint layout of source frames.
    #[must_use]
    pub const fn layout(&self) -> &JointLayout {
        &self.layout
    }

    /// Table mapping source joints onto the robot's joints.
    #[must_use]
    pub const fn remap(&self) -> &JointRemapTable {
        &self.remap
    }
}

/// A fully resolved robot model.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    name: String,
    description: String,
    layout: JointLayout,
    default_pose: MotionFrame,
    sources: BTreeMap<String, SourceLayout>,
}

impl RobotModel {
    /// Resolves a registry entry.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`] for an invalid pose and
    /// [`MotionError::InvalidRemapTable`] for an unresolvable source.
    pub fn from_config(config: RobotConfig) -> Result<Self> {
        let layout = config.joints;

        let mut default_pose = MotionFrame::from_parts(
            config.default_pose.root_position,
            config.default_pose.root_orientation,
            &vec![0.0; layout.dof()],
        );
        for (joint, angle) in &config.default_pose.joints {
            default_pose.set_joint(&layout, joint, *angle).map_err(|_| {
                MotionError::config(format!(
                    "default pose of '{}' sets unknown joint '{joint}'",
                    config.name
                ))
            })?;
        }
        default_pose.check_finite()?;
        if !default_pose.is_orientation_normalized(1e-6) {
            return Err(MotionError::config(format!(
                "default pose of '{}' has a non-unit orientation",
                config.name
            )));
        }

        let mut sources = BTreeMap::new();
        for source in config.sources {
            let remap =
                JointRemapTable::by_name(&source.joints, &layout, &source.drop, &source.rename)?;
            debug!(
                robot = %config.name,
                source = %source.name,
                unmapped = remap.unmapped_targets().len(),
                "resolved remap table"
            );
            let resolved = SourceLayout {
                name: source.name.clone(),
                description: source.description,
                layout: source.joints,
                remap,
            };
            if sources.insert(source.name.clone(), resolved).is_some() {
                return Err(MotionError::config(format!(
                    "robot '{}' declares source '{}' twice",
                    config.name, source.name
                )));
            }
        }

        Ok(Self {
            name: config.name,
            description: config.description,
            layout,
            default_pose,
            sources,
        })
    }

    /// Robot identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Joint layout of frames for this robot.
    #[must_use]
    pub const fn layout(&self) -> &JointLayout {
        &self.layout
    }

    /// Degrees of freedom.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.layout.dof()
    }

    /// Start pose used for stabilization before a clip.
    #[must_use]
    pub const fn default_pose(&self) -> &MotionFrame {
        &self.default_pose
    }

    /// Looks up a source layout by name.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnsupportedSource`] if none is registered.
    pub fn source(&self, name: &str) -> Result<&SourceLayout> {
        self.sources
            .get(name)
            .ok_or_else(|| MotionError::unsupported_source(&self.name, name))
    }

    /// Registered source layouts, sorted by name.
    pub fn sources(&self) -> impl Iterator<Item = &SourceLayout> {
        self.sources.values()
    }
}

/// Robot models keyed by identifier.
///
/// # Example
///
/// ```
/// use motion_types::RobotRegistry;
///
/// let registry = RobotRegistry::builtin().unwrap();
/// let g1 = registry.get("g1").unwrap();
/// assert_eq!(g1.dof(), 29);
/// assert_eq!(g1.default_pose().width(), 36);
/// assert!(registry.get("atlas").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RobotRegistry {
    robots: BTreeMap<String, RobotModel>,
}

impl RobotRegistry {
    /// Loads the registry shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded resource is invalid.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_ROBOTS)
    }

    /// Parses a registry from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`] for malformed JSON or duplicate
    /// robots, or any error from [`RobotModel::from_config`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Reads a registry file.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`] if the file cannot be read, or any
    /// error from [`RobotRegistry::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MotionError::config(format!("cannot read registry {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Builds a registry from parsed configuration.
    ///
    /// # Errors
    ///
    /// See [`RobotRegistry::from_json`].
    pub fn from_config(config: RegistryConfig) -> Result<Self> {
        let mut robots = BTreeMap::new();
        for entry in config.robots {
            let model = RobotModel::from_config(entry)?;
            let name = model.name.clone();
            if robots.insert(name.clone(), model).is_some() {
                return Err(MotionError::config(format!("robot '{name}' is declared twice")));
            }
        }
        debug!(count = robots.len(), "loaded robot registry");
        Ok(Self { robots })
    }

    /// Looks up a robot model.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::UnsupportedRobotModel`] if none is registered.
    pub fn get(&self, name: &str) -> Result<&RobotModel> {
        self.robots
            .get(name)
            .ok_or_else(|| MotionError::unsupported_robot(name))
    }

    /// Registered robot models, sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &RobotModel> {
        self.robots.values()
    }

    /// Number of registered models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.robots.len()
    }

    /// Returns true if no model is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_loads() {
        let registry = RobotRegistry::builtin().unwrap();
        let names: Vec<&str> = registry.iter().map(RobotModel::name).collect();
        assert_eq!(names, vec!["g1", "h1", "h1_2"]);
    }

    #[test]
    fn builtin_dofs() {
        let registry = RobotRegistry::builtin().unwrap();
        assert_eq!(registry.get("g1").unwrap().dof(), 29);
        assert_eq!(registry.get("h1").unwrap().dof(), 19);
        assert_eq!(registry.get("h1_2").unwrap().dof(), 27);
    }

    #[test]
    fn g1_default_pose_is_t_pose() {
        let registry = RobotRegistry::builtin().unwrap();
        let g1 = registry.get("g1").unwrap();
        let pose = g1.default_pose();

        assert_eq!(pose.root_height(), 0.8);
        assert_eq!(pose.root_orientation(), [0.0, 0.0, 0.0, 1.0]);
        // Shoulder roll fields sit at 23 and 30 in the flat row.
        assert_eq!(pose.values()[23], 1.47);
        assert_eq!(pose.values()[30], -1.47);
        assert_eq!(pose.joints().iter().filter(|v| **v != 0.0).count(), 2);
    }

    #[test]
    fn g1_pbhc_remap_table() {
        let registry = RobotRegistry::builtin().unwrap();
        let source = registry.get("g1").unwrap().source("pbhc").unwrap();
        let table = source.remap();

        assert_eq!(table.source_dof(), 23);
        assert_eq!(table.target_dof(), 29);
        // Legs and waist yaw map straight across.
        for joint in 0..13 {
            assert_eq!(table.destination(joint), Some(joint));
        }
        // Waist roll/pitch are dropped.
        assert_eq!(table.destination(13), None);
        assert_eq!(table.destination(14), None);
        // Right arm skips the three left wrist joints.
        assert_eq!(table.destination(19), Some(22));
        assert_eq!(
            table.unmapped_targets(),
            vec![13, 14, 19, 20, 21, 26, 27, 28]
        );
    }

    #[test]
    fn unknown_robot() {
        let registry = RobotRegistry::builtin().unwrap();
        assert_eq!(
            registry.get("atlas").unwrap_err(),
            MotionError::unsupported_robot("atlas")
        );
    }

    #[test]
    fn unknown_source() {
        let registry = RobotRegistry::builtin().unwrap();
        let err = registry.get("h1").unwrap().source("pbhc").unwrap_err();
        assert!(matches!(err, MotionError::UnsupportedSource { .. }));
    }

    #[test]
    fn pose_with_unknown_joint_rejected() {
        let json = r#"{"robots": [{
            "name": "arm",
            "joints": ["elbow"],
            "default_pose": {"root_position": [0, 0, 1], "joints": {"wrist": 0.5}}
        }]}"#;
        let err = RobotRegistry::from_json(json).unwrap_err();
        assert!(err.to_string().contains("wrist"));
    }

    #[test]
    fn non_unit_default_orientation_rejected() {
        let json = r#"{"robots": [{
            "name": "arm",
            "joints": ["elbow"],
            "default_pose": {"root_position": [0, 0, 1], "root_orientation": [0, 0, 0, 2]}
        }]}"#;
        assert!(RobotRegistry::from_json(json).is_err());
    }

    #[test]
    fn duplicate_robot_rejected() {
        let entry = r#"{"name": "arm", "joints": ["elbow"], "default_pose": {"root_position": [0, 0, 1]}}"#;
        let json = format!(r#"{{"robots": [{entry}, {entry}]}}"#);
        let err = RobotRegistry::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = RobotRegistry::from_json("{").unwrap_err();
        assert!(matches!(err, MotionError::Config(_)));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = RobotRegistry::from_path("/nonexistent/robots.json").unwrap_err();
        assert!(err.to_string().contains("cannot read registry"));
    }
}
