//! JSON dumps of retargeting output.
//!
//! The retargeting pipeline stores its results keyed by motion name. A
//! dump holds one or more motions; fields this reader does not use are
//! ignored:
//!
//! ```json
//! {
//!   "walk_01": {
//!     "fps": 30,
//!     "dof": [[0.1, ...], ...],
//!     "root_rot": [[0.0, 0.0, 0.0, 1.0], ...],
//!     "root_trans_offset": [[0.0, 0.0, 0.79], ...]
//!   }
//! }
//! ```
//!
//! `root_rot` is scalar-last `(qx, qy, qz, qw)`. The root translation is
//! read from `root_trans`, or from `root_trans_offset` when `root_trans` is
//! absent. Motions keep their document order.

use std::fmt;
use std::fs;
use std::path::Path;

use motion_types::{MotionClip, MotionError, MotionFrame};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// Arrays of one motion in a source dump.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceMotion {
    /// Joint angles, one row per frame.
    pub dof: Vec<Vec<f64>>,
    /// Root orientation per frame, `(qx, qy, qz, qw)`.
    pub root_rot: Vec<[f64; 4]>,
    /// Root translation per frame.
    #[serde(default)]
    pub root_trans: Option<Vec<[f64; 3]>>,
    /// Root translation per frame, used when `root_trans` is absent.
    #[serde(default)]
    pub root_trans_offset: Option<Vec<[f64; 3]>>,
    /// Sample rate, if recorded.
    #[serde(default)]
    pub fps: Option<f64>,
}

impl SourceMotion {
    /// Root translation, preferring `root_trans` over `root_trans_offset`.
    #[must_use]
    pub fn root_translation(&self) -> Option<&[[f64; 3]]> {
        self.root_trans
            .as_deref()
            .or_else(|| self.root_trans_offset.as_deref())
    }

    /// Assembles source-layout frames `[x, y, z, qx, qy, qz, qw, dof...]`.
    ///
    /// `default_fps` is used when the motion does not record a rate.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidSource`] if the root translation is missing
    /// or the arrays differ in length, and [`IoError::Motion`] if the joint
    /// rows are ragged (with the frame index).
    pub fn to_clip(&self, default_fps: f64) -> IoResult<MotionClip> {
        let translation = self.root_translation().ok_or_else(|| {
            IoError::invalid_source("neither 'root_trans' nor 'root_trans_offset' is present")
        })?;

        let frame_count = self.dof.len();
        if self.root_rot.len() != frame_count || translation.len() != frame_count {
            return Err(IoError::invalid_source(format!(
                "array lengths differ: dof has {frame_count} frames, root_rot {}, root translation {}",
                self.root_rot.len(),
                translation.len()
            )));
        }

        let frames = self
            .dof
            .iter()
            .zip(&self.root_rot)
            .zip(translation)
            .map(|((joints, rotation), position)| {
                MotionFrame::from_parts(*position, *rotation, joints)
            })
            .collect();

        let fps = self.fps.unwrap_or(default_fps);
        Ok(MotionClip::new(frames, fps)?)
    }
}

/// All motions of a source dump, in document order.
#[derive(Debug, Clone, Default)]
pub struct SourceDump {
    motions: Vec<(String, SourceMotion)>,
}

impl SourceDump {
    /// Parse a dump from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Json`] if the text is not a dump of motions.
    pub fn from_json(json: &str) -> IoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Motion names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.motions.iter().map(|(name, _)| name.as_str())
    }

    /// Number of motions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Check if the dump has no motions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    /// The first motion in the document.
    #[must_use]
    pub fn first(&self) -> Option<(&str, &SourceMotion)> {
        self.motions
            .first()
            .map(|(name, motion)| (name.as_str(), motion))
    }

    /// Look up a motion by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SourceMotion> {
        self.motions
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, motion)| motion)
    }
}

impl<'de> Deserialize<'de> for SourceDump {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DumpVisitor;

        impl<'de> Visitor<'de> for DumpVisitor {
            type Value = SourceDump;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping motion names to motion arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SourceDump, A::Error> {
                let mut motions = Vec::with_capacity(map.size_hint().unwrap_or(1));
                while let Some(entry) = map.next_entry::<String, SourceMotion>()? {
                    motions.push(entry);
                }
                Ok(SourceDump { motions })
            }
        }

        deserializer.deserialize_map(DumpVisitor)
    }
}

/// Load a source clip from a JSON dump.
///
/// Uses the motion called `motion` if given, otherwise the first motion.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the dump is
/// empty, the named motion does not exist, or the arrays are inconsistent.
pub fn load_source_json<P: AsRef<Path>>(
    path: P,
    motion: Option<&str>,
    default_fps: f64,
) -> IoResult<MotionClip> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| IoError::open(e, path))?;
    let dump = SourceDump::from_json(&text)?;
    debug!(path = %path.display(), motions = dump.len(), "Parsed source dump");

    let (name, source) = match motion {
        Some(name) => {
            let source = dump.get(name).ok_or_else(|| {
                IoError::invalid_source(format!("no motion named '{name}' in {}", path.display()))
            })?;
            (name, source)
        }
        None => dump
            .first()
            .ok_or_else(|| IoError::invalid_source(format!("{} holds no motions", path.display())))?,
    };

    let clip = source.to_clip(default_fps).map_err(|err| match err {
        IoError::Motion(MotionError::MalformedFrame { .. }) | IoError::InvalidSource { .. } => {
            IoError::invalid_source(format!("motion '{name}': {err}"))
        }
        other => other,
    })?;
    info!(
        motion = name,
        frames = clip.len(),
        width = clip.width().unwrap_or(0),
        "Loaded source motion"
    );
    Ok(clip)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "zeta_walk": {
            "fps": 50,
            "dof": [[0.1, 0.2], [0.3, 0.4]],
            "root_rot": [[0, 0, 0, 1], [0, 0, 0.6, 0.8]],
            "root_trans": [[1, 2, 0.8], [1.1, 2, 0.79]],
            "pose_aa": [[0]]
        },
        "alpha_jump": {
            "dof": [[0.5, 0.6]],
            "root_rot": [[0, 0, 0, 1]],
            "root_trans_offset": [[0, 0, 0.7]]
        }
    }"#;

    #[test]
    fn keeps_document_order() {
        let dump = SourceDump::from_json(DUMP).unwrap();
        assert_eq!(dump.names().collect::<Vec<_>>(), vec!["zeta_walk", "alpha_jump"]);
        assert_eq!(dump.first().unwrap().0, "zeta_walk");
    }

    #[test]
    fn assembles_frames() {
        let dump = SourceDump::from_json(DUMP).unwrap();
        let clip = dump.get("zeta_walk").unwrap().to_clip(30.0).unwrap();

        assert_eq!(clip.fps(), 50.0);
        assert_eq!(clip.len(), 2);
        assert_eq!(clip.frames()[1].values(), &[1.1, 2.0, 0.79, 0.0, 0.0, 0.6, 0.8, 0.3, 0.4]);
    }

    #[test]
    fn falls_back_to_offset_translation() {
        let dump = SourceDump::from_json(DUMP).unwrap();
        let clip = dump.get("alpha_jump").unwrap().to_clip(30.0).unwrap();
        assert_eq!(clip.fps(), 30.0);
        assert_eq!(clip.frames()[0].root_position(), [0.0, 0.0, 0.7]);
    }

    #[test]
    fn missing_translation_rejected() {
        let json = r#"{"m": {"dof": [[0.0]], "root_rot": [[0, 0, 0, 1]]}}"#;
        let dump = SourceDump::from_json(json).unwrap();
        let err = dump.first().unwrap().1.to_clip(30.0).unwrap_err();
        assert!(matches!(err, IoError::InvalidSource { .. }));
    }

    #[test]
    fn length_mismatch_rejected() {
        let json = r#"{"m": {"dof": [[0.0], [0.0]], "root_rot": [[0, 0, 0, 1]], "root_trans": [[0, 0, 1]]}}"#;
        let dump = SourceDump::from_json(json).unwrap();
        let err = dump.first().unwrap().1.to_clip(30.0).unwrap_err();
        assert!(err.to_string().contains("dof has 2 frames"));
    }

    #[test]
    fn not_an_object_rejected() {
        assert!(matches!(
            SourceDump::from_json("[1, 2, 3]").unwrap_err(),
            IoError::Json(_)
        ));
    }
}
