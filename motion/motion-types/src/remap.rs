//! Joint remap tables between source and target layouts.

use std::collections::{BTreeMap, HashSet};

use crate::error::{MotionError, Result};
use crate::layout::JointLayout;

/// Static mapping from source joint index to target joint index.
///
/// Target joints with no source stay at exactly `0.0`. A table is resolved
/// once per robot model and then shared by every clip.
///
/// # Example
///
/// ```
/// use motion_types::JointRemapTable;
///
/// // Source joint 1 is dropped; target joint 1 has no source.
/// let table = JointRemapTable::new(3, vec![Some(0), None, Some(2)]).unwrap();
/// let joints = table.apply(&[0.1, 0.2, 0.3]).unwrap();
/// assert_eq!(joints, vec![0.1, 0.0, 0.3]);
/// assert_eq!(table.unmapped_targets(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointRemapTable {
    destinations: Vec<Option<usize>>,
    target_dof: usize,
}

impl JointRemapTable {
    /// Creates a table from per-source destinations.
    ///
    /// `destinations[i]` is the target joint fed by source joint `i`, or
    /// `None` if that source joint is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidRemapTable`] if a destination is out of
    /// range or fed by more than one source joint.
    pub fn new(target_dof: usize, destinations: Vec<Option<usize>>) -> Result<Self> {
        let mut used = HashSet::with_capacity(destinations.len());
        for (source, destination) in destinations.iter().enumerate() {
            let Some(destination) = *destination else {
                continue;
            };
            if destination >= target_dof {
                return Err(MotionError::invalid_remap(format!(
                    "source joint {source} maps to target joint {destination}, \
                     but the target has only {target_dof} joints"
                )));
            }
            if !used.insert(destination) {
                return Err(MotionError::invalid_remap(format!(
                    "target joint {destination} is fed by more than one source joint"
                )));
            }
        }
        Ok(Self {
            destinations,
            target_dof,
        })
    }

    /// Identity table for two layouts with the same joints.
    #[must_use]
    pub fn identity(dof: usize) -> Self {
        Self {
            destinations: (0..dof).map(Some).collect(),
            target_dof: dof,
        }
    }

    /// Resolves a table by joint name.
    ///
    /// Each source joint feeds the target joint with the same name, unless it
    /// is listed in `dropped` or renamed through `rename`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidRemapTable`] if a source joint has no
    /// counterpart in the target and was not dropped, or if `dropped`/`rename`
    /// mention joints the source does not have.
    pub fn by_name(
        source: &JointLayout,
        target: &JointLayout,
        dropped: &[String],
        rename: &BTreeMap<String, String>,
    ) -> Result<Self> {
        for name in dropped.iter().chain(rename.keys()) {
            if source.joint_index(name).is_none() {
                return Err(MotionError::invalid_remap(format!(
                    "'{name}' is not a source joint"
                )));
            }
        }

        let destinations = source
            .joint_names()
            .iter()
            .map(|name| {
                if dropped.contains(name) {
                    return Ok(None);
                }
                let target_name = rename.get(name).unwrap_or(name);
                target.joint_index(target_name).map(Some).ok_or_else(|| {
                    MotionError::invalid_remap(format!(
                        "source joint '{name}' has no target joint '{target_name}'"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(target.dof(), destinations)
    }

    /// Number of source joints.
    #[must_use]
    pub fn source_dof(&self) -> usize {
        self.destinations.len()
    }

    /// Number of target joints.
    #[must_use]
    pub const fn target_dof(&self) -> usize {
        self.target_dof
    }

    /// Target joint fed by source joint `source`.
    #[must_use]
    pub fn destination(&self, source: usize) -> Option<usize> {
        self.destinations.get(source).copied().flatten()
    }

    /// Target joints that no source joint feeds, in ascending order.
    #[must_use]
    pub fn unmapped_targets(&self) -> Vec<usize> {
        let mapped: HashSet<usize> = self.destinations.iter().flatten().copied().collect();
        (0..self.target_dof)
            .filter(|index| !mapped.contains(index))
            .collect()
    }

    /// Maps source joint angles into the target layout.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] if `source_joints` does not
    /// hold exactly [`source_dof`](Self::source_dof) values.
    pub fn apply(&self, source_joints: &[f64]) -> Result<Vec<f64>> {
        if source_joints.len() != self.destinations.len() {
            return Err(MotionError::malformed(
                self.destinations.len(),
                source_joints.len(),
            ));
        }
        let mut target = vec![0.0; self.target_dof];
        for (value, destination) in source_joints.iter().zip(&self.destinations) {
            if let Some(destination) = destination {
                target[*destination] = *value;
            }
        }
        Ok(target)
    }
}
