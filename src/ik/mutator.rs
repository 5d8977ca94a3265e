//! Live constraint editing on an already built rig.

use super::chain::ChainId;
use super::constraint::{check_angle, Constraint, ConstraintKind};
use super::joint::JointId;
use super::rig::{ConstraintId, Rig};
use crate::error::RigError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintConfig {
    pub kind: ConstraintKind,
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MutatorState {
    Unset,
    Configured(ConstraintConfig),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mutation {
    Unchanged,
    /// Every chain's own joints now share one constraint of `kind`, rebuilt in that
    /// chain's existing constraint slot when it has one.
    Replaced { kind: ConstraintKind, joints: usize },
    /// Existing ball constraints had their angle rewritten in place.
    AngleUpdated { angle: f32, constraints: usize },
}

/// Applies UI constraint edits to every chain hanging off a root.
#[derive(Debug, Clone)]
pub struct ConstraintMutator {
    state: MutatorState,
}

impl Default for ConstraintMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintMutator {
    pub fn new() -> Self {
        Self {
            state: MutatorState::Unset,
        }
    }

    pub fn applied(&self) -> Option<ConstraintConfig> {
        match self.state {
            MutatorState::Unset => None,
            MutatorState::Configured(config) => Some(config),
        }
    }

    pub fn apply(
        &mut self,
        rig: &mut Rig,
        root: ChainId,
        config: ConstraintConfig,
    ) -> Result<Mutation, RigError> {
        let previous = self.applied();

        if previous.map(|p| p.kind) != Some(config.kind) {
            let joints = replace_constraints(rig, root, config)?;
            self.state = MutatorState::Configured(config);
            log::info!("constraint type set to '{}' on {} joints", config.kind, joints);
            return Ok(Mutation::Replaced {
                kind: config.kind,
                joints,
            });
        }

        let Some(previous) = previous else {
            return Ok(Mutation::Unchanged);
        };
        if previous.angle == config.angle {
            return Ok(Mutation::Unchanged);
        }

        if previous.kind != ConstraintKind::Ball {
            log::warn!(
                "rejected angle {} while constraint type is '{}'",
                config.angle,
                previous.kind
            );
            return Err(RigError::InvalidConstraintOperation {
                kind: previous.kind,
                message: "can only set angle on a 'ball' constraint".to_string(),
            });
        }

        let angle = check_angle(config.angle)?;
        let ids = primary_constraints(rig, root);
        let mut updated = 0;
        for id in ids {
            if let Constraint::Ball(ball) = rig.constraint_mut(id) {
                ball.set_angle(angle)?;
                updated += 1;
            }
        }

        self.state = MutatorState::Configured(ConstraintConfig {
            kind: previous.kind,
            angle,
        });
        log::info!("constraint angle set to {} on {} constraints", angle, updated);
        Ok(Mutation::AngleUpdated {
            angle,
            constraints: updated,
        })
    }
}

fn replace_constraints(
    rig: &mut Rig,
    root: ChainId,
    config: ConstraintConfig,
) -> Result<usize, RigError> {
    let constraint = match config.kind {
        ConstraintKind::None => Constraint::None,
        ConstraintKind::Ball => Constraint::ball(config.angle)?,
    };

    let mut claimed = BTreeSet::new();
    let mut touched = 0;
    for chain in rig.chain_tree(root) {
        // a branch's base joint belongs to its parent chain
        let chain_ref = rig.chain(chain);
        let skip = usize::from(chain != root && chain_ref.parent().is_some());
        let joints: Vec<JointId> = chain_ref.joints().iter().skip(skip).copied().collect();

        let current = joints
            .iter()
            .find_map(|joint| rig.joint(*joint).primary_constraint());
        let id = match current {
            Some(id) if claimed.insert(id) => {
                *rig.constraint_mut(id) = constraint;
                id
            }
            _ => {
                let id = rig.add_constraint(constraint);
                claimed.insert(id);
                id
            }
        };

        for joint in joints {
            rig.joint_mut(joint).set_primary_constraint(id);
            touched += 1;
        }
    }
    Ok(touched)
}

fn primary_constraints(rig: &Rig, root: ChainId) -> BTreeSet<ConstraintId> {
    rig.chain_tree(root)
        .into_iter()
        .flat_map(|chain| rig.chain(chain).joints().to_vec())
        .filter_map(|joint| rig.joint(joint).primary_constraint())
        .collect()
}
