//! Branching rigs: one trunk chain with arms spliced onto its joints.

use super::chain::ChainId;
use super::constraint::Constraint;
use super::rig::Rig;
use super::target::{TargetId, TargetSet};
use crate::error::RigError;
use glam::Vec3;
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct ArmSpec {
    /// Index of the root joint the arm starts from.
    pub sub_base: usize,
    /// Segment count including the shared sub-base.
    pub segments: usize,
    pub target: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiChainSpec {
    pub root_segments: usize,
    pub segment_length: f32,
    pub constraint: Constraint,
    pub arms: Vec<ArmSpec>,
}

impl MultiChainSpec {
    /// Arms split into `groups` equal groups; group `g` forks at the end of the
    /// `(g + 1)`-th slice of the trunk and its targets ring the trunk at that height.
    pub fn radial(
        root_segments: usize,
        arm_count: usize,
        arm_segments: usize,
        groups: usize,
        segment_length: f32,
        constraint: Constraint,
    ) -> Self {
        let groups = groups.max(1);
        let per_group = arm_count.div_ceil(groups).max(1);
        let step = TAU / per_group as f32;

        let arms = (0..arm_count)
            .map(|arm| {
                let group = arm / per_group;
                let slot = arm % per_group;
                let sub_base = (root_segments * (group + 1) / groups).wrapping_sub(1);
                let height =
                    root_segments as f32 * segment_length * (group + 1) as f32 / groups as f32;
                let angle = step * slot as f32;

                ArmSpec {
                    sub_base,
                    segments: arm_segments,
                    target: Vec3::new(angle.cos(), height, angle.sin()),
                }
            })
            .collect();

        Self {
            root_segments,
            segment_length,
            constraint,
            arms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmChain {
    pub chain: ChainId,
    pub sub_base: usize,
    pub target: TargetId,
}

/// Registry of what [`compose`] built, one entry per arm in build order.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChain {
    pub root: ChainId,
    pub arms: Vec<ArmChain>,
}

pub fn compose(
    rig: &mut Rig,
    targets: &mut TargetSet,
    spec: &MultiChainSpec,
) -> Result<MultiChain, RigError> {
    let offset = Vec3::new(0.0, spec.segment_length, 0.0);

    let root = rig.new_chain();
    let root_constraint = rig.add_constraint(spec.constraint);
    let trunk = rig
        .skeleton_mut()
        .build_run(None, spec.root_segments, Vec3::ZERO, offset);
    for segment in trunk {
        rig.add_joint(root, segment, &[root_constraint], None)?;
    }

    let root_joints = rig.chain(root).joints().to_vec();
    let mut arms = Vec::with_capacity(spec.arms.len());

    for (index, arm) in spec.arms.iter().enumerate() {
        let Some(&sub_base) = root_joints.get(arm.sub_base) else {
            return Err(RigError::MalformedSubBaseIndex {
                arm: index,
                index: arm.sub_base,
                len: root_joints.len(),
            });
        };
        if arm.segments < 2 {
            return Err(RigError::ArmTooShort {
                arm: index,
                segments: arm.segments,
            });
        }

        let target = targets.add(arm.target);
        let chain = rig.new_chain();
        let constraint = rig.add_constraint(spec.constraint);

        rig.add_shared_joint(chain, sub_base);
        let base_segment = rig.joint(sub_base).segment();
        let segments =
            rig.skeleton_mut()
                .build_run(Some(base_segment), arm.segments - 1, offset, offset);

        let last = segments.len() - 1;
        for (i, segment) in segments.into_iter().enumerate() {
            let effector = if i == last { Some(target) } else { None };
            rig.add_joint(chain, segment, &[constraint], effector)?;
        }

        rig.connect(root, chain)?;
        arms.push(ArmChain {
            chain,
            sub_base: arm.sub_base,
            target,
        });
    }

    log::debug!(
        "composed root of {} joints with {} arms",
        root_joints.len(),
        arms.len()
    );
    Ok(MultiChain { root, arms })
}
