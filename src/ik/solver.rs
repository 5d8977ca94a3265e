use super::chain::ChainId;
use super::joint::JointId;
use super::rig::Rig;
use super::skeleton::SegmentId;
use super::target::{TargetId, TargetSet};
use glam::{Quat, Vec3};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub converged: bool,
    pub iterations: u32,
    /// Largest remaining effector-to-target distance.
    pub final_distance: f32,
}

/// Owns a built rig and solves its root chain (and every connected branch) with FABRIK.
#[derive(Debug, Clone)]
pub struct Ik {
    rig: Rig,
    root: ChainId,
    tolerance: f32,
    max_iterations: u32,
}

impl Ik {
    pub fn new(rig: Rig, root: ChainId) -> Self {
        Self {
            rig,
            root,
            tolerance: 0.001,
            max_iterations: 10,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut Rig {
        &mut self.rig
    }

    pub fn root(&self) -> ChainId {
        self.root
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The segment a renderer attaches to its scene graph.
    pub fn root_bone(&self) -> Option<SegmentId> {
        self.rig
            .chain(self.root)
            .base()
            .map(|joint| self.rig.joint(joint).segment())
    }

    /// Moves every effector toward its target and rewrites segment rotations to match.
    pub fn solve(&mut self, targets: &TargetSet) -> SolveResult {
        let order = self.rig.chain_tree(self.root);
        let effectors: Vec<(JointId, TargetId)> = order
            .iter()
            .filter_map(|c| {
                let joint = self.rig.chain(*c).effector()?;
                Some((joint, self.rig.joint(joint).target()?))
            })
            .collect();

        if effectors.is_empty() {
            return SolveResult {
                converged: true,
                iterations: 0,
                final_distance: 0.0,
            };
        }

        let skeleton = self.rig.skeleton();
        let mut positions: Vec<Vec3> = (0..self.rig.joint_count())
            .map(|i| skeleton.world_position(self.rig.joint(JointId(i)).segment()))
            .collect();
        let lengths: Vec<Vec<f32>> = (0..self.rig.chain_count())
            .map(|c| {
                self.rig
                    .chain(ChainId(c))
                    .joints()
                    .windows(2)
                    .map(|w| (positions[w[1].0] - positions[w[0].0]).length())
                    .collect()
            })
            .collect();

        let distance = |positions: &[Vec3]| {
            effectors
                .iter()
                .map(|(joint, target)| (positions[joint.0] - targets.position(*target)).length())
                .fold(0.0_f32, f32::max)
        };

        let initial = distance(&positions[..]);
        let mut result = SolveResult {
            converged: initial <= self.tolerance,
            iterations: 0,
            final_distance: initial,
        };
        if result.converged {
            return result;
        }

        let base = positions[self.rig.chain(self.root).joints()[0].0];
        for iteration in 0..self.max_iterations {
            Self::forward_pass(&self.rig, self.root, targets, &lengths, &mut positions);
            Self::backward_pass(&self.rig, self.root, base, &lengths, &mut positions);

            let final_distance = distance(&positions[..]);
            result = SolveResult {
                converged: final_distance <= self.tolerance,
                iterations: iteration + 1,
                final_distance,
            };
            if result.converged {
                break;
            }
        }

        self.apply_positions(&order, &positions);
        log::trace!(
            "solved {} effectors in {} iterations (distance {:.4})",
            effectors.len(),
            result.iterations,
            result.final_distance
        );
        result
    }

    /// Pulls each chain from its effector back to its base; returns where the base wants to be.
    fn forward_pass(
        rig: &Rig,
        chain_id: ChainId,
        targets: &TargetSet,
        lengths: &[Vec<f32>],
        positions: &mut [Vec3],
    ) -> Vec3 {
        let chain = rig.chain(chain_id);
        let joints = chain.joints();
        if joints.is_empty() {
            return Vec3::ZERO;
        }

        let mut pulls: BTreeMap<usize, (Vec3, f32)> = BTreeMap::new();
        for (&index, children) in chain.sub_chains() {
            for &child in children {
                let requested = Self::forward_pass(rig, child, targets, lengths, positions);
                let pull = pulls.entry(index).or_insert((Vec3::ZERO, 0.0));
                pull.0 += requested;
                pull.1 += 1.0;
            }
        }

        let end = chain.end_index();
        let end_joint = joints[end];
        positions[end_joint.0] = match rig.joint(end_joint).target() {
            Some(target) => targets.position(target),
            None => pulls
                .get(&end)
                .map(|(sum, count)| *sum / *count)
                .unwrap_or(positions[end_joint.0]),
        };

        let bone_lengths = &lengths[chain_id.0];
        for i in (0..end).rev() {
            let next_pos = positions[joints[i + 1].0];
            let curr_pos = positions[joints[i].0];

            let dir = curr_pos - next_pos;
            let len = dir.length();
            let direction = if len > 0.0001 { dir / len } else { Vec3::Y };

            let mut position = next_pos + direction * bone_lengths[i];
            if let Some((sum, count)) = pulls.get(&i) {
                position = (position + *sum) / (*count + 1.0);
            }
            positions[joints[i].0] = position;
        }

        positions[joints[0].0]
    }

    /// Re-anchors each chain at `base` and walks outward, applying joint constraints.
    fn backward_pass(
        rig: &Rig,
        chain_id: ChainId,
        base: Vec3,
        lengths: &[Vec<f32>],
        positions: &mut [Vec3],
    ) {
        let chain = rig.chain(chain_id);
        let joints = chain.joints();
        if joints.is_empty() {
            return;
        }

        positions[joints[0].0] = base;

        let bone_lengths = &lengths[chain_id.0];
        for i in 1..=chain.end_index() {
            let prev_pos = positions[joints[i - 1].0];
            let curr_pos = positions[joints[i].0];

            let dir = curr_pos - prev_pos;
            let len = dir.length();
            let mut direction = if len > 0.0001 { dir / len } else { Vec3::Y };

            if i >= 2 {
                if let Some(constraint) = rig.primary_constraint(joints[i - 1]) {
                    let reference = prev_pos - positions[joints[i - 2].0];
                    let constrained = constraint.apply(direction, reference);
                    if constrained.length_squared() > 0.0001 {
                        direction = constrained;
                    }
                }
            }

            positions[joints[i].0] = prev_pos + direction * bone_lengths[i - 1];
        }

        for (&index, children) in chain.sub_chains() {
            let sub_base = positions[joints[index].0];
            for &child in children {
                Self::backward_pass(rig, child, sub_base, lengths, positions);
            }
        }
    }

    /// Turns solved joint positions into local segment rotations, parents first.
    /// A branch never rotates its shared base; the parent chain owns it.
    fn apply_positions(&mut self, order: &[ChainId], positions: &[Vec3]) {
        for &chain_id in order {
            let chain = self.rig.chain(chain_id);
            let joints = chain.joints().to_vec();
            let end = chain.end_index();
            let is_branch = chain.parent().is_some();

            for i in 0..end {
                if is_branch && i == 0 {
                    continue;
                }

                let segment = self.rig.joint(joints[i]).segment();
                let child = self.rig.joint(joints[i + 1]).segment();
                let skeleton = self.rig.skeleton_mut();
                if !skeleton.is_child_of(child, segment) {
                    continue;
                }

                let world = skeleton.world_transform(segment);
                let current = world.transform_point(skeleton.segment(child).offset) - world.position;
                let desired = positions[joints[i + 1].0] - world.position;
                if current.length_squared() < 1e-8 || desired.length_squared() < 1e-8 {
                    continue;
                }

                let delta = Quat::from_rotation_arc(current.normalize(), desired.normalize());
                let parent_rotation = skeleton.parent_world_rotation(segment);
                let local = parent_rotation.inverse() * (delta * world.rotation);
                skeleton.segment_mut(segment).rotation = local.normalize();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::composer::{compose, MultiChainSpec};
    use crate::ik::rig::LinearChainSpec;
    use crate::ik::Constraint;

    fn reaching_arm(constraint: Constraint, target: Vec3) -> (Ik, TargetSet, TargetId) {
        let mut targets = TargetSet::new();
        let target = targets.add(target);
        let mut rig = Rig::new();
        let chain = rig
            .build_linear_chain(&LinearChainSpec {
                segments: 4,
                first_offset: Vec3::ZERO,
                offset: Vec3::Y,
                constraint,
                target: Some(target),
            })
            .unwrap();
        (Ik::new(rig, chain).with_max_iterations(20), targets, target)
    }

    #[test]
    fn reachable_target_converges() {
        let (mut ik, targets, target) = reaching_arm(Constraint::None, Vec3::new(1.5, 1.5, 0.0));
        let result = ik.solve(&targets);

        assert!(result.converged, "{result:?}");
        let tip = ik.rig().chain(ik.root()).effector().unwrap();
        let tip_segment = ik.rig().joint(tip).segment();
        let reached = ik.rig().skeleton().world_position(tip_segment);
        assert!(reached.abs_diff_eq(targets.position(target), 0.01), "{reached}");
    }

    #[test]
    fn solving_preserves_bone_lengths() {
        let (mut ik, targets, _) = reaching_arm(Constraint::ball(90.0).unwrap(), Vec3::new(2.0, 0.5, 1.0));
        ik.solve(&targets);

        let rig = ik.rig();
        let joints = rig.chain(ik.root()).joints();
        for pair in joints.windows(2) {
            let a = rig.skeleton().world_position(rig.joint(pair[0]).segment());
            let b = rig.skeleton().world_position(rig.joint(pair[1]).segment());
            assert!(((b - a).length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn loose_tolerance_accepts_nearby_tip() {
        let (ik, targets, _) = reaching_arm(Constraint::None, Vec3::new(0.0, 3.05, 0.0));
        let mut ik = ik.with_tolerance(0.1);
        let result = ik.solve(&targets);

        assert_eq!(ik.tolerance(), 0.1);
        assert!(result.converged, "{result:?}");
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn unreachable_target_stretches_toward_it() {
        let (mut ik, targets, _) = reaching_arm(Constraint::None, Vec3::new(10.0, 0.0, 0.0));
        let result = ik.solve(&targets);

        assert!(!result.converged);
        assert!((result.final_distance - 7.0).abs() < 0.05, "{result:?}");
    }

    #[test]
    fn chain_without_effector_is_left_alone() {
        let mut rig = Rig::new();
        let chain = rig
            .build_linear_chain(&LinearChainSpec {
                segments: 3,
                first_offset: Vec3::ZERO,
                offset: Vec3::Y,
                constraint: Constraint::None,
                target: None,
            })
            .unwrap();
        let mut ik = Ik::new(rig, chain);

        let result = ik.solve(&TargetSet::new());
        assert_eq!(result.iterations, 0);
        assert!(result.converged);
        assert_eq!(ik.root_bone(), Some(SegmentId(0)));
    }

    #[test]
    fn multi_effector_rig_moves_toward_targets() {
        let mut rig = Rig::new();
        let mut targets = TargetSet::new();
        let spec = MultiChainSpec::radial(16, 8, 8, 2, 0.5, Constraint::ball(360.0).unwrap());
        let multi = compose(&mut rig, &mut targets, &spec).unwrap();
        let mut ik = Ik::new(rig, multi.root);

        // every arm tip starts 3.5 above its fork, far from its ring target
        let initial = 10f32.sqrt();
        let result = ik.solve(&targets);

        assert!(result.final_distance.is_finite());
        assert!(result.final_distance < initial, "{result:?}");
        assert!(ik
            .rig()
            .skeleton()
            .ids()
            .all(|s| ik.rig().skeleton().world_position(s).is_finite()));
    }
}
