use super::chain::{Chain, ChainId};
use super::constraint::Constraint;
use super::joint::{Joint, JointId};
use super::skeleton::{SegmentId, Skeleton};
use super::target::TargetId;
use crate::error::RigError;
use glam::Vec3;

/// Handle to a constraint shared between joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub(crate) usize);

/// Everything a scene builds before handing it to the solver: segments, joints,
/// shared constraints and the chains threading through them.
///
/// Arenas only grow. A constraint type swap rebuilds each chain's constraint in the
/// slot it already holds, so repeated swaps do not add constraints.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    skeleton: Skeleton,
    joints: Vec<Joint>,
    constraints: Vec<Constraint>,
    chains: Vec<Chain>,
}

/// A straight chain built in one go: segments, one shared constraint, target on the tip.
#[derive(Debug, Clone)]
pub struct LinearChainSpec {
    pub segments: usize,
    pub first_offset: Vec3,
    pub offset: Vec3,
    pub constraint: Constraint,
    pub target: Option<TargetId>,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        self.constraints.push(constraint);
        ConstraintId(self.constraints.len() - 1)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.0]
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> &mut Constraint {
        &mut self.constraints[id.0]
    }

    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0]
    }

    pub fn joint_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.joints[id.0]
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// The constraint in slot 0 of `joint`, if any.
    pub fn primary_constraint(&self, joint: JointId) -> Option<&Constraint> {
        self.joints[joint.0]
            .primary_constraint()
            .map(|c| &self.constraints[c.0])
    }

    pub fn new_chain(&mut self) -> ChainId {
        self.chains.push(Chain::default());
        ChainId(self.chains.len() - 1)
    }

    pub fn chain(&self, id: ChainId) -> &Chain {
        &self.chains[id.0]
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Appends a new joint wrapping `segment`. Supplying a target makes it the chain's effector.
    pub fn add_joint(
        &mut self,
        chain: ChainId,
        segment: SegmentId,
        constraints: &[ConstraintId],
        target: Option<TargetId>,
    ) -> Result<JointId, RigError> {
        if target.is_some() {
            if let Some(index) = self.chains[chain.0].effector {
                return Err(RigError::DuplicateEffector { chain, index });
            }
        }

        let id = JointId(self.joints.len());
        let mut joint = Joint::new(segment).with_constraints(constraints);
        joint.target = target;
        self.joints.push(joint);

        let chain_ref = &mut self.chains[chain.0];
        chain_ref.joints.push(id);
        if target.is_some() {
            chain_ref.effector = Some(chain_ref.joints.len() - 1);
        }
        Ok(id)
    }

    /// Appends a joint that already belongs to another chain (a sub-base).
    pub fn add_shared_joint(&mut self, chain: ChainId, joint: JointId) {
        self.chains[chain.0].joints.push(joint);
    }

    /// Registers `child` as a branch of `parent` at the joint `child` starts from.
    ///
    /// A chain has at most one parent, and the chain graph stays a tree.
    pub fn connect(&mut self, parent: ChainId, child: ChainId) -> Result<(), RigError> {
        if let Some(existing) = self.chains[child.0].parent {
            return Err(RigError::AlreadyConnected {
                child,
                parent: existing,
            });
        }
        if self.chain_tree(child).contains(&parent) {
            return Err(RigError::ChainCycle { parent, child });
        }

        let base = self.chains[child.0].base();
        let index = base.and_then(|b| self.chains[parent.0].joints.iter().position(|j| *j == b));

        let Some(index) = index else {
            return Err(RigError::DisconnectedChain {
                parent,
                child,
                joint: base,
            });
        };

        self.chains[parent.0]
            .sub_chains
            .entry(index)
            .or_default()
            .push(child);
        self.chains[child.0].parent = Some(parent);
        log::debug!("connected chain {:?} to {:?} at joint {}", child, parent, index);
        Ok(())
    }

    /// `root` followed by every chain connected below it, depth first, in connection order.
    pub fn chain_tree(&self, root: ChainId) -> Vec<ChainId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let children: Vec<ChainId> = self.chains[id.0]
                .sub_chains
                .values()
                .flatten()
                .copied()
                .collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    pub fn build_linear_chain(&mut self, spec: &LinearChainSpec) -> Result<ChainId, RigError> {
        let chain = self.new_chain();
        let constraint = self.add_constraint(spec.constraint);
        let segments = self
            .skeleton
            .build_run(None, spec.segments, spec.first_offset, spec.offset);

        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.into_iter().enumerate() {
            let target = if i == last { spec.target } else { None };
            self.add_joint(chain, segment, &[constraint], target)?;
        }
        Ok(chain)
    }
}
