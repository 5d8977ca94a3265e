use super::joint::JointId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId(pub(crate) usize);

/// Ordered joints solved as one arm, plus the chains branching off its joints.
#[derive(Debug, Clone, Default)]
pub struct Chain {
    pub(crate) joints: Vec<JointId>,
    pub(crate) effector: Option<usize>,
    pub(crate) sub_chains: BTreeMap<usize, Vec<ChainId>>,
    pub(crate) parent: Option<ChainId>,
}

impl Chain {
    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn base(&self) -> Option<JointId> {
        self.joints.first().copied()
    }

    pub fn effector_index(&self) -> Option<usize> {
        self.effector
    }

    pub fn effector(&self) -> Option<JointId> {
        self.effector.map(|i| self.joints[i])
    }

    /// Last joint index the solver moves: the effector, or the tip when there is none.
    pub(crate) fn end_index(&self) -> usize {
        self.effector
            .unwrap_or_else(|| self.joints.len().saturating_sub(1))
    }

    /// Child chains keyed by the joint index they are attached at.
    pub fn sub_chains(&self) -> &BTreeMap<usize, Vec<ChainId>> {
        &self.sub_chains
    }

    pub fn parent(&self) -> Option<ChainId> {
        self.parent
    }
}
