use super::rig::ConstraintId;
use super::skeleton::SegmentId;
use super::target::TargetId;

/// Handle to a joint stored in a [`Rig`](super::Rig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub(crate) usize);

#[derive(Debug, Clone)]
pub struct Joint {
    segment: SegmentId,
    pub(crate) constraints: Vec<ConstraintId>,
    pub(crate) target: Option<TargetId>,
}

impl Joint {
    pub fn new(segment: SegmentId) -> Self {
        Self {
            segment,
            constraints: Vec::new(),
            target: None,
        }
    }

    pub fn with_constraints(mut self, constraints: &[ConstraintId]) -> Self {
        self.constraints = constraints.to_vec();
        self
    }

    pub fn segment(&self) -> SegmentId {
        self.segment
    }

    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    /// The constraint the solver and the live editor act on.
    pub fn primary_constraint(&self) -> Option<ConstraintId> {
        self.constraints.first().copied()
    }

    /// Overwrites slot 0, or fills it when the joint had no constraint yet.
    pub fn set_primary_constraint(&mut self, constraint: ConstraintId) {
        match self.constraints.first_mut() {
            Some(slot) => *slot = constraint,
            None => self.constraints.push(constraint),
        }
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }
}
