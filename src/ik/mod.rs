//! Inverse Kinematics module
//!
//! Segment arena, chain assembly, branching composition, live constraint
//! editing and the FABRIK solver handle.

pub mod chain;
pub mod composer;
pub mod constraint;
pub mod joint;
pub mod mutator;
pub mod rig;
pub mod skeleton;
pub mod solver;
pub mod target;

pub use chain::{Chain, ChainId};
pub use composer::{compose, ArmChain, ArmSpec, MultiChain, MultiChainSpec};
pub use constraint::{BallConstraint, Constraint, ConstraintKind};
pub use joint::{Joint, JointId};
pub use mutator::{ConstraintConfig, ConstraintMutator, Mutation};
pub use rig::{ConstraintId, LinearChainSpec, Rig};
pub use skeleton::{Segment, SegmentId, Skeleton};
pub use solver::{Ik, SolveResult};
pub use target::{TargetId, TargetSet};
