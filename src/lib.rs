//! # ik-rig
//!
//! Procedural inverse-kinematics rigs: bone chains built from a segment arena,
//! branching multi-effector skeletons, and constraint edits applied live to an
//! already built rig.
//!
//! ## Features
//! - Segment factory with straight and centered runs
//! - Shared ball / none constraints, editable in place
//! - Multi-chain composer splicing arms onto trunk joints
//! - FABRIK solver over the whole chain tree
//! - Headless demo scenes driven frame by frame
//!
//! ## Example
//! ```rust,ignore
//! use ik_rig::ik::{Constraint, Ik, LinearChainSpec, Rig, TargetSet};
//! use glam::Vec3;
//!
//! let mut targets = TargetSet::new();
//! let target = targets.add(Vec3::new(0.0, 0.0, 2.0));
//!
//! let mut rig = Rig::new();
//! let chain = rig.build_linear_chain(&LinearChainSpec {
//!     segments: 7,
//!     first_offset: Vec3::ZERO,
//!     offset: Vec3::new(0.0, 0.5, 0.0),
//!     constraint: Constraint::ball(90.0)?,
//!     target: Some(target),
//! })?;
//!
//! let mut ik = Ik::new(rig, chain);
//! let result = ik.solve(&targets);
//! println!("Converged: {}, iterations: {}", result.converged, result.iterations);
//! ```

pub mod config;
pub mod error;
pub mod ik;
pub mod math;
pub mod scenes;

pub use config::{ConfigError, DemoConfig, HelperSettings};
pub use error::RigError;
pub use ik::{
    compose, Constraint, ConstraintConfig, ConstraintKind, ConstraintMutator, Ik, MultiChainSpec,
    Rig, SolveResult, TargetSet,
};
pub use math::Transform;
pub use scenes::{MultiEffectorScene, SampleBoneScene, Scene, SimpleScene};
