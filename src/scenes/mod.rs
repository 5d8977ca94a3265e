//! Demo scenes
//!
//! Each scene owns its rig and targets and is advanced one frame at a time by
//! whatever host drives it (the `ik-demo` binary runs them headless).

pub mod multi_effector;
pub mod sample_bone;
pub mod simple;

pub use multi_effector::MultiEffectorScene;
pub use sample_bone::{CylinderSizing, SampleBoneScene, SkinnedVertex};
pub use simple::SimpleScene;

use crate::config::{ConfigError, DemoConfig, HelperSettings};
use crate::error::RigError;
use crate::ik::{Ik, SolveResult, TargetSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Rig(#[from] RigError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advances one frame. Returns the solve outcome for scenes that run IK.
    fn tick(&mut self, dt: f32) -> Option<SolveResult>;

    fn on_config_change(&mut self, config: &DemoConfig) -> Result<(), SceneError>;

    fn helper(&self) -> &HelperSettings;

    fn targets(&self) -> &TargetSet;

    fn ik(&self) -> Option<&Ik>;
}
