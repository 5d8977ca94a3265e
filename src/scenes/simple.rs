use super::{Scene, SceneError};
use crate::config::{DemoConfig, HelperSettings};
use crate::error::RigError;
use crate::ik::{Constraint, Ik, LinearChainSpec, Rig, SolveResult, TargetId, TargetSet};
use glam::{EulerRot, Quat, Vec3};

const MAX_JOINTS: usize = 7;
const BONE_LENGTH: f32 = 0.5;
const BALL_ANGLE: f32 = 90.0;
const PIVOT_SPIN: f32 = 0.01;

/// A single chain chasing a target that rides on a tumbling pivot.
pub struct SimpleScene {
    ik: Ik,
    targets: TargetSet,
    target: TargetId,
    target_rest: Vec3,
    pivot: Vec3,
    helper: HelperSettings,
}

impl SimpleScene {
    pub fn new() -> Result<Self, RigError> {
        let target_rest = Vec3::new(0.0, 0.0, 2.0);
        let mut targets = TargetSet::new();
        let target = targets.add(target_rest);

        let mut rig = Rig::new();
        let chain = rig.build_linear_chain(&LinearChainSpec {
            segments: MAX_JOINTS,
            first_offset: Vec3::ZERO,
            offset: Vec3::new(0.0, BONE_LENGTH, 0.0),
            constraint: Constraint::ball(BALL_ANGLE)?,
            target: Some(target),
        })?;

        Ok(Self {
            ik: Ik::new(rig, chain),
            targets,
            target,
            target_rest,
            pivot: Vec3::ZERO,
            helper: HelperSettings::default(),
        })
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    fn pivot_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pivot.x, self.pivot.y, self.pivot.z)
    }
}

impl Scene for SimpleScene {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn tick(&mut self, _dt: f32) -> Option<SolveResult> {
        self.pivot += Vec3::splat(PIVOT_SPIN);
        let position = self.pivot_rotation() * self.target_rest;
        self.targets.set_position(self.target, position);
        Some(self.ik.solve(&self.targets))
    }

    fn on_config_change(&mut self, config: &DemoConfig) -> Result<(), SceneError> {
        self.helper = config.helper()?;
        Ok(())
    }

    fn helper(&self) -> &HelperSettings {
        &self.helper
    }

    fn targets(&self) -> &TargetSet {
        &self.targets
    }

    fn ik(&self) -> Option<&Ik> {
        Some(&self.ik)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_seven_joint_chain_with_tip_effector() {
        let scene = SimpleScene::new().unwrap();
        let ik = scene.ik().unwrap();
        let chain = ik.rig().chain(ik.root());

        assert_eq!(chain.joint_count(), MAX_JOINTS);
        assert_eq!(chain.effector_index(), Some(MAX_JOINTS - 1));
        assert_eq!(
            ik.rig().primary_constraint(chain.joints()[3]),
            Some(&Constraint::ball(90.0).unwrap())
        );
    }

    #[test]
    fn tick_carries_target_around_pivot() {
        let mut scene = SimpleScene::new().unwrap();
        let result = scene.tick(1.0 / 60.0).unwrap();

        let position = scene.targets().position(scene.target());
        assert!((position.length() - 2.0).abs() < 1e-5);
        assert!(!position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-4));
        assert!(result.iterations > 0);
    }

    #[test]
    fn config_change_refreshes_helper() {
        let mut scene = SimpleScene::new().unwrap();
        let config = DemoConfig {
            wireframe: false,
            color: "#00ff00".to_string(),
            ..DemoConfig::default()
        };
        scene.on_config_change(&config).unwrap();

        assert!(!scene.helper().wireframe);
        assert_eq!(scene.helper().color, [0.0, 1.0, 0.0, 1.0]);
    }
}
