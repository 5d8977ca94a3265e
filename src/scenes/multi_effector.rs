use super::{Scene, SceneError};
use crate::config::{DemoConfig, HelperSettings};
use crate::ik::{
    compose, ArmChain, Constraint, ConstraintKind, ConstraintMutator, Ik, MultiChainSpec, Rig,
    SolveResult, TargetSet,
};
use crate::math::Transform;
use glam::Quat;
use std::f32::consts::FRAC_PI_2;

const DISTANCE: f32 = 0.5;
const ROOT_COUNT: usize = 16;
const ARM_COUNT: usize = 8;
const ARM_SEGMENTS: usize = 8;
const ARM_GROUPS: usize = 2;

/// A trunk with two rings of arms, each arm reaching for its own target.
pub struct MultiEffectorScene {
    ik: Ik,
    targets: TargetSet,
    arms: Vec<ArmChain>,
    mutator: ConstraintMutator,
    helper: HelperSettings,
}

impl MultiEffectorScene {
    pub fn new(config: &DemoConfig) -> Result<Self, SceneError> {
        let constraint = Constraint::new(ConstraintKind::Ball, Some(config.constraint_angle))?;
        let spec = MultiChainSpec::radial(
            ROOT_COUNT,
            ARM_COUNT,
            ARM_SEGMENTS,
            ARM_GROUPS,
            DISTANCE,
            constraint,
        );

        let mut rig = Rig::new();
        let mut targets = TargetSet::new();
        let built = compose(&mut rig, &mut targets, &spec)?;
        // the trunk hangs off a pivot tipped a quarter turn about X
        rig.skeleton_mut()
            .set_base(Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)));

        let mut scene = Self {
            ik: Ik::new(rig, built.root),
            targets,
            arms: built.arms,
            mutator: ConstraintMutator::new(),
            helper: HelperSettings::default(),
        };
        scene.on_config_change(config)?;
        Ok(scene)
    }

    pub fn arms(&self) -> &[ArmChain] {
        &self.arms
    }

    /// Drag handles write here; the rig only reads target positions.
    pub fn targets_mut(&mut self) -> &mut TargetSet {
        &mut self.targets
    }

    pub fn mutator(&self) -> &ConstraintMutator {
        &self.mutator
    }
}

impl Scene for MultiEffectorScene {
    fn name(&self) -> &'static str {
        "multi-effector"
    }

    fn tick(&mut self, _dt: f32) -> Option<SolveResult> {
        Some(self.ik.solve(&self.targets))
    }

    fn on_config_change(&mut self, config: &DemoConfig) -> Result<(), SceneError> {
        let root = self.ik.root();
        self.mutator
            .apply(self.ik.rig_mut(), root, config.constraint())?;
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
    use crate::error::RigError;
    use glam::Vec3;

    #[test]
    fn builds_two_rings_of_arms() {
        let scene = MultiEffectorScene::new(&DemoConfig::default()).unwrap();

        assert_eq!(scene.arms().len(), ARM_COUNT);
        assert_eq!(scene.targets().len(), ARM_COUNT);
        let heights: Vec<f32> = scene.targets().iter().map(|(_, p)| p.y).collect();
        assert_eq!(heights, vec![4.0, 4.0, 4.0, 4.0, 8.0, 8.0, 8.0, 8.0]);
        assert_eq!(
            scene.mutator().applied(),
            Some(DemoConfig::default().constraint())
        );

        let ik = scene.ik().unwrap();
        let trunk = ik.rig().chain(ik.root());
        let tip = ik.rig().joint(trunk.joints()[ROOT_COUNT - 1]).segment();
        let reached = ik.rig().skeleton().world_position(tip);
        assert!(reached.abs_diff_eq(Vec3::new(0.0, 0.0, -7.5), 1e-4), "{reached}");
    }

    #[test]
    fn angle_edit_under_none_surfaces_error() {
        let mut scene = MultiEffectorScene::new(&DemoConfig::default()).unwrap();
        let none = DemoConfig {
            constraint_type: ConstraintKind::None,
            ..DemoConfig::default()
        };
        scene.on_config_change(&none).unwrap();

        let err = scene
            .on_config_change(&DemoConfig {
                constraint_angle: 45.0,
                ..none
            })
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::Rig(RigError::InvalidConstraintOperation { .. })
        ));
    }

    #[test]
    fn ticks_solve_every_arm() {
        let mut scene = MultiEffectorScene::new(&DemoConfig::default()).unwrap();
        let first = scene.tick(1.0 / 60.0).unwrap();
        let second = scene.tick(1.0 / 60.0).unwrap();

        assert!(first.final_distance.is_finite());
        assert!(second.final_distance.is_finite());
        assert!(first.iterations > 0);
    }
}
