use super::{Scene, SceneError};
use crate::config::{DemoConfig, HelperSettings};
use crate::ik::{Ik, SegmentId, Skeleton, SolveResult, TargetSet};
use glam::{Quat, Vec3};
use std::f32::consts::PI;

const CYLINDER_RADIUS: f32 = 5.0;
const RADIAL_SEGMENTS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSizing {
    pub segment_height: f32,
    pub segment_count: usize,
}

impl Default for CylinderSizing {
    fn default() -> Self {
        Self {
            segment_height: 8.0,
            segment_count: 4,
        }
    }
}

impl CylinderSizing {
    pub fn height(&self) -> f32 {
        self.segment_height * self.segment_count as f32
    }

    pub fn half_height(&self) -> f32 {
        self.height() * 0.5
    }

    /// One bone per segment plus the root.
    pub fn bone_count(&self) -> usize {
        self.segment_count + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub skin_index: [u16; 4],
    pub skin_weight: [f32; 4],
}

/// Open-ended cylinder along Y, each vertex bound to the two bones it sits between.
pub fn skin_cylinder(sizing: &CylinderSizing, radius: f32, radial_segments: u32) -> Vec<SkinnedVertex> {
    let height_segments = (sizing.segment_count * 3).max(1);
    let height = sizing.height();
    let half_height = sizing.half_height();
    let last_bone = sizing.segment_count as u16;

    let mut vertices = Vec::new();
    for row in 0..=height_segments {
        let y = half_height - height * row as f32 / height_segments as f32;

        let lifted = y + half_height;
        let skin_index = ((lifted / sizing.segment_height).floor().max(0.0) as u16).min(last_bone);
        let skin_weight = (lifted % sizing.segment_height) / sizing.segment_height;
        let next_bone = (skin_index + 1).min(last_bone);

        for seg in 0..=radial_segments {
            let theta = 2.0 * PI * seg as f32 / radial_segments as f32;
            vertices.push(SkinnedVertex {
                position: Vec3::new(radius * theta.sin(), y, radius * theta.cos()),
                skin_index: [skin_index, next_bone, 0, 0],
                skin_weight: [1.0 - skin_weight, skin_weight, 0.0, 0.0],
            });
        }
    }
    vertices
}

/// Bones laid through a skinned cylinder, optionally wiggled over time. No IK.
pub struct SampleBoneScene {
    skeleton: Skeleton,
    bones: Vec<SegmentId>,
    vertices: Vec<SkinnedVertex>,
    targets: TargetSet,
    animate_bones: bool,
    time: f32,
    helper: HelperSettings,
}

impl SampleBoneScene {
    pub fn new(sizing: CylinderSizing) -> Self {
        let mut skeleton = Skeleton::new();
        let bones = skeleton.build_centered_run(
            sizing.bone_count(),
            Vec3::new(0.0, sizing.segment_height, 0.0),
        );
        let vertices = skin_cylinder(&sizing, CYLINDER_RADIUS, RADIAL_SEGMENTS);

        Self {
            skeleton,
            bones,
            vertices,
            targets: TargetSet::new(),
            animate_bones: false,
            time: 0.0,
            helper: HelperSettings::default(),
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn bones(&self) -> &[SegmentId] {
        &self.bones
    }

    pub fn vertices(&self) -> &[SkinnedVertex] {
        &self.vertices
    }

    pub fn set_animate_bones(&mut self, animate: bool) {
        self.animate_bones = animate;
    }

    /// Back to the bind pose.
    pub fn pose(&mut self) {
        for &bone in &self.bones {
            self.skeleton.segment_mut(bone).rotation = Quat::IDENTITY;
        }
    }
}

impl Scene for SampleBoneScene {
    fn name(&self) -> &'static str {
        "sample-bone"
    }

    fn tick(&mut self, dt: f32) -> Option<SolveResult> {
        self.time += dt;
        if self.animate_bones {
            let angle = self.time.sin() * 2.0 / self.bones.len() as f32;
            for &bone in &self.bones {
                self.skeleton.segment_mut(bone).rotation = Quat::from_rotation_z(angle);
            }
        }
        None
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
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bones_are_centered_on_the_cylinder() {
        let scene = SampleBoneScene::new(CylinderSizing::default());
        let bones = scene.bones();

        assert_eq!(bones.len(), 5);
        assert!(scene
            .skeleton()
            .world_position(bones[0])
            .abs_diff_eq(Vec3::new(0.0, -16.0, 0.0), 1e-4));
        assert!(scene
            .skeleton()
            .world_position(bones[4])
            .abs_diff_eq(Vec3::new(0.0, 16.0, 0.0), 1e-4));
    }

    #[test]
    fn skin_weights_blend_neighbouring_bones() {
        let sizing = CylinderSizing::default();
        let vertices = skin_cylinder(&sizing, 5.0, 8);

        assert_eq!(vertices.len(), 13 * 9);
        for v in &vertices {
            assert!((v.skin_weight.iter().sum::<f32>() - 1.0).abs() < 1e-5);
            assert!(v.skin_index[0] <= 4 && v.skin_index[1] <= 4);
            assert!(v.skin_weight[0] >= 0.0 && v.skin_weight[1] >= 0.0);
        }

        let bottom = vertices.last().unwrap();
        assert_eq!(bottom.position.y, -16.0);
        assert_eq!(bottom.skin_index[0], 0);
        assert_eq!(bottom.skin_weight[0], 1.0);
    }

    #[test]
    fn animation_wiggles_and_pose_resets() {
        let mut scene = SampleBoneScene::new(CylinderSizing::default());
        scene.tick(0.5);
        assert_eq!(scene.skeleton().segment(scene.bones()[1]).rotation, Quat::IDENTITY);

        scene.set_animate_bones(true);
        scene.tick(0.5);
        let expected = Quat::from_rotation_z(1.0f32.sin() * 2.0 / 5.0);
        assert!(scene
            .skeleton()
            .segment(scene.bones()[1])
            .rotation
            .abs_diff_eq(expected, 1e-6));

        scene.pose();
        assert_eq!(scene.skeleton().segment(scene.bones()[1]).rotation, Quat::IDENTITY);
    }
}
