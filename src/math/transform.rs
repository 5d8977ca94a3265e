use glam::{Mat4, Quat, Vec3};

/// Rigid transform of a segment, either local to its parent or in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.position
    }

    /// Places `child` (expressed in this transform's space) into the parent space.
    pub fn mul_transform(&self, child: &Self) -> Self {
        Self {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn composing_applies_parent_rotation_to_child_offset() {
        let parent = Transform::from_position_rotation(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_z(FRAC_PI_2));
        let child = Transform::from_position(Vec3::Y);

        let world = parent.mul_transform(&child);
        assert!(world.position.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
        assert!(world.to_matrix().transform_point3(Vec3::ZERO).abs_diff_eq(world.position, 1e-5));
    }
}
