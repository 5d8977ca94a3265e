use crate::error::RigError;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_BALL_ANGLE: f32 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    None,
    #[default]
    Ball,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::None => "none",
            ConstraintKind::Ball => "ball",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ConstraintKind::None),
            "ball" => Ok(ConstraintKind::Ball),
            other => Err(RigError::UnknownConstraintKind {
                value: other.to_string(),
            }),
        }
    }
}

pub(crate) fn check_angle(angle: f32) -> Result<f32, RigError> {
    if (0.0..=MAX_BALL_ANGLE).contains(&angle) {
        Ok(angle)
    } else {
        Err(RigError::AngleOutOfRange { angle })
    }
}

/// Cone limit: a joint may bend at most `angle` degrees away from its parent's direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallConstraint {
    angle: f32,
}

impl BallConstraint {
    pub fn new(angle_degrees: f32) -> Result<Self, RigError> {
        Ok(Self {
            angle: check_angle(angle_degrees)?,
        })
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle_degrees: f32) -> Result<(), RigError> {
        self.angle = check_angle(angle_degrees)?;
        Ok(())
    }

    pub fn max_angle(&self) -> f32 {
        self.angle.to_radians()
    }

    pub fn apply(&self, direction: Vec3, reference: Vec3) -> Vec3 {
        let dir = direction.normalize_or_zero();
        let ref_dir = reference.normalize_or_zero();

        if dir.length_squared() < 0.0001 || ref_dir.length_squared() < 0.0001 {
            return if dir.length_squared() < 0.0001 { ref_dir } else { dir };
        }

        let max_angle = self.max_angle();
        if dir.angle_between(ref_dir) <= max_angle {
            return dir;
        }

        let axis = ref_dir.cross(dir);
        if axis.length_squared() < 0.0001 {
            ref_dir
        } else {
            Quat::from_axis_angle(axis.normalize(), max_angle) * ref_dir
        }
    }
}

/// Angular limit attached to a joint. `None` leaves the joint free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    None,
    Ball(BallConstraint),
}

impl Constraint {
    /// Builds a constraint of `kind`. Only `ball` takes an angle.
    pub fn new(kind: ConstraintKind, angle: Option<f32>) -> Result<Self, RigError> {
        match (kind, angle) {
            (ConstraintKind::None, None) => Ok(Constraint::None),
            (ConstraintKind::None, Some(_)) => Err(RigError::InvalidConstraintOperation {
                kind,
                message: "an angle can only be given to a 'ball' constraint".to_string(),
            }),
            (ConstraintKind::Ball, Some(angle)) => Self::ball(angle),
            (ConstraintKind::Ball, None) => Err(RigError::MissingConstraintAngle),
        }
    }

    pub fn ball(angle_degrees: f32) -> Result<Self, RigError> {
        BallConstraint::new(angle_degrees).map(Constraint::Ball)
    }

    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::None => ConstraintKind::None,
            Constraint::Ball(_) => ConstraintKind::Ball,
        }
    }

    pub fn angle(&self) -> Option<f32> {
        match self {
            Constraint::None => None,
            Constraint::Ball(ball) => Some(ball.angle()),
        }
    }

    pub fn set_angle(&mut self, angle_degrees: f32) -> Result<(), RigError> {
        match self {
            Constraint::None => Err(RigError::InvalidConstraintOperation {
                kind: ConstraintKind::None,
                message: "can only set angle on a 'ball' constraint".to_string(),
            }),
            Constraint::Ball(ball) => ball.set_angle(angle_degrees),
        }
    }

    pub fn apply(&self, direction: Vec3, reference: Vec3) -> Vec3 {
        match self {
            Constraint::None => direction.normalize_or_zero(),
            Constraint::Ball(ball) => ball.apply(direction, reference),
        }
    }
}
