use thiserror::Error;

use crate::ik::{ChainId, ConstraintKind, JointId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    #[error("chain {chain:?} already has an effector at joint index {index}")]
    DuplicateEffector { chain: ChainId, index: usize },

    #[error("operation not supported by '{kind}' constraint: {message}")]
    InvalidConstraintOperation {
        kind: ConstraintKind,
        message: String,
    },

    #[error("'ball' constraint requires an angle")]
    MissingConstraintAngle,

    #[error("constraint angle {angle} is outside [0, 360]")]
    AngleOutOfRange { angle: f32 },

    #[error("unknown constraint kind '{value}'")]
    UnknownConstraintKind { value: String },

    #[error("sub-base index {index} for arm {arm} is outside the root chain ({len} joints)")]
    MalformedSubBaseIndex { arm: usize, index: usize, len: usize },

    #[error("arm {arm} needs at least 2 segments, got {segments}")]
    ArmTooShort { arm: usize, segments: usize },

    #[error("chain {child:?} is already connected under chain {parent:?}")]
    AlreadyConnected { child: ChainId, parent: ChainId },

    #[error("connecting chain {child:?} under {parent:?} would close a cycle")]
    ChainCycle { parent: ChainId, child: ChainId },

    #[error("base joint {joint:?} of chain {child:?} is not part of chain {parent:?}")]
    DisconnectedChain {
        parent: ChainId,
        child: ChainId,
        joint: Option<JointId>,
    },
}
