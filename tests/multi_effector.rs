use glam::Vec3;
use ik_rig::ik::{compose, Constraint, ConstraintConfig, ConstraintKind, ConstraintMutator, Ik};
use ik_rig::ik::{Mutation, MultiChainSpec, Rig, TargetSet};
use ik_rig::RigError;
use std::f32::consts::FRAC_PI_2;

fn sixteen_segment_trunk() -> (Ik, TargetSet, Vec<ik_rig::ik::ArmChain>) {
    let spec = MultiChainSpec::radial(16, 8, 8, 2, 0.5, Constraint::ball(360.0).unwrap());
    let mut rig = Rig::new();
    let mut targets = TargetSet::new();
    let built = compose(&mut rig, &mut targets, &spec).unwrap();
    (Ik::new(rig, built.root), targets, built.arms)
}

#[test]
fn arms_fork_from_shared_trunk_joints() {
    let (ik, _, arms) = sixteen_segment_trunk();
    let rig = ik.rig();
    let root = rig.chain(ik.root());

    assert_eq!(root.joint_count(), 16);
    assert_eq!(rig.chain_count(), 9);
    assert_eq!(rig.skeleton().len(), 16 + 8 * 7);

    let sub_bases: Vec<usize> = arms.iter().map(|a| a.sub_base).collect();
    assert_eq!(sub_bases, vec![7, 7, 7, 7, 15, 15, 15, 15]);

    for arm in &arms {
        let chain = rig.chain(arm.chain);
        assert_eq!(chain.joint_count(), 8);
        assert_eq!(chain.base(), Some(root.joints()[arm.sub_base]));
        assert_eq!(chain.parent(), Some(ik.root()));

        let base_segment = rig.joint(chain.joints()[0]).segment();
        let first_own = rig.joint(chain.joints()[1]).segment();
        assert!(rig.skeleton().is_child_of(first_own, base_segment));
        assert_eq!(rig.joint(chain.joints()[7]).target(), Some(arm.target));
    }

    assert_eq!(root.sub_chains()[&7].len(), 4);
    assert_eq!(root.sub_chains()[&15].len(), 4);
}

#[test]
fn targets_ring_the_trunk_a_quarter_turn_apart() {
    let (_, targets, arms) = sixteen_segment_trunk();

    let positions: Vec<Vec3> = arms.iter().map(|a| targets.position(a.target)).collect();
    for ring in positions.chunks(4) {
        for (slot, p) in ring.iter().enumerate() {
            let angle = FRAC_PI_2 * slot as f32;
            assert!((p.x - angle.cos()).abs() < 1e-5);
            assert!((p.z - angle.sin()).abs() < 1e-5);
        }
    }
    assert!(positions[..4].iter().all(|p| p.y == 4.0));
    assert!(positions[4..].iter().all(|p| p.y == 8.0));
}

#[test]
fn constraint_edits_follow_the_control_panel() {
    let (mut ik, targets, arms) = sixteen_segment_trunk();
    let root = ik.root();
    let mut mutator = ConstraintMutator::new();

    let ball = ConstraintConfig {
        kind: ConstraintKind::Ball,
        angle: 360.0,
    };
    assert!(matches!(
        mutator.apply(ik.rig_mut(), root, ball).unwrap(),
        Mutation::Replaced { kind: ConstraintKind::Ball, .. }
    ));

    let narrowed = mutator
        .apply(ik.rig_mut(), root, ConstraintConfig { angle: 45.0, ..ball })
        .unwrap();
    assert_eq!(
        narrowed,
        Mutation::AngleUpdated {
            angle: 45.0,
            constraints: 9
        }
    );
    let tip = ik.rig().chain(arms[0].chain).joints()[7];
    assert_eq!(ik.rig().primary_constraint(tip).and_then(|c| c.angle()), Some(45.0));

    let none = ConstraintConfig {
        kind: ConstraintKind::None,
        angle: 45.0,
    };
    mutator.apply(ik.rig_mut(), root, none).unwrap();
    assert_eq!(ik.rig().primary_constraint(tip), Some(&Constraint::None));

    let err = mutator
        .apply(ik.rig_mut(), root, ConstraintConfig { angle: 30.0, ..none })
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidConstraintOperation { .. }));

    let result = ik.solve(&targets);
    assert!(result.final_distance.is_finite());
}

#[test]
fn sub_base_past_the_trunk_is_rejected() {
    let mut spec = MultiChainSpec::radial(16, 8, 8, 2, 0.5, Constraint::ball(360.0).unwrap());
    spec.arms[3].sub_base = 16;

    let err = compose(&mut Rig::new(), &mut TargetSet::new(), &spec).unwrap_err();
    assert_eq!(
        err,
        RigError::MalformedSubBaseIndex {
            arm: 3,
            index: 16,
            len: 16
        }
    );
}
