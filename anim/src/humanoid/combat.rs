use super::{
    super::{util::bounce, Animation},
    ramp, HumanoidSkeleton, RunContext, SkeletonAttr,
};
use common::{ActionKind, PhaseInfo};
use std::f32::consts::PI;

pub struct CombatAnimation;

/// How far the striking limb is extended. Pulls back slightly during the
/// windup, snaps out on the strike, holds through the follow through and
/// retracts during recovery.
fn extension(phase: &PhaseInfo) -> f32 {
    match phase.name() {
        "windup" => -0.25 * phase.eased,
        "strike" => -0.25 + 1.25 * phase.eased,
        "follow_through" => 1.0,
        _ => 1.0 - phase.eased,
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirror factor for rotations about the y and z axes.
    fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

impl Animation for CombatAnimation {
    type Dependency<'a> = (ActionKind, &'a RunContext);
    type Skeleton = HumanoidSkeleton;

    fn update_skeleton(
        skeleton: &Self::Skeleton,
        (kind, ctx): Self::Dependency<'_>,
        anim_time: f32,
        s_a: &SkeletonAttr,
    ) -> Self::Skeleton {
        let mut next = (*skeleton).clone();
        next.root = ctx.base;

        let ext = extension(&ctx.phase);
        // Guard stance for the multi strike moves
        let guard = ramp(&ctx.phase, "windup", "recovery");

        match kind {
            ActionKind::Kick => {
                next.leg_r.rotation.x = -0.8 * ext;
                next.torso.rotation.x = 0.1 * ext;
            },
            ActionKind::RightKick | ActionKind::LeftKick => {
                let side = if kind == ActionKind::RightKick { Side::Right } else { Side::Left };
                let leg = if side == Side::Right { &mut next.leg_r } else { &mut next.leg_l };
                leg.rotation.x = -ext;
                next.torso.rotation.z = -side.sign() * 0.2 * ext;
                next.arm_l.rotation.z = 0.3 * guard;
                next.arm_r.rotation.z = -0.3 * guard;
            },
            ActionKind::Punch => {
                next.arm_r.rotation.x = -0.5 * ext;
                next.arm_r.position.z = skeleton.arm_r.position.z + 10.0 * ext.max(0.0);
            },
            ActionKind::RightUppercut | ActionKind::LeftUppercut => {
                let side = if kind == ActionKind::RightUppercut { Side::Right } else { Side::Left };
                let arm = if side == Side::Right { &mut next.arm_r } else { &mut next.arm_l };
                arm.rotation.x = -0.8 * ext;
                arm.rotation.z = side.sign() * 0.4 * ext;
                next.torso.rotation.y = side.sign() * 0.2 * ext;
            },
            ActionKind::KungFu => {
                let t = anim_time * PI * 3.0;
                next.arm_l.rotation.x = -bounce(t) * 0.8 * guard;
                next.arm_r.rotation.x = -bounce(t + PI / 2.0) * 0.8 * guard;
                next.leg_l.rotation.x = (t / 2.0).sin() * 0.3 * guard;
            },
            // Alternating straight punches on the centre line
            ActionKind::WingChun => {
                let t = anim_time * PI * 4.0;
                next.arm_l.rotation.x = -bounce(t) * 0.6 * guard;
                next.arm_r.rotation.x = -bounce(t + PI / 2.0) * 0.6 * guard;
                next.arm_l.rotation.z = -0.2 * guard;
                next.arm_r.rotation.z = 0.2 * guard;
                next.torso.rotation.y = (t * 0.5).sin() * 0.1 * guard;
            },
            ActionKind::RightShotFast | ActionKind::LeftShotFast => {
                let side = if kind == ActionKind::RightShotFast { Side::Right } else { Side::Left };
                let (arm, rest_z) = if side == Side::Right {
                    (&mut next.arm_r, skeleton.arm_r.position.z)
                } else {
                    (&mut next.arm_l, skeleton.arm_l.position.z)
                };
                let jab = bounce(anim_time * PI * 3.0) * guard;
                arm.rotation.x = -0.7 * jab;
                arm.position.z = rest_z + 8.0 * jab;
                next.torso.rotation.y = side.sign() * 0.1 * jab;
            },
            _ => {},
        }

        // Bend the knees into a fighting stance
        let crouch = match kind {
            ActionKind::KungFu | ActionKind::WingChun => 2.0 * guard,
            _ => 0.0,
        };
        next.root.position.y = ctx.base.position.y - crouch * s_a.scaler;

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{current_phase, PhaseTemplate};

    #[test]
    fn strike_peaks_after_windup() {
        let template = PhaseTemplate::for_action(&ActionKind::Punch.descriptor());
        let ext = |p| extension(&current_phase(&template, p));
        assert_eq!(ext(0.0), 0.0);
        assert!(ext(0.29) < 0.0);
        assert!((ext(0.5) - 1.0).abs() < 1e-4);
        assert!((ext(0.6) - 1.0).abs() < 1e-4);
        assert!(ext(1.0).abs() < 1e-6);
    }

    #[test]
    fn kicks_mirror() {
        let s_a = SkeletonAttr::default();
        let rest = HumanoidSkeleton::rest(&s_a);
        let template = PhaseTemplate::for_action(&ActionKind::RightKick.descriptor());
        let ctx = RunContext {
            phase: current_phase(&template, 0.6),
            base: Default::default(),
            start_ori: 0.0,
            duration: 2.0,
        };
        let right =
            CombatAnimation::update_skeleton(&rest, (ActionKind::RightKick, &ctx), 0.6, &s_a);
        let left = CombatAnimation::update_skeleton(&rest, (ActionKind::LeftKick, &ctx), 0.6, &s_a);
        assert!(right.leg_r.rotation.x < -0.9);
        assert_eq!(right.leg_l, rest.leg_l);
        assert_eq!(left.leg_l.rotation.x, right.leg_r.rotation.x);
        assert_eq!(left.torso.rotation.z, -right.torso.rotation.z);
    }
}
