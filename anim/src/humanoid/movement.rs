use super::{
    super::{
        util::{bounce, turn, Heading, TURN_ARC},
        Animation,
    },
    ramp, HumanoidSkeleton, RunContext, SkeletonAttr,
};
use common::ActionKind;
use std::f32::consts::PI;

pub const GO_FORWARD_DISTANCE: f32 = 30.0;
pub const GO_BACKWARD_DISTANCE: f32 = 20.0;
pub const MOVE_FAST_DISTANCE: f32 = 25.0;
pub const BACK_FAST_DISTANCE: f32 = 35.0;

pub struct MovementAnimation;

/// Direction and total distance covered by `kind`, if it travels.
pub fn travel(kind: ActionKind) -> Option<(Heading, f32)> {
    match kind {
        ActionKind::GoForward => Some((Heading::Forward, GO_FORWARD_DISTANCE)),
        ActionKind::GoBackward => Some((Heading::Backward, GO_BACKWARD_DISTANCE)),
        ActionKind::RightMoveFast => Some((Heading::Right, MOVE_FAST_DISTANCE)),
        ActionKind::LeftMoveFast => Some((Heading::Left, MOVE_FAST_DISTANCE)),
        ActionKind::BackFast => Some((Heading::Backward, BACK_FAST_DISTANCE)),
        _ => None,
    }
}

/// Signed turn arc of `kind`, if it turns.
pub fn turn_arc(kind: ActionKind) -> Option<f32> {
    match kind {
        ActionKind::TurnLeft => Some(-TURN_ARC),
        ActionKind::TurnRight => Some(TURN_ARC),
        _ => None,
    }
}

/// Gait of each locomotion action: stride cycles over the run, leg swing and
/// arm swing amplitudes.
fn gait(kind: ActionKind) -> (f32, f32, f32) {
    match kind {
        ActionKind::GoForward => (2.0, 0.5, 0.3),
        ActionKind::GoBackward => (1.5, 0.3, 0.2),
        ActionKind::RightMoveFast | ActionKind::LeftMoveFast => (3.0, 0.3, 0.2),
        ActionKind::BackFast => (2.5, 0.4, 0.3),
        ActionKind::Stepping => (2.0, 0.4, 0.2),
        _ => (1.0, 0.1, 0.0),
    }
}

impl Animation for MovementAnimation {
    type Dependency<'a> = (ActionKind, &'a RunContext);
    type Skeleton = HumanoidSkeleton;

    fn update_skeleton(
        skeleton: &Self::Skeleton,
        (kind, ctx): Self::Dependency<'_>,
        anim_time: f32,
        _s_a: &SkeletonAttr,
    ) -> Self::Skeleton {
        let mut next = (*skeleton).clone();
        next.root = ctx.base;

        // Strides build up while starting and die down while stopping.
        let stride = ramp(&ctx.phase, "start", "stop");
        let (cycles, leg_swing, arm_swing) = gait(kind);
        let t = anim_time * cycles * 2.0 * PI;
        let swing = t.sin() * stride;

        next.leg_l.rotation.x = swing * leg_swing;
        next.leg_r.rotation.x = -swing * leg_swing;
        next.arm_l.rotation.x = -swing * arm_swing;
        next.arm_r.rotation.x = swing * arm_swing;

        if let Some((heading, distance)) = travel(kind) {
            next.root.position =
                ctx.base.position + heading.displacement(ctx.start_ori, distance * anim_time);
        }

        if let Some(arc) = turn_arc(kind) {
            next.root.rotation.y = turn(ctx.start_ori, arc, anim_time);
            next.torso.rotation.z = arc.signum() * (anim_time * PI).sin() * 0.2;
        }

        match kind {
            ActionKind::Stepping => {
                next.root.position.y = ctx.base.position.y + bounce(t * 2.0) * 3.0 * stride;
            },
            // Lean into the side step
            ActionKind::RightMoveFast => next.torso.rotation.z = -0.1 * stride,
            ActionKind::LeftMoveFast => next.torso.rotation.z = 0.1 * stride,
            _ => {},
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{vek::*, Bone};
    use approx::assert_relative_eq;
    use common::{current_phase, PhaseTemplate};

    fn run(kind: ActionKind, p: f32, base: Bone) -> HumanoidSkeleton {
        let s_a = SkeletonAttr::default();
        let ctx = RunContext {
            phase: current_phase(&PhaseTemplate::for_action(&kind.descriptor()), p),
            base,
            start_ori: base.rotation.y,
            duration: kind.descriptor().duration_secs() as f32,
        };
        MovementAnimation::update_skeleton(&HumanoidSkeleton::rest(&s_a), (kind, &ctx), p, &s_a)
    }

    fn facing(theta: f32) -> Bone {
        Bone {
            position: Vec3::new(5.0, 0.0, -5.0),
            rotation: Vec3::new(0.0, theta, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn go_forward_travels_along_facing() {
        for theta in [0.0, 0.7, PI, -2.0] {
            let end = run(ActionKind::GoForward, 1.0, facing(theta));
            let moved = end.root.position - Vec3::new(5.0, 0.0, -5.0);
            assert_relative_eq!(moved.x, theta.sin() * GO_FORWARD_DISTANCE, epsilon = 1e-4);
            assert_relative_eq!(moved.z, theta.cos() * GO_FORWARD_DISTANCE, epsilon = 1e-4);
            assert_relative_eq!(end.root.rotation.y, theta);
        }
    }

    #[test]
    fn side_and_back_steps() {
        let right = run(ActionKind::RightMoveFast, 1.0, facing(0.0));
        assert_relative_eq!(right.root.position.x, 5.0 + MOVE_FAST_DISTANCE, epsilon = 1e-4);
        let left = run(ActionKind::LeftMoveFast, 1.0, facing(0.0));
        assert_relative_eq!(left.root.position.x, 5.0 - MOVE_FAST_DISTANCE, epsilon = 1e-4);
        let back = run(ActionKind::BackFast, 1.0, facing(0.0));
        assert_relative_eq!(back.root.position.z, -5.0 - BACK_FAST_DISTANCE, epsilon = 1e-4);
        let half = run(ActionKind::GoBackward, 0.5, facing(0.0));
        assert_relative_eq!(half.root.position.z, -5.0 - GO_BACKWARD_DISTANCE / 2.0, epsilon = 1e-4);
    }

    #[test]
    fn turns_are_anchored_to_start() {
        let left = run(ActionKind::TurnLeft, 1.0, facing(0.0));
        assert_relative_eq!(left.root.rotation.y, -PI / 2.0, epsilon = 1e-5);
        let right = run(ActionKind::TurnRight, 0.5, facing(1.0));
        assert_relative_eq!(right.root.rotation.y, 1.0 + PI / 4.0, epsilon = 1e-5);
        assert_eq!(right, run(ActionKind::TurnRight, 0.5, facing(1.0)));
        // Turning in place
        assert_eq!(left.root.position, Vec3::new(5.0, 0.0, -5.0));
    }

    #[test]
    fn stepping_stays_in_place() {
        for i in 0..=10 {
            let step = run(ActionKind::Stepping, i as f32 / 10.0, facing(0.3));
            assert_relative_eq!(step.root.position.x, 5.0);
            assert_relative_eq!(step.root.position.z, -5.0);
        }
    }
}
