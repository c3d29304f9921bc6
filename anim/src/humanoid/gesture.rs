use super::{
    super::{util::bounce, Animation},
    idle::breathe,
    ramp, HumanoidSkeleton, RunContext, SkeletonAttr,
};
use common::ActionKind;
use std::f32::consts::PI;

pub struct GestureAnimation;

impl Animation for GestureAnimation {
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

        // Reach into the gesture, hold it, let go
        let g = ramp(&ctx.phase, "begin", "end");
        let arc = (anim_time * PI).sin();
        let base_y = ctx.base.position.y;

        match kind {
            ActionKind::Wave => {
                next.arm_r.rotation.z = (-PI / 4.0 + (anim_time * PI * 4.0).sin() * 0.5) * g;
                next.arm_r.rotation.x = (anim_time * PI * 8.0).sin() * 0.2 * g;
            },
            ActionKind::Bow => {
                next.torso.rotation.x = 0.5 * g;
                next.head.rotation.x = 0.25 * g;
            },
            ActionKind::Jump => {
                next.root.position.y = base_y + arc * 30.0;
                next.leg_l.rotation.x = arc * 0.3;
                next.leg_r.rotation.x = arc * 0.3;
                next.arm_l.rotation.z = arc * 0.4;
                next.arm_r.rotation.z = -arc * 0.4;
            },
            ActionKind::Celebrate => {
                let sway = (anim_time * PI * 2.0).sin() * 0.2;
                next.arm_l.rotation.z = (PI / 2.0 + sway) * g;
                next.arm_r.rotation.z = -(PI / 2.0 + sway) * g;
                next.head.rotation.y = (anim_time * PI * 4.0).sin() * 0.3 * g;
                next.root.position.y = base_y + bounce(anim_time * PI * 6.0) * 8.0 * g;
            },
            ActionKind::Think => {
                next.head.rotation.x = 0.2 * g;
                next.head.rotation.y = (anim_time * PI / 2.0).sin() * 0.1 * g;
                next.arm_r.rotation.x = -PI / 3.0 * g;
                next.arm_r.rotation.z = -PI / 6.0 * g;
            },
            ActionKind::Twist => {
                let twist = (anim_time * PI * 3.0).sin() * 0.5 * g;
                next.torso.rotation.y = twist;
                next.arm_l.rotation.z = twist * 0.5;
                next.arm_r.rotation.z = -twist * 0.5;
            },
            // Starts lying on the back and gets up over the second half
            ActionKind::StandUpBack => {
                let rise = ((anim_time - 0.5) * 2.0).clamp(0.0, 1.0);
                let push = (rise * PI).sin();
                next.root.position.y = base_y - 30.0 * (1.0 - rise);
                next.torso.rotation.x = push * 0.3;
                next.arm_l.rotation.x = -push * 0.5;
                next.arm_r.rotation.x = -push * 0.5;
            },
            // Starts face down and pushes up over the second half
            ActionKind::StandUpFront => {
                let rise = ((anim_time - 0.5) * 2.0).clamp(0.0, 1.0);
                let push = (rise * PI).sin();
                next.root.position.y = base_y - 25.0 * (1.0 - rise);
                next.root.rotation.x = ctx.base.rotation.x + PI / 2.0 * (1.0 - rise);
                next.arm_l.rotation.x = -push * 0.4;
                next.arm_r.rotation.x = -push * 0.4;
            },
            _ => breathe(&mut next, anim_time),
        }

        next
    }
}
