use super::{super::Animation, HumanoidSkeleton, RunContext, SkeletonAttr};
use std::f32::consts::PI;

/// Breathing in place. Also played for actions without a generator of their
/// own.
pub struct IdleAnimation;

/// One slow breath over the run.
pub(super) fn breathe(next: &mut HumanoidSkeleton, anim_time: f32) {
    next.torso.scale.y = 1.0 + (anim_time * PI * 2.0).sin() * 0.02;
}

impl Animation for IdleAnimation {
    type Dependency<'a> = &'a RunContext;
    type Skeleton = HumanoidSkeleton;

    fn update_skeleton(
        skeleton: &Self::Skeleton,
        ctx: Self::Dependency<'_>,
        anim_time: f32,
        _s_a: &SkeletonAttr,
    ) -> Self::Skeleton {
        let mut next = (*skeleton).clone();
        next.root = ctx.base;
        breathe(&mut next, anim_time);
        next
    }
}
