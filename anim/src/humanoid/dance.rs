use super::{
    super::{util::bounce, Animation},
    HumanoidSkeleton, RunContext, SkeletonAttr,
};
use common::{ActionKind, Easing, PhaseInfo};
use std::f32::consts::{PI, TAU};

pub struct DanceAnimation;

/// Amplitude of the dance over its phases. Fades in during the intro and out
/// during the outro so the run starts and ends in the rest pose; the build and
/// peak phases swell above 1.
fn intensity(phase: &PhaseInfo) -> f32 {
    let swell = (phase.local * PI).sin();
    match phase.name() {
        "intro" => phase.eased,
        "outro" => 1.0 - phase.eased,
        "build" => 1.0 + 0.15 * swell,
        "peak" => 1.0 + 0.3 * swell,
        _ => 1.0,
    }
}

/// Beat frequency of each dance, in radians per second.
fn tempo(kind: ActionKind) -> f32 {
    match kind {
        ActionKind::Dance => TAU,
        ActionKind::DanceTwo => 4.0,
        ActionKind::DanceThree => 3.0,
        ActionKind::DanceFour => 5.0,
        ActionKind::DanceFive => 2.5,
        ActionKind::DanceSix => 4.0,
        ActionKind::DanceSeven => 3.0,
        ActionKind::DanceEight => 6.0,
        ActionKind::DanceNine => 2.5,
        _ => 5.0,
    }
}

impl Animation for DanceAnimation {
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

        let amp = intensity(&ctx.phase);
        let t = ctx.elapsed(anim_time) * tempo(kind);
        let mut bob = 0.0;

        match kind {
            ActionKind::Dance => {
                next.arm_l.rotation.z = t.sin() * 0.5 * amp;
                next.arm_r.rotation.z = -t.sin() * 0.5 * amp;
                next.torso.rotation.y = (t * 0.5).sin() * 0.2 * amp;
                bob = bounce(t * 2.0) * 5.0;
            },
            // Hip-hop
            ActionKind::DanceTwo => {
                next.arm_l.rotation.z = t.sin() * 0.8 * amp;
                next.arm_r.rotation.z = -(t + PI / 4.0).sin() * 0.8 * amp;
                next.torso.rotation.y = (t * 0.5).sin() * 0.3 * amp;
                next.head.rotation.y = (t * 0.3).sin() * 0.2 * amp;
                bob = bounce(t * 1.5) * 8.0;
            },
            // Arm waves
            ActionKind::DanceThree => {
                next.arm_l.rotation.x = t.sin() * 0.6 * amp;
                next.arm_r.rotation.x = -t.sin() * 0.6 * amp;
                next.arm_l.rotation.z = t.cos() * 0.4 * amp;
                next.arm_r.rotation.z = -t.cos() * 0.4 * amp;
                next.torso.rotation.z = (t * 0.5).sin() * 0.2 * amp;
            },
            // Energetic
            ActionKind::DanceFour => {
                next.arm_l.rotation.x = t.sin() * 0.7 * amp;
                next.arm_r.rotation.x = -t.sin() * 0.7 * amp;
                next.leg_l.rotation.x = -t.sin() * 0.3 * amp;
                next.leg_r.rotation.x = t.sin() * 0.3 * amp;
                bob = bounce(t) * 6.0;
            },
            // Slow, arms held high
            ActionKind::DanceFive => {
                next.arm_l.rotation.z = (PI / 3.0 + t.sin() * 0.3) * amp;
                next.arm_r.rotation.z = -(PI / 3.0 + t.sin() * 0.3) * amp;
                next.arm_l.rotation.y = (t * 0.7).sin() * 0.4 * amp;
                next.arm_r.rotation.y = -(t * 0.7).sin() * 0.4 * amp;
                next.torso.rotation.y = (t * 0.5).sin() * 0.2 * amp;
            },
            // Robot: holds each pose for a beat, then snaps to the mirror.
            ActionKind::DanceSix => {
                let beat = if (t / PI).floor().rem_euclid(2.0) < 1.0 { 1.0 } else { -1.0 };
                next.arm_l.rotation.x = beat * 0.5 * amp;
                next.arm_r.rotation.x = -beat * 0.5 * amp;
                next.arm_l.rotation.z = PI / 4.0 * amp;
                next.arm_r.rotation.z = -PI / 4.0 * amp;
                next.head.rotation.y = beat * 0.2 * amp;
            },
            // Hips
            ActionKind::DanceSeven => {
                next.torso.rotation.y = (t * 0.8).sin() * 0.4 * amp;
                next.leg_l.rotation.x = (t * 2.0).sin() * 0.2 * amp;
                next.leg_r.rotation.x = -(t * 2.0).sin() * 0.2 * amp;
                next.arm_l.rotation.z = t.sin() * 0.3 * amp;
                next.arm_r.rotation.z = -t.sin() * 0.3 * amp;
            },
            // Jumping
            ActionKind::DanceEight => {
                next.arm_l.rotation.x = t.sin() * 0.8 * amp;
                next.arm_r.rotation.x = -t.sin() * 0.8 * amp;
                next.torso.rotation.z = (t * 0.5).sin() * 0.3 * amp;
                bob = bounce(t * 0.5) * 12.0;
            },
            // Contemporary
            ActionKind::DanceNine => {
                next.arm_l.rotation.x = t.sin() * 0.7 * amp;
                next.arm_r.rotation.x = t.cos() * 0.7 * amp;
                next.arm_l.rotation.z = (t * 0.7).sin() * 0.5 * amp;
                next.arm_r.rotation.z = -(t * 0.7).sin() * 0.5 * amp;
                next.torso.rotation.x = (t * 0.3).sin() * 0.2 * amp;
                next.head.rotation.x = (t * 0.4).sin() * 0.1 * amp;
            },
            // Disco, two full spins over the run
            _ => {
                next.arm_l.rotation.z = (PI / 4.0 + t.sin() * 0.5) * amp;
                next.arm_r.rotation.z = -(PI / 4.0 + t.sin() * 0.5) * amp;
                next.arm_l.rotation.y = (t * 0.8).sin() * 0.3 * amp;
                next.arm_r.rotation.y = -(t * 0.8).sin() * 0.3 * amp;
                next.torso.rotation.y = (t * 0.5).sin() * 0.2 * amp;
                next.root.rotation.y =
                    ctx.start_ori + 2.0 * TAU * Easing::EaseInOut.apply(anim_time);
            },
        }

        next.root.position.y = ctx.base.position.y + bob * amp.min(1.0);

        next
    }
}
