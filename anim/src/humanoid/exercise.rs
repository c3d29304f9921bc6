use super::{
    super::{
        util::{bounce, Heading},
        vek::*,
        Animation, Bone,
    },
    HumanoidSkeleton, RunContext, SkeletonAttr,
};
use common::ActionKind;
use std::f32::consts::PI;

/// How far forward the push-up moves the body while getting down.
pub const PUSH_UP_DISTANCE: f32 = 20.0;

pub struct ExerciseAnimation;

/// Where a run is within an exercise: how far into the exercise position the
/// body is, and the repetition wave while executing.
#[derive(Copy, Clone, Debug)]
struct Stance {
    /// 0 standing, 1 fully in position.
    hold: f32,
    /// `|sin|` wave with one hump per repetition, 0 outside the execute phase.
    rep: f32,
    /// Eased progress of the return phase.
    back: f32,
}

impl Stance {
    fn new(ctx: &RunContext, seconds_per_rep: f32) -> Self {
        let phase = &ctx.phase;
        let reps = (ctx.duration / seconds_per_rep).round().max(1.0);
        match phase.name() {
            "setup" => Self {
                hold: phase.eased,
                rep: 0.0,
                back: 0.0,
            },
            "execute" => Self {
                hold: 1.0,
                rep: bounce(phase.local * reps * PI),
                back: 0.0,
            },
            _ => Self {
                hold: 1.0 - phase.eased,
                rep: 0.0,
                back: phase.eased,
            },
        }
    }
}

fn seconds_per_rep(kind: ActionKind) -> f32 {
    match kind {
        ActionKind::PushUps => 2.25,
        ActionKind::SitUps => 3.0,
        ActionKind::JumpingJacks => 0.75,
        ActionKind::Squat => 1.0,
        _ => 2.0,
    }
}

impl Animation for ExerciseAnimation {
    type Dependency<'a> = (ActionKind, &'a RunContext);
    type Skeleton = HumanoidSkeleton;

    fn update_skeleton(
        skeleton: &Self::Skeleton,
        (kind, ctx): Self::Dependency<'_>,
        _anim_time: f32,
        _s_a: &SkeletonAttr,
    ) -> Self::Skeleton {
        let mut next = (*skeleton).clone();
        next.root = ctx.base;

        let Stance { hold, rep, back } = Stance::new(ctx, seconds_per_rep(kind));
        let base = ctx.base.position;

        match kind {
            ActionKind::PushUps => {
                // Lie face down in front of where the avatar stood
                let forward = Heading::Forward.displacement(ctx.start_ori, PUSH_UP_DISTANCE * hold);
                next.root.position = base + forward + Vec3::unit_y() * (-25.0 * hold + rep * 8.0);
                next.root.rotation.x = PI / 2.0 * hold;

                next.arm_l.rotation.x = -PI / 3.0 * hold;
                next.arm_r.rotation.x = -PI / 3.0 * hold;
                next.arm_l.rotation.z = PI / 6.0 * hold;
                next.arm_r.rotation.z = -PI / 6.0 * hold;
                next.head.rotation.x = -PI / 6.0 * hold;
                next.leg_l.rotation.z = 0.1 * hold;
                next.leg_r.rotation.z = -0.1 * hold;
            },
            ActionKind::SitUps => sit_ups(&mut next, base, Stance { hold, rep, back }),
            ActionKind::JumpingJacks => {
                next.arm_l.rotation.z = rep * PI / 3.0;
                next.arm_r.rotation.z = -rep * PI / 3.0;
                next.leg_l.rotation.z = rep * 0.3;
                next.leg_r.rotation.z = -rep * 0.3;
                next.root.position.y = base.y + rep * 5.0;
            },
            ActionKind::Chest => {
                next.arm_l.rotation.z = (PI / 3.0 + rep * 0.3) * hold;
                next.arm_r.rotation.z = -(PI / 3.0 + rep * 0.3) * hold;
                next.arm_l.rotation.x = -0.5 * rep;
                next.arm_r.rotation.x = -0.5 * rep;
                next.torso.scale.x = 1.0 + rep * 0.1;
            },
            ActionKind::SquatUp => {
                next.root.position.y = base.y - rep * 20.0;
                next.leg_l.rotation.x = rep * 0.5;
                next.leg_r.rotation.x = rep * 0.5;
                next.torso.rotation.x = rep * 0.2;
                next.arm_l.rotation.x = -PI / 2.0 * hold;
                next.arm_r.rotation.x = -PI / 2.0 * hold;
            },
            ActionKind::Squat => {
                next.root.position.y = base.y - rep * 15.0;
                next.leg_l.rotation.x = rep * 0.4;
                next.leg_r.rotation.x = rep * 0.4;
                next.arm_l.rotation.x = -rep * 0.6;
                next.arm_r.rotation.x = -rep * 0.6;
            },
            ActionKind::Weightlifting => {
                next.arm_l.rotation.x = -rep * 0.8 - 0.4 * hold;
                next.arm_r.rotation.x = -rep * 0.8 - 0.4 * hold;
                next.arm_l.rotation.z = 0.2 * hold;
                next.arm_r.rotation.z = -0.2 * hold;
                next.torso.scale.x = 1.0 + 0.05 * hold;
            },
            _ => {},
        }

        next
    }
}

/// Lies down on the back, crunches, and ends sitting up. The seated end pose is
/// kept after the run.
fn sit_ups(next: &mut HumanoidSkeleton, base: Vec3<f32>, Stance { hold, rep, back }: Stance) {
    // On the ground from the end of the setup until the body sits up
    let lying = if back > 0.0 { 1.0 } else { hold };
    let crunch = rep * PI / 3.0;

    next.root.position.y = base.y - 30.0 * lying;
    next.torso.rotation.x = crunch;
    next.head.rotation.x = crunch * 0.7;
    next.arm_l.rotation.x = -PI / 2.0 * hold;
    next.arm_r.rotation.x = -PI / 2.0 * hold;
    next.arm_l.rotation.z = PI / 4.0 * hold;
    next.arm_r.rotation.z = -PI / 4.0 * hold;
    next.leg_l.rotation.x = PI / 3.0 * lying;
    next.leg_r.rotation.x = PI / 3.0 * lying;

    if back > 0.0 {
        let seated = seated_pose(next, base);
        next.root.position.y += (seated.root.position.y - next.root.position.y) * back;
        next.torso.rotation.x += (seated.torso.rotation.x - next.torso.rotation.x) * back;
        for (bone, to) in [(&mut next.leg_l, seated.leg_l), (&mut next.leg_r, seated.leg_r)] {
            bone.rotation += (to.rotation - bone.rotation) * back;
        }
    }
}

/// Terminal pose of a sit-up run.
fn seated_pose(from: &HumanoidSkeleton, base: Vec3<f32>) -> HumanoidSkeleton {
    let mut seated = from.clone();
    seated.root.position.y = base.y - 15.0;
    seated.torso.rotation.x = PI / 6.0;
    seated.leg_l = Bone {
        rotation: Vec3::new(PI / 2.0, 0.0, 0.1),
        ..from.leg_l
    };
    seated.leg_r = Bone {
        rotation: Vec3::new(PI / 2.0, 0.0, -0.1),
        ..from.leg_r
    };
    seated
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use common::{current_phase, PhaseTemplate};

    fn run(kind: ActionKind, p: f32, start_ori: f32) -> HumanoidSkeleton {
        let s_a = SkeletonAttr::default();
        let ctx = RunContext {
            phase: current_phase(&PhaseTemplate::for_action(&kind.descriptor()), p),
            base: Bone {
                rotation: Vec3::new(0.0, start_ori, 0.0),
                ..Default::default()
            },
            start_ori,
            duration: kind.descriptor().duration_secs() as f32,
        };
        ExerciseAnimation::update_skeleton(&HumanoidSkeleton::rest(&s_a), (kind, &ctx), p, &s_a)
    }

    #[test]
    fn sit_ups_end_seated() {
        let end = run(ActionKind::SitUps, 1.0, 0.0);
        assert_relative_eq!(end.root.position.y, -15.0);
        assert_relative_eq!(end.torso.rotation.x, PI / 6.0);
        assert_relative_eq!(end.leg_l.rotation.x, PI / 2.0);
        assert_relative_eq!(end.leg_r.rotation.z, -0.1);
        assert_relative_eq!(end.arm_l.rotation.x, 0.0);
    }

    #[test]
    fn push_ups_move_along_facing() {
        let down = run(ActionKind::PushUps, 0.5, PI / 2.0);
        assert_relative_eq!(down.root.position.x, PUSH_UP_DISTANCE, epsilon = 1e-4);
        assert_relative_eq!(down.root.position.z, 0.0, epsilon = 1e-4);
        assert_relative_eq!(down.root.rotation.x, PI / 2.0);
        assert!(down.root.position.y <= -17.0);

        let up = run(ActionKind::PushUps, 1.0, PI / 2.0);
        assert_relative_eq!(up.root.position.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(up.root.position.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn reps_scale_with_duration() {
        let count_humps = |kind: ActionKind| {
            let mut humps = 0;
            let mut rising = false;
            let mut prev = 0.0;
            for i in 0..=4000 {
                let p = i as f32 / 4000.0;
                let leg = run(kind, p, 0.0).leg_l;
                let depth = leg.rotation.x.abs() + leg.rotation.z.abs();
                if depth > prev + 1e-5 {
                    rising = true;
                } else if depth + 1e-5 < prev && rising {
                    humps += 1;
                    rising = false;
                }
                prev = depth;
            }
            humps
        };
        assert_eq!(count_humps(ActionKind::JumpingJacks), 4);
        assert_eq!(count_humps(ActionKind::Squat), 1);
    }
}
