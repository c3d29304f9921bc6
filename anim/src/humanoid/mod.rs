pub mod combat;
pub mod dance;
pub mod exercise;
pub mod gesture;
pub mod idle;
pub mod movement;

// Reexports
pub use self::{
    combat::CombatAnimation, dance::DanceAnimation, exercise::ExerciseAnimation,
    gesture::GestureAnimation, idle::IdleAnimation, movement::MovementAnimation,
};

use super::{vek::*, Animation, Bone, Skeleton};
use common::{ActionKind, Category, PhaseInfo};

skeleton_impls!(struct HumanoidSkeleton ComputedHumanoidSkeleton {
    + head: "head"
    + torso: "torso"
    + arm_l: "left_arm"
    + arm_r: "right_arm"
    + leg_l: "left_leg"
    + leg_r: "right_leg"
    root
});

impl HumanoidSkeleton {
    /// The standing pose, with the root at the origin.
    pub fn rest(s_a: &SkeletonAttr) -> Self {
        Self {
            head: Bone::at(Vec3::new(0.0, s_a.head, 0.0)),
            torso: Bone::at(Vec3::new(0.0, s_a.torso, 0.0)),
            arm_l: Bone::at(Vec3::new(-s_a.arm.0, s_a.arm.1, 0.0)),
            arm_r: Bone::at(Vec3::new(s_a.arm.0, s_a.arm.1, 0.0)),
            leg_l: Bone::at(Vec3::new(-s_a.leg.0, s_a.leg.1, 0.0)),
            leg_r: Bone::at(Vec3::new(s_a.leg.0, s_a.leg.1, 0.0)),
            root: Bone::default(),
        }
    }
}

impl Skeleton for HumanoidSkeleton {
    type Attr = SkeletonAttr;
    type ComputedSkeleton = ComputedHumanoidSkeleton;

    fn compute_matrices(&self, base_mat: Mat4<f32>, s_a: &SkeletonAttr) -> ComputedHumanoidSkeleton {
        let root_mat = base_mat * Mat4::<f32>::from(self.root) * Mat4::scaling_3d(s_a.scaler);

        ComputedHumanoidSkeleton {
            head: root_mat * Mat4::<f32>::from(self.head),
            torso: root_mat * Mat4::<f32>::from(self.torso),
            arm_l: root_mat * Mat4::<f32>::from(self.arm_l),
            arm_r: root_mat * Mat4::<f32>::from(self.arm_r),
            leg_l: root_mat * Mat4::<f32>::from(self.leg_l),
            leg_r: root_mat * Mat4::<f32>::from(self.leg_r),
        }
    }
}

/// Joint offsets of the standing pose, relative to the root.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SkeletonAttr {
    head: f32,
    torso: f32,
    arm: (f32, f32),
    leg: (f32, f32),
    scaler: f32,
}

impl Default for SkeletonAttr {
    fn default() -> Self {
        Self {
            head: 25.0,
            torso: 5.0,
            arm: (8.0, 12.0),
            leg: (4.0, -5.0),
            scaler: 1.0,
        }
    }
}

impl SkeletonAttr {
    pub fn scaled(scaler: f32) -> Self {
        Self {
            scaler,
            ..Self::default()
        }
    }
}

/// Everything a generator knows about the run besides its progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunContext {
    pub phase: PhaseInfo,
    /// Root transform when the run started.
    pub base: Bone,
    /// Facing when the run started. Turns and displacements are relative to it.
    pub start_ori: f32,
    /// Catalog duration of the action, in seconds.
    pub duration: f32,
}

impl RunContext {
    /// Seconds into the run at `progress`.
    pub fn elapsed(&self, progress: f32) -> f32 { progress * self.duration }
}

/// The skeleton of `kind` at `progress`, generated from the rest skeleton.
///
/// `None` is an action without a generator and breathes in place.
pub fn animate(
    kind: Option<ActionKind>,
    rest: &HumanoidSkeleton,
    ctx: &RunContext,
    progress: f32,
    s_a: &SkeletonAttr,
) -> HumanoidSkeleton {
    let Some(kind) = kind else {
        return IdleAnimation::update_skeleton(rest, ctx, progress, s_a);
    };
    match kind.category() {
        Category::Dance => DanceAnimation::update_skeleton(rest, (kind, ctx), progress, s_a),
        Category::Combat => CombatAnimation::update_skeleton(rest, (kind, ctx), progress, s_a),
        Category::Exercise => ExerciseAnimation::update_skeleton(rest, (kind, ctx), progress, s_a),
        Category::Movement => MovementAnimation::update_skeleton(rest, (kind, ctx), progress, s_a),
        Category::Basic => GestureAnimation::update_skeleton(rest, (kind, ctx), progress, s_a),
    }
}

/// Ramps in over the first phase, out over the last, and is 1 in between.
pub(crate) fn ramp(phase: &PhaseInfo, first: &str, last: &str) -> f32 {
    if phase.is(first) {
        phase.eased
    } else if phase.is(last) {
        1.0 - phase.eased
    } else {
        1.0
    }
}
