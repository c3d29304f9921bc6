use anim::{
    humanoid::{ComputedHumanoidSkeleton, HumanoidSkeleton, SkeletonAttr},
    vek::*,
    Bone, Skeleton,
};
use common::comp::{Ori, Pos};
use serde::Serialize;

/// Everything a renderer needs to draw one avatar.
///
/// `pos` and `ori` are the persistent root: where the avatar *is*. The
/// skeleton's root is where it is *displayed*, which differs from the
/// persistent root while a run is moving it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PoseState {
    pub pos: Pos,
    pub ori: Ori,
    pub skeleton: HumanoidSkeleton,
    rest: HumanoidSkeleton,
}

impl PoseState {
    pub fn new(pos: Pos, ori: Ori, s_a: &SkeletonAttr) -> Self {
        let rest = HumanoidSkeleton::rest(s_a);
        let mut pose = Self {
            pos,
            ori,
            skeleton: rest.clone(),
            rest,
        };
        pose.snap_root();
        pose
    }

    /// The standing pose captured at construction.
    pub fn rest(&self) -> &HumanoidSkeleton { &self.rest }

    pub fn persistent_root(&self) -> Bone {
        Bone {
            position: self.pos.0,
            rotation: self.ori.0,
            ..Default::default()
        }
    }

    pub fn displayed_root(&self) -> &Bone { &self.skeleton.root }

    /// Moves the displayed root back onto the persistent root.
    pub fn snap_root(&mut self) { self.skeleton.root = self.persistent_root(); }

    pub fn reset_joints(&mut self) { self.skeleton.set_joints(&self.rest); }

    /// Puts every joint's rotation back to the rest pose, leaving offsets as
    /// they are.
    pub fn reset_joint_rotations(&mut self) {
        for name in HumanoidSkeleton::JOINTS {
            if let (Some(rest), Some(bone)) = (self.rest.joint(name), self.skeleton.joint_mut(name)) {
                bone.rotation = rest.rotation;
            }
        }
    }

    /// Makes the displayed root the new persistent root.
    pub fn commit_root(&mut self) {
        self.pos = Pos(self.skeleton.root.position);
        self.ori = Ori(self.skeleton.root.rotation);
    }

    pub fn is_at_rest(&self, epsilon: f32) -> bool { self.skeleton.joints_eq(&self.rest, epsilon) }

    pub fn matrices(&self, s_a: &SkeletonAttr) -> ComputedHumanoidSkeleton {
        self.skeleton.compute_matrices(Mat4::identity(), s_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pose_stands_on_its_root() {
        let pose = PoseState::new(
            Pos(Vec3::new(50.0, 0.0, -50.0)),
            Ori::from_yaw(1.0),
            &SkeletonAttr::default(),
        );
        assert_eq!(pose.displayed_root(), &pose.persistent_root());
        assert!(pose.is_at_rest(0.0));
        assert_eq!(pose.rest().root, Bone::default());
    }

    #[test]
    fn commit_then_snap() {
        let mut pose = PoseState::new(Pos::default(), Ori::default(), &SkeletonAttr::default());
        pose.skeleton.root.position = Vec3::new(0.0, 0.0, 30.0);
        pose.skeleton.root.rotation.y = 0.5;
        pose.commit_root();
        assert_eq!(pose.pos.0, Vec3::new(0.0, 0.0, 30.0));
        assert_eq!(pose.ori.yaw(), 0.5);

        pose.skeleton.root.position.x = 99.0;
        pose.snap_root();
        assert_eq!(pose.displayed_root().position.x, 0.0);
    }

    #[test]
    fn joint_rotations_reset_alone() {
        let s_a = SkeletonAttr::default();
        let mut pose = PoseState::new(Pos::default(), Ori::default(), &s_a);
        pose.skeleton.arm_r.rotation.x = -0.7;
        pose.skeleton.torso.position.y = 1.0;
        pose.reset_joint_rotations();
        assert_eq!(pose.skeleton.arm_r.rotation, Vec3::zero());
        assert_eq!(pose.skeleton.torso.position.y, 1.0);

        let world = pose.matrices(&s_a).arm_r * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((world.x - pose.skeleton.arm_r.position.x).abs() < 1e-5);
    }
}
