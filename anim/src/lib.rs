#![allow(clippy::neg_multiply)]

macro_rules! replace_with_unit {
    ($_:tt) => {
        ()
    };
}

macro_rules! skeleton_impls {
    {
        struct $Skeleton:ident $ComputedSkeleton:ident {
            $(+ $mesh_bone:ident : $wire_name:literal)*
            $($bone:ident)*
        }
    } => {
        /// World matrices of every mesh bone.
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $ComputedSkeleton {
            $(pub $mesh_bone: $crate::vek::Mat4<f32>,)*
        }

        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $Skeleton {
            $(pub $mesh_bone: $crate::Bone,)*
            $(pub $bone: $crate::Bone,)*
        }

        impl $Skeleton {
            pub const BONE_COUNT: usize = [$(replace_with_unit!($mesh_bone),)*].len();

            /// Mesh bone names in declaration order.
            pub const JOINTS: [&'static str; Self::BONE_COUNT] = [$(stringify!($mesh_bone),)*];

            /// The name the remote session uses for each of [`Self::JOINTS`].
            pub const WIRE_JOINTS: [&'static str; Self::BONE_COUNT] = [$($wire_name,)*];

            /// Looks a mesh bone up by its own or its wire name.
            pub fn joint(&self, name: &str) -> Option<&$crate::Bone> {
                $(
                    if name == stringify!($mesh_bone) || name == $wire_name {
                        return Some(&self.$mesh_bone);
                    }
                )*
                None
            }

            pub fn joint_mut(&mut self, name: &str) -> Option<&mut $crate::Bone> {
                $(
                    if name == stringify!($mesh_bone) || name == $wire_name {
                        return Some(&mut self.$mesh_bone);
                    }
                )*
                None
            }

            pub fn joints(&self) -> [(&'static str, &$crate::Bone); Self::BONE_COUNT] {
                [$((stringify!($mesh_bone), &self.$mesh_bone),)*]
            }

            /// Copies every mesh bone of `other`, leaving the other bones alone.
            pub fn set_joints(&mut self, other: &Self) {
                $(self.$mesh_bone = other.$mesh_bone;)*
            }

            /// Whether every mesh bone matches `other` within `epsilon`.
            pub fn joints_eq(&self, other: &Self, epsilon: f32) -> bool {
                true $(&& self.$mesh_bone.approx_eq(&other.$mesh_bone, epsilon))*
            }
        }
    }
}

pub mod humanoid;
pub mod util;
pub mod vek;

use self::vek::*;
use serde::{Deserialize, Serialize};

/// Local transform of a single bone. `rotation` holds XYZ Euler angles in
/// radians.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub position: Vec3<f32>,
    pub rotation: Vec3<f32>,
    pub scale: Vec3<f32>,
}

impl Default for Bone {
    fn default() -> Self {
        Self {
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::one(),
        }
    }
}

impl Bone {
    pub fn at(position: Vec3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn orientation(&self) -> Quaternion<f32> {
        Quaternion::rotation_x(self.rotation.x)
            * Quaternion::rotation_y(self.rotation.y)
            * Quaternion::rotation_z(self.rotation.z)
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let close = |a: Vec3<f32>, b: Vec3<f32>| (a - b).map(f32::abs).reduce_partial_max() <= epsilon;
        close(self.position, other.position)
            && close(self.rotation, other.rotation)
            && close(self.scale, other.scale)
    }
}

impl From<Bone> for Transform<f32, f32, f32> {
    fn from(bone: Bone) -> Self {
        Transform {
            position: bone.position,
            orientation: bone.orientation(),
            scale: bone.scale,
        }
    }
}

impl From<Bone> for Mat4<f32> {
    fn from(bone: Bone) -> Self { Mat4::from(Transform::from(bone)) }
}

pub trait Skeleton: Clone + 'static {
    type Attr;
    type ComputedSkeleton;

    /// World matrices of every mesh bone under `base_mat`.
    fn compute_matrices(&self, base_mat: Mat4<f32>, attr: &Self::Attr) -> Self::ComputedSkeleton;
}

pub trait Animation {
    type Skeleton: Skeleton;
    type Dependency<'a>;

    /// Returns a new skeleton that is generated by the animation.
    ///
    /// `anim_time` is the normalized progress of the run, in `[0, 1]`.
    /// Implementations only read their inputs, so calling this twice with the
    /// same arguments yields the same skeleton.
    fn update_skeleton(
        skeleton: &Self::Skeleton,
        dependency: Self::Dependency<'_>,
        anim_time: f32,
        skeleton_attr: &<Self::Skeleton as Skeleton>::Attr,
    ) -> Self::Skeleton;
}
