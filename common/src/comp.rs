//! Root transform components shared by the animator and the wire format.

use serde::{Deserialize, Serialize};
use vek::*;

/// World position of an avatar's root.
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pos(pub Vec3<f32>);

impl Pos {
    /// Distance to `other` on the ground (XZ) plane, ignoring height.
    pub fn planar_distance(&self, other: Vec3<f32>) -> f32 {
        Vec2::new(self.0.x - other.x, self.0.z - other.z).magnitude()
    }
}

/// Euler orientation of an avatar's root, in radians. `y` is the facing.
#[derive(Copy, Clone, Default, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ori(pub Vec3<f32>);

impl Ori {
    pub fn from_yaw(yaw: f32) -> Self { Self(Vec3::new(0.0, yaw, 0.0)) }

    pub fn yaw(&self) -> f32 { self.0.y }
}
