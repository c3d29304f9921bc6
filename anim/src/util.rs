//! Facing-relative movement math shared by the locomotion generators.
//!
//! Every displacement rotates a canonical offset by the yaw `theta` captured
//! when the run started, never by world axes.

use crate::vek::*;
use std::f32::consts::FRAC_PI_2;

/// Signed arc of a quarter turn. Left turns are negative.
pub const TURN_ARC: f32 = FRAC_PI_2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Heading {
    Forward,
    Backward,
    Left,
    Right,
}

impl Heading {
    /// Unit direction on the ground plane for an avatar facing `theta`.
    pub fn direction(self, theta: f32) -> Vec3<f32> {
        let (sin, cos) = theta.sin_cos();
        match self {
            Heading::Forward => Vec3::new(sin, 0.0, cos),
            Heading::Backward => Vec3::new(-sin, 0.0, -cos),
            Heading::Right => Vec3::new(cos, 0.0, -sin),
            Heading::Left => Vec3::new(-cos, 0.0, sin),
        }
    }

    pub fn displacement(self, theta: f32, distance: f32) -> Vec3<f32> {
        self.direction(theta) * distance
    }
}

/// Yaw after turning `arc` radians from `start_ori`, scaled by `progress`.
pub fn turn(start_ori: f32, arc: f32, progress: f32) -> f32 { start_ori + arc * progress }

/// `|sin(x)|`, the shape of bounces and repetitions.
pub fn bounce(x: f32) -> f32 { x.sin().abs() }
