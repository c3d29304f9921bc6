pub use ::vek::{Mat4, Quaternion, Transform, Vec2, Vec3, Vec4};
