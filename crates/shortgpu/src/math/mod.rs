//! Vector and matrix helpers.
//!
//! Conventions:
//! - vectors are plain arrays (`[f32; 2]`, `[f32; 3]`, `[f32; 4]`)
//! - matrices are flat `[f32; 16]`, column-major (`m[col * 4 + row]`), the
//!   layout WGSL expects for `mat4x4<f32>`
//! - right-handed world space, clip depth in `0..=1`
//!
//! Everything here is pure; nothing allocates.

pub mod mat4;
pub mod vec;

pub use mat4::Mat4;
pub use vec::{Vec2, Vec3, Vec4};

/// Tolerance used to detect degenerate lengths (zero axes, coincident points).
pub const EPSILON: f32 = 1e-6;

/// Converts degrees to radians.
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}
