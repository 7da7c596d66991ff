//! Fixed-size vector operations.

use super::EPSILON;

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

pub const ZERO: Vec3 = [0.0, 0.0, 0.0];
pub const ONE: Vec3 = [1.0, 1.0, 1.0];
pub const X: Vec3 = [1.0, 0.0, 0.0];
pub const Y: Vec3 = [0.0, 1.0, 0.0];
pub const Z: Vec3 = [0.0, 0.0, 1.0];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    (glam::Vec3::from(a) + glam::Vec3::from(b)).into()
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    (glam::Vec3::from(a) - glam::Vec3::from(b)).into()
}

#[inline]
pub fn scale(v: Vec3, s: f32) -> Vec3 {
    (glam::Vec3::from(v) * s).into()
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    glam::Vec3::from(a).dot(b.into())
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    glam::Vec3::from(a).cross(b.into()).into()
}

#[inline]
pub fn length(v: Vec3) -> f32 {
    glam::Vec3::from(v).length()
}

/// Returns `v` scaled to unit length.
///
/// Vectors shorter than [`EPSILON`] normalize to the zero vector instead of
/// producing NaNs; callers detect that case with [`is_zero`].
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    let v = glam::Vec3::from(v);
    if v.length() < EPSILON { ZERO } else { v.normalize().into() }
}

#[inline]
pub fn is_zero(v: Vec3) -> bool {
    length(v) < EPSILON
}
