//! 4x4 matrices stored column-major.
//!
//! `multiply(a, b)` is `a * b`: applied to a column vector, `b` acts first.
//! Model matrices are therefore composed as `T * R * S` (scale, then rotate,
//! then translate).
//!
//! The arithmetic is glam's; this module keeps the flat `[f32; 16]` surface
//! the uniform buffers consume and rejects degenerate input before it reaches
//! glam, which would otherwise return NaNs.

use glam::{Quat, Vec4};

use super::vec::{self, Vec3};
use super::{to_radians, EPSILON};
use crate::error::{Error, Result};

pub type Mat4 = [f32; 16];

pub const IDENTITY: Mat4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

#[inline]
fn load(m: &Mat4) -> glam::Mat4 {
    glam::Mat4::from_cols_array(m)
}

pub fn translation(v: Vec3) -> Mat4 {
    glam::Mat4::from_translation(v.into()).to_cols_array()
}

pub fn scaling(v: Vec3) -> Mat4 {
    glam::Mat4::from_scale(v.into()).to_cols_array()
}

/// Unit quaternion for `degrees` around `axis`, `None` when the rotation is a
/// no-op (zero angle or an axis shorter than [`EPSILON`]).
fn axis_angle(axis: Vec3, degrees: f32) -> Option<Quat> {
    let axis = vec::normalize(axis);
    if degrees == 0.0 || vec::is_zero(axis) {
        return None;
    }
    Some(Quat::from_axis_angle(axis.into(), to_radians(degrees)))
}

/// Rotation of `degrees` around `axis`.
///
/// The axis is normalized first. A zero angle or an axis shorter than
/// [`EPSILON`] yields the identity.
pub fn rotation(axis: Vec3, degrees: f32) -> Mat4 {
    match axis_angle(axis, degrees) {
        Some(q) => glam::Mat4::from_quat(q).to_cols_array(),
        None => IDENTITY,
    }
}

pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    (load(a) * load(b)).to_cols_array()
}

pub fn transpose(m: &Mat4) -> Mat4 {
    load(m).transpose().to_cols_array()
}

/// Model matrix `T * R * S`.
pub fn compose(translate: Vec3, rotate_axis: Vec3, rotate_deg: f32, scale: Vec3) -> Mat4 {
    let rotation = axis_angle(rotate_axis, rotate_deg).unwrap_or(Quat::IDENTITY);
    glam::Mat4::from_scale_rotation_translation(scale.into(), rotation, translate.into())
        .to_cols_array()
}

/// Transforms a point (`w = 1`), applying the perspective divide when needed.
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    let v = load(m) * Vec4::new(p[0], p[1], p[2], 1.0);
    if v.w != 0.0 && v.w != 1.0 {
        (v.truncate() / v.w).into()
    } else {
        v.truncate().into()
    }
}

/// Transforms a direction (`w = 0`); translation does not apply.
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    load(m).transform_vector3(v.into()).into()
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// Degenerate input (coincident `eye`/`target`, or `up` parallel to the view
/// direction) returns the identity rather than a NaN-filled matrix.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let forward = vec::normalize(vec::sub(target, eye));
    if vec::is_zero(forward) || vec::is_zero(vec::cross(forward, up)) {
        return IDENTITY;
    }
    glam::Mat4::look_at_rh(eye.into(), target.into(), up.into()).to_cols_array()
}

/// Orthographic projection of the unit box (`-1..1` in x and y).
pub fn orthographic(near: f32, far: f32) -> Result<Mat4> {
    orthographic_bounds(-1.0, 1.0, -1.0, 1.0, near, far)
}

/// Orthographic projection mapping view-space depth `-near..-far` to `0..1`.
pub fn orthographic_bounds(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Result<Mat4> {
    check_depth_range(near, far)?;
    if (right - left).abs() < EPSILON || (top - bottom).abs() < EPSILON {
        return Err(Error::invalid(format!(
            "orthographic bounds are empty (left {left}, right {right}, bottom {bottom}, top {top})"
        )));
    }
    Ok(glam::Mat4::orthographic_rh(left, right, bottom, top, near, far).to_cols_array())
}

/// Right-handed perspective projection with depth mapped to `0..1`.
///
/// `fov_y` is the vertical field of view in degrees.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    check_depth_range(near, far)?;
    if !(fov_y > 0.0 && fov_y < 180.0) {
        return Err(Error::invalid(format!("fov_y must be within (0, 180) degrees, got {fov_y}")));
    }
    if !(aspect > 0.0 && aspect.is_finite()) {
        return Err(Error::invalid(format!("aspect ratio must be positive, got {aspect}")));
    }
    Ok(glam::Mat4::perspective_rh(to_radians(fov_y), aspect, near, far).to_cols_array())
}

fn check_depth_range(near: f32, far: f32) -> Result<()> {
    if !(near > 0.0 && near.is_finite()) {
        return Err(Error::invalid(format!("near plane must be positive, got {near}")));
    }
    if !(far > near && far.is_finite()) {
        return Err(Error::invalid(format!(
            "far plane ({far}) must lie beyond near plane ({near})"
        )));
    }
    Ok(())
}

/// Element-wise comparison within `eps`.
pub fn approx_eq(a: &Mat4, b: &Mat4, eps: f32) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= eps)
}
