//! Camera description and view-projection derivation.
//!
//! A camera is a transform (eye, target, up) plus a projection. Nothing is
//! cached: the renderer recomputes the matrix every time a camera is supplied,
//! since any field may change between frames.

use crate::error::Result;
use crate::math::{mat4, vec, Mat4, Vec3};

/// Where the camera sits and what it looks at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTransform {
    /// Eye position in world space.
    pub translate: Vec3,
    /// Point the camera looks at.
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            translate: [0.0, 0.0, 5.0],
            look_at: vec::ZERO,
            up: vec::Y,
        }
    }
}

/// Projection kind. Angles are in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Projection {
    Orthographic { near: f32, far: f32 },
    Perspective { fov_y: f32, near: f32, far: f32 },
}

impl Projection {
    pub const DEFAULT_FOV_Y: f32 = 60.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 100.0;

    /// Projection matrix for the given aspect ratio.
    ///
    /// Orthographic projections ignore `aspect`.
    pub fn matrix(&self, aspect: f32) -> Result<Mat4> {
        match *self {
            Projection::Orthographic { near, far } => mat4::orthographic(near, far),
            Projection::Perspective { fov_y, near, far } => {
                mat4::perspective(fov_y, aspect, near, far)
            }
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            fov_y: Self::DEFAULT_FOV_Y,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Camera {
    pub transform: CameraTransform,
    pub projection: Projection,
}

impl Camera {
    pub fn perspective(fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            transform: CameraTransform::default(),
            projection: Projection::Perspective { fov_y, near, far },
        }
    }

    pub fn orthographic(near: f32, far: f32) -> Self {
        Self {
            transform: CameraTransform::default(),
            projection: Projection::Orthographic { near, far },
        }
    }

    pub fn with_position(mut self, translate: Vec3) -> Self {
        self.transform.translate = translate;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.transform.look_at = target;
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.transform.up = up;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        let t = &self.transform;
        mat4::look_at(t.translate, t.look_at, t.up)
    }

    #[inline]
    pub fn view_projection(&self, aspect: f32) -> Result<Mat4> {
        compute_view_projection(self, aspect)
    }
}

/// `projection * view` for `camera` at the given aspect ratio.
pub fn compute_view_projection(camera: &Camera, aspect: f32) -> Result<Mat4> {
    let projection = camera.projection.matrix(aspect)?;
    Ok(mat4::multiply(&projection, &camera.view_matrix()))
}
