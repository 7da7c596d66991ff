use super::bind_group::RenderBindGroup;
use super::options::UpdateData;
use crate::device::GraphicsDevice;
use crate::math::{mat4, vec, Mat4, Vec3};

/// Translation, rotation and scale of an object.
///
/// The model matrix is `T * R * S`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObjectTransform {
    pub translate: Vec3,
    pub rotate_axis: Vec3,
    /// Degrees.
    pub rotate_deg: f32,
    pub scale: Vec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            translate: vec::ZERO,
            rotate_axis: vec::Y,
            rotate_deg: 0.0,
            scale: vec::ONE,
        }
    }
}

impl ObjectTransform {
    pub fn matrix(&self) -> Mat4 {
        mat4::compose(self.translate, self.rotate_axis, self.rotate_deg, self.scale)
    }

    /// Overlays the fields present in `data`; the rest are retained.
    pub fn merged(&self, data: &UpdateData) -> Self {
        Self {
            translate: data.translate.unwrap_or(self.translate),
            rotate_axis: data.rotate_axis.unwrap_or(self.rotate_axis),
            rotate_deg: data.rotate_deg.unwrap_or(self.rotate_deg),
            scale: data.scale.unwrap_or(self.scale),
        }
    }
}

/// One drawable registered in a pipeline.
pub struct RenderObject<D: GraphicsDevice + ?Sized> {
    pub(crate) label: String,
    pub(crate) visible: bool,
    /// Slot in the pipeline's dynamic arenas; equals the object id.
    pub(crate) slot: usize,
    pub(crate) positions: D::Buffer,
    pub(crate) uvs: D::Buffer,
    pub(crate) normals: D::Buffer,
    pub(crate) vertex_count: u32,
    /// Index buffer and index count.
    pub(crate) indices: Option<(D::Buffer, u32)>,
    pub(crate) instances: u32,
    /// Group 2, present when the pipeline declares non-dynamic uniforms.
    pub(crate) bind_group: Option<RenderBindGroup<D>>,
    pub(crate) transform: ObjectTransform,
}

impl<D: GraphicsDevice + ?Sized> RenderObject<D> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn transform(&self) -> &ObjectTransform {
        &self.transform
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|(_, count)| *count)
    }

    pub fn instances(&self) -> u32 {
        self.instances
    }
}
