use super::bind_group::RenderBindGroup;
use super::object::RenderObject;
use super::uniform::{UniformLayout, DYNAMIC_STRIDE, GROUP_SHARED, MAX_BIND_GROUPS};
use super::TextureId;
use crate::device::GraphicsDevice;

/// A compiled pipeline, its shared bind groups and the objects drawn with it.
///
/// Group 0 (camera) and group 1 (model matrix plus dynamic uniforms) are owned
/// here; group 2 lives on each object.
pub struct RenderPipeline<D: GraphicsDevice + ?Sized> {
    pub(crate) label: String,
    pub(crate) pipeline: D::Pipeline,
    pub(crate) max_obj_count: usize,
    pub(crate) objects: Vec<RenderObject<D>>,
    /// Indexed by group number; `None` for groups not owned by the pipeline.
    pub(crate) bind_groups: [Option<RenderBindGroup<D>>; MAX_BIND_GROUPS],
    /// Layout for per-object group 2, when any uniform is non-dynamic.
    pub(crate) object_layout: Option<D::BindGroupLayout>,
    pub(crate) uniforms: UniformLayout,
}

impl<D: GraphicsDevice + ?Sized> RenderPipeline<D> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn max_obj_count(&self) -> usize {
        self.max_obj_count
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn objects(&self) -> &[RenderObject<D>] {
        &self.objects
    }

    pub fn is_full(&self) -> bool {
        self.objects.len() >= self.max_obj_count
    }

    /// Texture sampled through group 0, if the pipeline was created with one.
    pub fn texture(&self) -> Option<TextureId> {
        self.bind_groups[GROUP_SHARED as usize]
            .as_ref()
            .and_then(|group| group.texture)
    }

    /// Offsets to bind group 1 with for the object in `slot`, one per entry.
    pub(crate) fn dynamic_offsets(&self, slot: usize, out: &mut Vec<u32>) {
        out.clear();
        let offset = (slot as u64 * DYNAMIC_STRIDE) as u32;
        out.extend(std::iter::repeat_n(offset, self.uniforms.dynamic_bindings.len()));
    }
}
