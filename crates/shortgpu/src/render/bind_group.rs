use super::staging::StagedBuffer;
use super::TextureId;
use crate::device::{
    BindGroupDesc, BindGroupEntry, BindGroupTexture, GraphicsDevice, UniformBinding,
};

/// A device bind group together with the uniform buffers it binds and, for a
/// textured pipeline's group 0, the texture it samples.
///
/// `entries[i]` backs `bindings[i]`.
pub(crate) struct RenderBindGroup<D: GraphicsDevice + ?Sized> {
    pub group: D::BindGroup,
    pub entries: Vec<StagedBuffer<D::Buffer>>,
    pub texture: Option<TextureId>,
}

impl<D: GraphicsDevice + ?Sized> RenderBindGroup<D> {
    /// Allocates one buffer of `buffer_len(binding)` bytes per binding and
    /// binds a window of `binding.size` bytes at offset 0 of each.
    pub fn new(
        device: &mut D,
        label: &str,
        layout: &D::BindGroupLayout,
        bindings: &[UniformBinding],
        buffer_len: impl Fn(&UniformBinding) -> usize,
    ) -> Self {
        Self::with_texture(device, label, layout, bindings, buffer_len, None)
    }

    /// [`RenderBindGroup::new`] plus a sampled texture.
    pub fn with_texture(
        device: &mut D,
        label: &str,
        layout: &D::BindGroupLayout,
        bindings: &[UniformBinding],
        buffer_len: impl Fn(&UniformBinding) -> usize,
        texture: Option<(TextureId, BindGroupTexture<'_, D::Texture, D::Sampler>)>,
    ) -> Self {
        let entries: Vec<StagedBuffer<D::Buffer>> = bindings
            .iter()
            .map(|b| {
                StagedBuffer::new(device, &format!("{label} binding {}", b.binding), buffer_len(b))
            })
            .collect();

        let (texture_id, texture) = texture.unzip();
        let group = {
            let desc_entries: Vec<BindGroupEntry<'_, D::Buffer>> = bindings
                .iter()
                .zip(&entries)
                .map(|(b, staged)| BindGroupEntry {
                    binding: b.binding,
                    buffer: staged.buffer(),
                    size: b.size,
                })
                .collect();

            device.create_bind_group(&BindGroupDesc {
                label,
                layout,
                entries: &desc_entries,
                texture,
            })
        };

        Self {
            group,
            entries,
            texture: texture_id,
        }
    }

    /// Uploads every dirty entry; returns the number of writes issued.
    pub fn flush(&mut self, device: &mut D) -> usize {
        self.entries
            .iter_mut()
            .map(|e| usize::from(e.flush(device)))
            .sum()
    }
}
