use super::options::{ObjectOptions, PipelineOptions, UpdateData};
use super::registry::Registry;
use super::uniform::{GROUP_DYNAMIC, GROUP_OBJECT, GROUP_SHARED};
use super::{ObjectId, PipelineId, TextureId};
use crate::device::{DrawPass, GraphicsDevice, TextureDesc};
use crate::error::Result;
use crate::primitives::Shape;

/// Counters for one [`Renderer::render_frame`] call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub pipelines: usize,
    pub draw_calls: usize,
    /// Objects skipped because they are invisible.
    pub skipped: usize,
    /// Staged ranges uploaded before drawing.
    pub uploads: usize,
}

/// Public entry point: owns the device capability, the registry and the
/// aspect ratio used for camera updates.
///
/// ```no_run
/// # fn demo(device: shortgpu::WgpuDevice, pass: &mut wgpu::RenderPass<'_>) -> shortgpu::Result<()> {
/// use shortgpu::{primitives, ObjectOptions, PipelineOptions, Renderer, UpdateData};
///
/// let mut renderer = Renderer::new(device);
/// let pipeline = renderer.create_pipeline(&PipelineOptions::default(), 16)?;
/// let cube = renderer.add_object(pipeline, &primitives::cube(), &ObjectOptions::default())?;
/// renderer.update(&UpdateData::new(pipeline, cube).with_translate([1.0, 0.0, 0.0]))?;
/// renderer.render_frame(pass);
/// # Ok(())
/// # }
/// ```
pub struct Renderer<D: GraphicsDevice> {
    device: D,
    registry: Registry<D>,
    aspect_ratio: f32,
}

impl<D: GraphicsDevice> Renderer<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            registry: Registry::new(),
            aspect_ratio: 1.0,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.set_aspect_ratio(aspect_ratio);
        self
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn registry(&self) -> &Registry<D> {
        &self.registry
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Aspect ratio applied to cameras in later updates. Non-positive or
    /// non-finite values are ignored.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        } else {
            log::warn!("ignoring aspect ratio {aspect_ratio}");
        }
    }

    /// Derives the aspect ratio from a drawable size; a zero dimension
    /// (minimized window) keeps the current one.
    ///
    /// Only cameras supplied by later [`Renderer::update`] calls see the new
    /// ratio. The view-projection already staged for each pipeline keeps the
    /// old one until an update carries a camera again.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// See [`Registry::register_texture`].
    pub fn register_texture(&mut self, texture: D::Texture) -> TextureId {
        self.registry.register_texture(texture)
    }

    /// See [`Registry::create_texture`].
    pub fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Result<TextureId> {
        self.registry.create_texture(&mut self.device, desc)
    }

    pub fn create_pipeline(
        &mut self,
        options: &PipelineOptions,
        max_obj_count: usize,
    ) -> Result<PipelineId> {
        self.registry
            .create_pipeline(&mut self.device, options, max_obj_count)
    }

    pub fn add_object(
        &mut self,
        pipeline: PipelineId,
        shape: &Shape,
        options: &ObjectOptions,
    ) -> Result<ObjectId> {
        self.registry
            .add_object(&mut self.device, pipeline, shape, options)
    }

    pub fn update(&mut self, data: &UpdateData) -> Result<()> {
        self.registry.update(data, self.aspect_ratio)
    }

    /// Uploads staged data without drawing.
    pub fn flush(&mut self) -> usize {
        self.registry.flush(&mut self.device)
    }

    /// Uploads staged data, then records every visible object into `pass`.
    ///
    /// Pipelines are drawn in creation order, objects in insertion order.
    pub fn render_frame<P>(&mut self, pass: &mut P) -> FrameStats
    where
        P: DrawPass<D> + ?Sized,
    {
        let mut stats = FrameStats {
            uploads: self.registry.flush(&mut self.device),
            ..FrameStats::default()
        };
        let mut offsets = Vec::new();

        for pipeline in self.registry.pipelines() {
            stats.pipelines += 1;
            pass.set_pipeline(&pipeline.pipeline);
            if let Some(shared) = &pipeline.bind_groups[GROUP_SHARED as usize] {
                pass.set_bind_group(GROUP_SHARED, &shared.group, &[]);
            }

            let arena = pipeline.bind_groups[GROUP_DYNAMIC as usize].as_ref();
            for object in &pipeline.objects {
                if !object.visible {
                    stats.skipped += 1;
                    continue;
                }

                if let Some(arena) = arena {
                    pipeline.dynamic_offsets(object.slot, &mut offsets);
                    pass.set_bind_group(GROUP_DYNAMIC, &arena.group, &offsets);
                }
                if let Some(group) = &object.bind_group {
                    pass.set_bind_group(GROUP_OBJECT, &group.group, &[]);
                }

                pass.set_vertex_buffer(0, &object.positions);
                pass.set_vertex_buffer(1, &object.uvs);
                pass.set_vertex_buffer(2, &object.normals);

                let instances = 0..object.instances;
                match &object.indices {
                    Some((buffer, count)) => {
                        pass.set_index_buffer(buffer);
                        pass.draw_indexed(0..*count, instances);
                    }
                    None => pass.draw(0..object.vertex_count, instances),
                }
                stats.draw_calls += 1;
            }
        }

        log::trace!(
            "frame: {} pipelines, {} draws, {} skipped, {} uploads",
            stats.pipelines,
            stats.draw_calls,
            stats.skipped,
            stats.uploads
        );
        stats
    }
}
