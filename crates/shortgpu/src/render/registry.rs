//! Pipeline and object bookkeeping.
//!
//! The registry owns every device handle it creates. Callers only see
//! [`PipelineId`] / [`ObjectId`] / [`TextureId`]. Updates are validated in full before any
//! state changes, then written to CPU-side staging copies; [`Registry::flush`]
//! moves the dirty ranges to the device.

use super::bind_group::RenderBindGroup;
use super::object::{ObjectTransform, RenderObject};
use super::options::{ObjectOptions, PipelineOptions, UpdateData};
use super::pipeline::RenderPipeline;
use super::uniform::{
    Placement, UniformLayout, CAMERA_BINDING, DYNAMIC_STRIDE, GROUP_DYNAMIC, GROUP_SHARED,
    MAT4_SIZE, MAX_BIND_GROUPS, SAMPLER_BINDING, TEXTURE_BINDING,
};
use super::{ObjectId, PipelineId, TextureId};
use crate::camera::compute_view_projection;
use crate::device::{
    BindGroupLayoutDesc, BindGroupTexture, BufferDesc, BufferUsage, GraphicsDevice, PipelineDesc,
    ShaderStage, TextureBinding, TextureDesc, UniformBinding,
};
use crate::error::{Error, Result};
use crate::math::{mat4, Mat4};
use crate::primitives::Shape;

/// Buffers backing non-dynamic uniforms are padded to this size.
const OBJECT_UNIFORM_ALIGN: u64 = 16;

const PIPELINE_TEXTURE: TextureBinding = TextureBinding {
    texture: TEXTURE_BINDING,
    sampler: SAMPLER_BINDING,
    visibility: ShaderStage::Fragment,
};

/// Arena of pipelines, their objects and the textures they sample.
pub struct Registry<D: GraphicsDevice + ?Sized> {
    pipelines: Vec<RenderPipeline<D>>,
    textures: Vec<D::Texture>,
    /// Shared by every textured pipeline; created with the first one.
    sampler: Option<D::Sampler>,
}

impl<D: GraphicsDevice + ?Sized> Default for Registry<D> {
    fn default() -> Self {
        Self {
            pipelines: Vec::new(),
            textures: Vec::new(),
            sampler: None,
        }
    }
}

impl<D: GraphicsDevice + ?Sized> Registry<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a texture created outside the registry.
    pub fn register_texture(&mut self, texture: D::Texture) -> TextureId {
        self.textures.push(texture);
        TextureId::from_index(self.textures.len() - 1)
    }

    /// Uploads an RGBA8 image through the device and registers it.
    pub fn create_texture(&mut self, device: &mut D, desc: &TextureDesc<'_>) -> Result<TextureId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::invalid(format!(
                "texture {} has zero size ({}x{})",
                desc.label, desc.width, desc.height
            )));
        }
        let expected = desc
            .expected_len()
            .ok_or_else(|| Error::invalid(format!("texture {} is too large", desc.label)))?;
        if desc.pixels.len() != expected {
            return Err(Error::invalid(format!(
                "texture {} needs {expected} bytes of RGBA8, got {}",
                desc.label,
                desc.pixels.len()
            )));
        }

        let id = self.register_texture(device.create_texture(desc));
        log::debug!("created texture {} ({}x{})", desc.label, desc.width, desc.height);
        Ok(id)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Compiles a pipeline and allocates its shared buffers.
    ///
    /// The view-projection starts at identity until an update supplies a camera.
    pub fn create_pipeline(
        &mut self,
        device: &mut D,
        options: &PipelineOptions,
        max_obj_count: usize,
    ) -> Result<PipelineId> {
        if max_obj_count == 0 {
            return Err(Error::config("max_obj_count must be at least 1"));
        }
        let arena_len = (max_obj_count as u64)
            .checked_mul(DYNAMIC_STRIDE)
            .filter(|&len| len <= u32::MAX as u64)
            .ok_or_else(|| Error::config(format!("max_obj_count {max_obj_count} is too large")))?
            as usize;
        if options.vertex_function.is_empty() || options.fragment_function.is_empty() {
            return Err(Error::config("entry point names must not be empty"));
        }
        let uniforms = UniformLayout::new(&options.uniforms)?;
        let texture = options
            .texture
            .map(|id| {
                self.textures
                    .get(id.index())
                    .map(|texture| (id, texture))
                    .ok_or(Error::TextureNotFound(id))
            })
            .transpose()?;

        let id = PipelineId::from_index(self.pipelines.len());
        let label = options
            .label
            .clone()
            .unwrap_or_else(|| format!("pipeline {}", id.index()));

        let camera_bindings = [UniformBinding {
            binding: CAMERA_BINDING,
            visibility: ShaderStage::Vertex,
            dynamic: false,
            size: MAT4_SIZE,
        }];
        let camera_label = format!("{label} camera");
        let camera_layout = device.create_bind_group_layout(&BindGroupLayoutDesc {
            label: &camera_label,
            entries: &camera_bindings,
            texture: texture.is_some().then_some(PIPELINE_TEXTURE),
        });

        let arena_label = format!("{label} objects");
        let arena_layout = device.create_bind_group_layout(&BindGroupLayoutDesc {
            label: &arena_label,
            entries: &uniforms.dynamic_bindings,
            texture: None,
        });

        let object_layout = uniforms.has_object_group().then(|| {
            device.create_bind_group_layout(&BindGroupLayoutDesc {
                label: &format!("{label} object uniforms"),
                entries: &uniforms.object_bindings,
                texture: None,
            })
        });

        let pipeline = {
            let mut layouts = vec![&camera_layout, &arena_layout];
            layouts.extend(object_layout.as_ref());
            device.create_pipeline(&PipelineDesc {
                label: &label,
                shader_source: &options.shader,
                vertex_entry: &options.vertex_function,
                fragment_entry: &options.fragment_function,
                cull_mode: options.cull_mode,
                bind_group_layouts: &layouts,
            })?
        };

        let sampled = match texture {
            Some((id, texture)) => {
                let sampler = self
                    .sampler
                    .get_or_insert_with(|| device.create_sampler("shortgpu sampler"));
                Some((
                    id,
                    BindGroupTexture {
                        binding: PIPELINE_TEXTURE,
                        texture,
                        sampler,
                    },
                ))
            }
            None => None,
        };
        let mut camera = RenderBindGroup::with_texture(
            device,
            &camera_label,
            &camera_layout,
            &camera_bindings,
            |b| b.size as usize,
            sampled,
        );
        camera.entries[0].write(0, bytemuck::bytes_of(&mat4::IDENTITY));

        let arena = RenderBindGroup::new(
            device,
            &arena_label,
            &arena_layout,
            &uniforms.dynamic_bindings,
            |_| arena_len,
        );

        let mut bind_groups: [Option<RenderBindGroup<D>>; MAX_BIND_GROUPS] =
            std::array::from_fn(|_| None);
        bind_groups[GROUP_SHARED as usize] = Some(camera);
        bind_groups[GROUP_DYNAMIC as usize] = Some(arena);

        log::debug!(
            "created {label}: {max_obj_count} slots, {} dynamic / {} object uniforms, texture {:?}",
            uniforms.dynamic_bindings.len() - 1,
            uniforms.object_bindings.len(),
            options.texture.map(TextureId::index)
        );

        self.pipelines.push(RenderPipeline {
            label,
            pipeline,
            max_obj_count,
            objects: Vec::new(),
            bind_groups,
            object_layout,
            uniforms,
        });
        Ok(id)
    }

    /// Uploads `shape` and registers it as the next object of `pipeline_id`.
    pub fn add_object(
        &mut self,
        device: &mut D,
        pipeline_id: PipelineId,
        shape: &Shape,
        options: &ObjectOptions,
    ) -> Result<ObjectId> {
        let pipeline = self
            .pipelines
            .get_mut(pipeline_id.index())
            .ok_or(Error::PipelineNotFound(pipeline_id))?;
        if pipeline.is_full() {
            return Err(Error::Capacity {
                pipeline: pipeline_id,
                max: pipeline.max_obj_count,
            });
        }

        shape.validate()?;
        if shape.vertices.is_empty() {
            return Err(Error::invalid("shape has no vertices"));
        }
        if shape.indices.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::invalid("shape has an empty index list"));
        }
        if options.instances == 0 {
            return Err(Error::invalid("instance count must be at least 1"));
        }
        let vertex_count = u32::try_from(shape.vertex_count())
            .map_err(|_| Error::invalid("shape has too many vertices"))?;
        let index_count = shape
            .index_count()
            .map(u32::try_from)
            .transpose()
            .map_err(|_| Error::invalid("shape has too many indices"))?;

        let id = ObjectId::from_index(pipeline.objects.len());
        let slot = id.index();
        let label = options
            .label
            .clone()
            .unwrap_or_else(|| format!("{} object {slot}", pipeline.label));

        let mut upload = |name: &str, usage: BufferUsage, contents: &[u8]| {
            device.create_buffer(&BufferDesc {
                label: &format!("{label} {name}"),
                usage,
                contents,
            })
        };
        let positions = upload(
            "positions",
            BufferUsage::Vertex,
            bytemuck::cast_slice(shape.vertices.as_slice()),
        );
        let uvs = upload("uvs", BufferUsage::Vertex, bytemuck::cast_slice(shape.uvs.as_slice()));
        let normals = upload(
            "normals",
            BufferUsage::Vertex,
            bytemuck::cast_slice(shape.normals.as_slice()),
        );
        let indices = match (&shape.indices, index_count) {
            (Some(indices), Some(count)) => Some((
                upload("indices", BufferUsage::Index, bytemuck::cast_slice(indices.as_slice())),
                count,
            )),
            _ => None,
        };

        let bind_group = pipeline.object_layout.as_ref().map(|layout| {
            RenderBindGroup::new(
                device,
                &format!("{label} uniforms"),
                layout,
                &pipeline.uniforms.object_bindings,
                |b| b.size.next_multiple_of(OBJECT_UNIFORM_ALIGN) as usize,
            )
        });

        let transform = ObjectTransform::default();
        if let Some(arena) = pipeline.bind_groups[GROUP_DYNAMIC as usize].as_mut() {
            arena.entries[0].write(arena_offset(slot), bytemuck::bytes_of(&transform.matrix()));
        }

        log::debug!(
            "added {label}: {vertex_count} vertices, {} indices, {} instances",
            index_count.unwrap_or(0),
            options.instances
        );

        pipeline.objects.push(RenderObject {
            label,
            visible: options.visible,
            slot,
            positions,
            uvs,
            normals,
            vertex_count,
            indices,
            instances: options.instances,
            bind_group,
            transform,
        });
        Ok(id)
    }

    /// Applies a partial update to one object (and, for `camera`, its pipeline).
    ///
    /// Nothing is staged unless every field validates.
    pub fn update(&mut self, data: &UpdateData, aspect_ratio: f32) -> Result<()> {
        let pipeline = self
            .pipelines
            .get_mut(data.pipeline_id.index())
            .ok_or(Error::PipelineNotFound(data.pipeline_id))?;
        let slot = data.object_id.index();
        if slot >= pipeline.objects.len() {
            return Err(Error::ObjectNotFound {
                pipeline: data.pipeline_id,
                object: data.object_id,
            });
        }

        let view_projection = data
            .camera
            .as_ref()
            .map(|camera| compute_view_projection(camera, aspect_ratio))
            .transpose()?;
        let payloads = data.uniform_data.as_deref().unwrap_or_default();
        pipeline.uniforms.check_payloads(payloads)?;

        let RenderPipeline {
            objects,
            bind_groups,
            uniforms,
            ..
        } = pipeline;
        let object = &mut objects[slot];

        if let Some(visible) = data.visible {
            object.visible = visible;
        }

        let [camera, arena, ..] = bind_groups;
        if data.touches_transform() {
            object.transform = object.transform.merged(data);
            if let Some(arena) = arena.as_mut() {
                arena.entries[0]
                    .write(arena_offset(slot), bytemuck::bytes_of(&object.transform.matrix()));
            }
        }

        if let (Some(view_projection), Some(camera)) = (view_projection, camera.as_mut()) {
            camera.entries[0].write(0, bytemuck::bytes_of(&view_projection));
        }

        for (payload, placement) in payloads.iter().zip(&uniforms.placements) {
            match *placement {
                Placement::Dynamic(entry) => {
                    if let Some(arena) = arena.as_mut() {
                        arena.entries[entry].write(arena_offset(slot), payload.as_bytes());
                    }
                }
                Placement::Object(entry) => {
                    if let Some(group) = object.bind_group.as_mut() {
                        group.entries[entry].write(0, payload.as_bytes());
                    }
                }
            }
        }

        Ok(())
    }

    /// Uploads every dirty staged range; returns the number of device writes.
    pub fn flush(&mut self, device: &mut D) -> usize {
        let mut writes = 0;
        for pipeline in &mut self.pipelines {
            for group in pipeline.bind_groups.iter_mut().flatten() {
                writes += group.flush(device);
            }
            for object in &mut pipeline.objects {
                if let Some(group) = object.bind_group.as_mut() {
                    writes += group.flush(device);
                }
            }
        }
        if writes > 0 {
            log::trace!("flushed {writes} staged ranges");
        }
        writes
    }

    // ── read-back ─────────────────────────────────────────────────────────

    pub fn pipelines(&self) -> &[RenderPipeline<D>] {
        &self.pipelines
    }

    pub fn pipeline(&self, id: PipelineId) -> Result<&RenderPipeline<D>> {
        self.pipelines
            .get(id.index())
            .ok_or(Error::PipelineNotFound(id))
    }

    pub fn object(&self, pipeline: PipelineId, object: ObjectId) -> Result<&RenderObject<D>> {
        self.pipeline(pipeline)?
            .objects
            .get(object.index())
            .ok_or(Error::ObjectNotFound { pipeline, object })
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn object_count(&self, pipeline: PipelineId) -> Result<usize> {
        Ok(self.pipeline(pipeline)?.object_count())
    }

    pub fn max_obj_count(&self, pipeline: PipelineId) -> Result<usize> {
        Ok(self.pipeline(pipeline)?.max_obj_count)
    }

    pub fn is_visible(&self, pipeline: PipelineId, object: ObjectId) -> Result<bool> {
        Ok(self.object(pipeline, object)?.visible)
    }

    /// The model matrix currently staged for an object.
    pub fn model_matrix(&self, pipeline: PipelineId, object: ObjectId) -> Result<Mat4> {
        let slot = self.object(pipeline, object)?.slot;
        let arena = self.group(pipeline, GROUP_DYNAMIC)?;
        let bytes = arena.entries[0].read(arena_offset(slot), MAT4_SIZE as usize);
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// The view-projection currently staged for a pipeline.
    pub fn view_projection(&self, pipeline: PipelineId) -> Result<Mat4> {
        let camera = self.group(pipeline, GROUP_SHARED)?;
        Ok(bytemuck::pod_read_unaligned(camera.entries[0].read(0, MAT4_SIZE as usize)))
    }

    /// Staged bytes of custom uniform `index` (declaration order) for an object.
    pub fn uniform_bytes(
        &self,
        pipeline: PipelineId,
        object: ObjectId,
        index: usize,
    ) -> Result<&[u8]> {
        let render_pipeline = self.pipeline(pipeline)?;
        let render_object = self.object(pipeline, object)?;
        let uniforms = &render_pipeline.uniforms;
        let (placement, size) = uniforms
            .placements
            .get(index)
            .zip(uniforms.sizes.get(index))
            .ok_or_else(|| Error::invalid(format!("pipeline has no uniform {index}")))?;
        let size = *size as usize;

        match *placement {
            Placement::Dynamic(entry) => {
                let arena = self.group(pipeline, GROUP_DYNAMIC)?;
                Ok(arena.entries[entry].read(arena_offset(render_object.slot), size))
            }
            Placement::Object(entry) => render_object
                .bind_group
                .as_ref()
                .map(|group| group.entries[entry].read(0, size))
                .ok_or_else(|| Error::Device("object has no uniform bind group".to_string())),
        }
    }

    fn group(&self, pipeline: PipelineId, index: u32) -> Result<&RenderBindGroup<D>> {
        self.pipeline(pipeline)?.bind_groups[index as usize]
            .as_ref()
            .ok_or_else(|| Error::Device(format!("pipeline has no bind group {index}")))
    }
}

fn arena_offset(slot: usize) -> usize {
    slot * DYNAMIC_STRIDE as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::device::recording::RecordingDevice;
    use crate::math::vec;
    use crate::primitives;
    use crate::render::{UniformDescription, UniformType, UniformValue};

    fn setup(max: usize) -> (RecordingDevice, Registry<RecordingDevice>, PipelineId) {
        setup_with(&PipelineOptions::default(), max)
    }

    fn setup_with(
        options: &PipelineOptions,
        max: usize,
    ) -> (RecordingDevice, Registry<RecordingDevice>, PipelineId) {
        let mut device = RecordingDevice::new();
        let mut registry = Registry::new();
        let id = registry.create_pipeline(&mut device, options, max).unwrap();
        (device, registry, id)
    }

    fn add(
        device: &mut RecordingDevice,
        registry: &mut Registry<RecordingDevice>,
        pipeline: PipelineId,
    ) -> ObjectId {
        registry
            .add_object(device, pipeline, &primitives::cube(), &ObjectOptions::default())
            .unwrap()
    }

    fn with_uniforms() -> PipelineOptions {
        PipelineOptions::default()
            .with_uniform(UniformDescription::new(1, UniformType::Vec4f))
            .with_uniform(UniformDescription::new(0, UniformType::F32).with_dynamic(false))
    }

    // ── creation ──────────────────────────────────────────────────────────

    #[test]
    fn pipeline_resources() {
        let (device, registry, id) = setup(3);

        assert_eq!(id, PipelineId::from_index(0));
        assert_eq!(registry.pipeline_count(), 1);
        assert_eq!(registry.max_obj_count(id), Ok(3));
        assert_eq!(registry.object_count(id), Ok(0));
        assert_eq!(registry.view_projection(id), Ok(mat4::IDENTITY));

        assert_eq!(device.pipelines.len(), 1);
        assert_eq!(device.pipelines[0].label, "pipeline 0");
        assert_eq!(device.pipelines[0].layouts.len(), 2);

        // camera + one arena of 3 slots
        assert_eq!(device.buffers_with_usage(BufferUsage::Uniform), 2);
        let arena = registry.pipelines()[0].bind_groups[1].as_ref().unwrap();
        assert_eq!(arena.entries[0].len(), 3 * 256);
    }

    #[test]
    fn dynamic_arena_layout() {
        let (device, registry, _) = setup_with(&with_uniforms(), 2);

        let pipeline = &registry.pipelines()[0];
        let arena = pipeline.bind_groups[1].as_ref().unwrap();
        assert_eq!(arena.entries.len(), 2);

        let recorded = &device.bind_groups[arena.group];
        assert_eq!(recorded.entries, vec![(0, 1, 64), (1, 2, 16)]);
        assert!(device.layouts[recorded.layout].entries.iter().all(|b| b.dynamic));
        assert_eq!(device.layouts[recorded.layout].texture, None);

        assert_eq!(device.pipelines[0].layouts.len(), 3);
        assert!(pipeline.object_layout.is_some());
    }

    #[test]
    fn configuration_errors() {
        let mut device = RecordingDevice::new();
        let mut registry: Registry<RecordingDevice> = Registry::new();
        let create = |registry: &mut Registry<RecordingDevice>,
                      device: &mut RecordingDevice,
                      options: PipelineOptions,
                      max: usize| registry.create_pipeline(device, &options, max);

        let cases = [
            (PipelineOptions::default(), 0),
            (
                PipelineOptions::default()
                    .with_uniform(UniformDescription::new(1, UniformType::Struct)),
                1,
            ),
            (
                PipelineOptions::default().with_uniform(UniformDescription::bytes(1, 512)),
                1,
            ),
            (
                PipelineOptions::default().with_uniform(UniformDescription::new(0, UniformType::F32)),
                1,
            ),
            (PipelineOptions::default().with_entry_points("", "fs_main"), 1),
        ];
        for (options, max) in cases {
            let result = create(&mut registry, &mut device, options, max);
            assert!(matches!(result, Err(Error::Configuration(_))), "{result:?}");
        }

        assert_eq!(registry.pipeline_count(), 0);
        assert!(device.buffers.is_empty());
    }

    #[test]
    fn object_ids_are_sequential() {
        let (mut device, mut registry, p) = setup(3);
        let ids: Vec<_> = (0..3).map(|_| add(&mut device, &mut registry, p)).collect();
        assert_eq!(ids, (0..3).map(ObjectId::from_index).collect::<Vec<_>>());
        assert_eq!(registry.object_count(p), Ok(3));
    }

    #[test]
    fn new_object_has_identity_model() {
        let (mut device, mut registry, p) = setup(2);
        add(&mut device, &mut registry, p);
        let o = add(&mut device, &mut registry, p);
        assert_eq!(registry.model_matrix(p, o), Ok(mat4::IDENTITY));
        assert_eq!(registry.is_visible(p, o), Ok(true));
    }

    #[test]
    fn object_buffers_hold_shape_data() {
        let (mut device, mut registry, p) = setup(1);
        let shape = primitives::plane(2);
        let o = registry
            .add_object(&mut device, p, &shape, &ObjectOptions::default())
            .unwrap();

        let object = registry.object(p, o).unwrap();
        assert_eq!(object.vertex_count(), 9);
        assert_eq!(object.index_count(), Some(24));
        assert_eq!(
            device.bytes(object.positions),
            bytemuck::cast_slice::<_, u8>(shape.vertices.as_slice())
        );
        let (indices, _) = object.indices.unwrap();
        assert_eq!(
            device.bytes(indices),
            bytemuck::cast_slice::<_, u8>(shape.indices.as_ref().unwrap().as_slice())
        );
        assert_eq!(device.buffers[indices].usage, BufferUsage::Index);
        assert_eq!(device.buffers[indices].label, "pipeline 0 object 0 indices");
    }

    #[test]
    fn capacity_is_enforced() {
        let (mut device, mut registry, p) = setup(2);
        add(&mut device, &mut registry, p);
        add(&mut device, &mut registry, p);
        let buffers = device.buffers.len();

        let result = registry.add_object(&mut device, p, &primitives::cube(), &ObjectOptions::default());
        assert_eq!(result, Err(Error::Capacity { pipeline: p, max: 2 }));
        assert_eq!(registry.object_count(p), Ok(2));
        assert_eq!(device.buffers.len(), buffers);
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        let (mut device, mut registry, p) = setup(4);
        let options = ObjectOptions::default();

        let mut broken = primitives::triangle();
        broken.uvs.pop();
        let empty = Shape::default();
        let mut no_indices = primitives::plane(1);
        no_indices.indices = Some(Vec::new());

        for shape in [broken, empty, no_indices] {
            let result = registry.add_object(&mut device, p, &shape, &options);
            assert!(matches!(result, Err(Error::InvalidParameter(_))), "{result:?}");
        }

        let zero = ObjectOptions::default().with_instances(0);
        let result = registry.add_object(&mut device, p, &primitives::cube(), &zero);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert_eq!(registry.object_count(p), Ok(0));
    }

    // ── updates ───────────────────────────────────────────────────────────

    #[test]
    fn visibility_update_keeps_model() {
        let (mut device, mut registry, p) = setup(1);
        let o = add(&mut device, &mut registry, p);
        registry
            .update(&UpdateData::new(p, o).with_translate([1.0, 2.0, 3.0]), 1.0)
            .unwrap();
        let before = registry.model_matrix(p, o).unwrap();

        registry
            .update(&UpdateData::new(p, o).with_visible(false), 1.0)
            .unwrap();
        assert_eq!(registry.model_matrix(p, o), Ok(before));
        assert_eq!(registry.is_visible(p, o), Ok(false));
    }

    #[test]
    fn partial_updates_retain_other_fields() {
        let (mut device, mut registry, p) = setup(1);
        let o = add(&mut device, &mut registry, p);

        registry
            .update(&UpdateData::new(p, o).with_scale([2.0, 2.0, 2.0]), 1.0)
            .unwrap();
        registry
            .update(&UpdateData::new(p, o).with_translate([0.0, 1.0, 0.0]), 1.0)
            .unwrap();
        registry
            .update(&UpdateData::new(p, o).with_rotation(vec::Z, 90.0), 1.0)
            .unwrap();

        let expected = mat4::compose([0.0, 1.0, 0.0], vec::Z, 90.0, [2.0, 2.0, 2.0]);
        assert!(mat4::approx_eq(&registry.model_matrix(p, o).unwrap(), &expected, 1e-6));

        let transform = *registry.object(p, o).unwrap().transform();
        assert_eq!(transform.scale, [2.0, 2.0, 2.0]);
        assert_eq!(transform.translate, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn objects_update_independently() {
        let (mut device, mut registry, p) = setup(2);
        let a = add(&mut device, &mut registry, p);
        let b = add(&mut device, &mut registry, p);

        registry
            .update(&UpdateData::new(p, b).with_translate([5.0, 0.0, 0.0]), 1.0)
            .unwrap();
        assert_eq!(registry.model_matrix(p, a), Ok(mat4::IDENTITY));
        assert_eq!(registry.model_matrix(p, b), Ok(mat4::translation([5.0, 0.0, 0.0])));
    }

    #[test]
    fn camera_update_stages_view_projection() {
        let (mut device, mut registry, p) = setup(1);
        let o = add(&mut device, &mut registry, p);
        let camera = Camera::perspective(45.0, 0.5, 50.0).with_position([0.0, 3.0, 6.0]);

        registry
            .update(&UpdateData::new(p, o).with_camera(camera), 1.5)
            .unwrap();
        assert_eq!(registry.view_projection(p), compute_view_projection(&camera, 1.5));
    }

    #[test]
    fn failed_update_changes_nothing() {
        let (mut device, mut registry, p) = setup(1);
        let o = add(&mut device, &mut registry, p);
        let bad_camera = Camera::perspective(60.0, 1.0, 0.5);

        let update = UpdateData::new(p, o)
            .with_translate([9.0, 9.0, 9.0])
            .with_visible(false)
            .with_camera(bad_camera);
        assert!(matches!(registry.update(&update, 1.0), Err(Error::InvalidParameter(_))));

        assert_eq!(registry.model_matrix(p, o), Ok(mat4::IDENTITY));
        assert_eq!(registry.is_visible(p, o), Ok(true));
        assert_eq!(registry.view_projection(p), Ok(mat4::IDENTITY));
        assert_eq!(registry.object(p, o).unwrap().transform(), &ObjectTransform::default());
    }

    #[test]
    fn unknown_object_changes_nothing() {
        let (mut device, mut registry, p) = setup(2);
        let o = add(&mut device, &mut registry, p);
        let missing = ObjectId::from_index(1);

        let result = registry.update(&UpdateData::new(p, missing).with_translate([1.0; 3]), 1.0);
        assert_eq!(result, Err(Error::ObjectNotFound { pipeline: p, object: missing }));
        assert_eq!(registry.model_matrix(p, o), Ok(mat4::IDENTITY));
        assert_eq!(registry.flush(&mut device), 2);
    }

    // ── custom uniforms ───────────────────────────────────────────────────

    #[test]
    fn uniform_payloads_are_staged() {
        let (mut device, mut registry, p) = setup_with(&with_uniforms(), 2);
        add(&mut device, &mut registry, p);
        let o = add(&mut device, &mut registry, p);

        let color = [0.25f32, 0.5, 0.75, 1.0];
        registry
            .update(
                &UpdateData::new(p, o)
                    .with_uniform_data(vec![color.into(), UniformValue::from(3.0f32)]),
                1.0,
            )
            .unwrap();

        assert_eq!(registry.uniform_bytes(p, o, 0), Ok(bytemuck::bytes_of(&color)));
        assert_eq!(registry.uniform_bytes(p, o, 1), Ok(&3.0f32.to_ne_bytes()[..]));
        assert_eq!(
            registry.uniform_bytes(p, ObjectId::from_index(0), 0),
            Ok(&[0u8; 16][..])
        );
    }

    #[test]
    fn object_uniforms_get_their_own_group() {
        let (mut device, mut registry, p) = setup_with(&with_uniforms(), 2);
        let a = add(&mut device, &mut registry, p);
        let b = add(&mut device, &mut registry, p);

        let group_a = registry.object(p, a).unwrap().bind_group.as_ref().unwrap().group;
        let group_b = registry.object(p, b).unwrap().bind_group.as_ref().unwrap().group;
        assert_ne!(group_a, group_b);
        assert_eq!(device.bind_groups[group_a].entries[0].2, 4);
    }

    #[test]
    fn shorter_payload_list_updates_prefix() {
        let (mut device, mut registry, p) = setup_with(&with_uniforms(), 1);
        let o = add(&mut device, &mut registry, p);

        registry
            .update(
                &UpdateData::new(p, o).with_uniform_data(vec![[1.0f32; 4].into(), 2.0f32.into()]),
                1.0,
            )
            .unwrap();
        registry
            .update(&UpdateData::new(p, o).with_uniform_data(vec![[0.5f32; 4].into()]), 1.0)
            .unwrap();

        assert_eq!(registry.uniform_bytes(p, o, 0), Ok(bytemuck::bytes_of(&[0.5f32; 4])));
        assert_eq!(registry.uniform_bytes(p, o, 1), Ok(&2.0f32.to_ne_bytes()[..]));
    }

    #[test]
    fn size_mismatch_changes_nothing() {
        let (mut device, mut registry, p) = setup_with(&with_uniforms(), 1);
        let o = add(&mut device, &mut registry, p);

        let update = UpdateData::new(p, o)
            .with_translate([1.0, 0.0, 0.0])
            .with_uniform_data(vec![[1.0f32; 4].into(), UniformValue::F32(vec![1.0, 2.0])]);
        assert_eq!(
            registry.update(&update, 1.0),
            Err(Error::SizeMismatch { uniform: 1, expected: 4, actual: 8 })
        );
        assert_eq!(registry.model_matrix(p, o), Ok(mat4::IDENTITY));
        assert_eq!(registry.uniform_bytes(p, o, 0), Ok(&[0u8; 16][..]));

        let extra = UpdateData::new(p, o).with_uniform_data(vec![
            [1.0f32; 4].into(),
            1.0f32.into(),
            UniformValue::I32(vec![1]),
        ]);
        assert_eq!(
            registry.update(&extra, 1.0),
            Err(Error::SizeMismatch { uniform: 2, expected: 0, actual: 4 })
        );
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn checker(device: &mut RecordingDevice, registry: &mut Registry<RecordingDevice>) -> TextureId {
        let pixels = [255u8, 255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 255];
        registry
            .create_texture(
                device,
                &TextureDesc { label: "checker", width: 2, height: 2, pixels: &pixels },
            )
            .unwrap()
    }

    #[test]
    fn created_texture_reaches_device() {
        let mut device = RecordingDevice::new();
        let mut registry: Registry<RecordingDevice> = Registry::new();
        let id = checker(&mut device, &mut registry);

        assert_eq!(id, TextureId::from_index(0));
        assert_eq!(registry.texture_count(), 1);
        let texture = &device.textures[0];
        assert_eq!(texture.label, "checker");
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(&texture.pixels[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn malformed_texture_is_rejected() {
        let mut device = RecordingDevice::new();
        let mut registry: Registry<RecordingDevice> = Registry::new();
        let pixels = [0u8; 12];

        for (width, height) in [(2, 2), (0, 3), (3, 0)] {
            let desc = TextureDesc { label: "bad", width, height, pixels: &pixels };
            let result = registry.create_texture(&mut device, &desc);
            assert!(matches!(result, Err(Error::InvalidParameter(_))), "{result:?}");
        }
        assert_eq!(registry.texture_count(), 0);
        assert!(device.textures.is_empty());
    }

    #[test]
    fn textured_pipeline_binds_texture_and_sampler() {
        let mut device = RecordingDevice::new();
        let mut registry = Registry::new();
        let texture = checker(&mut device, &mut registry);
        let options = PipelineOptions::default().with_texture(texture);
        let a = registry.create_pipeline(&mut device, &options, 1).unwrap();
        let b = registry.create_pipeline(&mut device, &options, 1).unwrap();

        for p in [a, b] {
            let pipeline = registry.pipeline(p).unwrap();
            assert_eq!(pipeline.texture(), Some(texture));

            let camera = &device.bind_groups[pipeline.bind_groups[0].as_ref().unwrap().group];
            assert_eq!(camera.texture, Some((TEXTURE_BINDING, 0, SAMPLER_BINDING, 0)));
            assert_eq!(device.layouts[camera.layout].texture, Some(PIPELINE_TEXTURE));
        }
        assert_eq!(device.samplers.len(), 1);
    }

    #[test]
    fn untextured_pipeline_has_no_sampler() {
        let (device, registry, p) = setup(1);
        assert_eq!(registry.pipeline(p).unwrap().texture(), None);
        assert!(device.samplers.is_empty());
        assert!(device.bind_groups.iter().all(|g| g.texture.is_none()));
    }

    #[test]
    fn unknown_texture_fails_before_device_calls() {
        let mut device = RecordingDevice::new();
        let mut registry: Registry<RecordingDevice> = Registry::new();
        let missing = TextureId::from_index(3);
        let options = PipelineOptions::default().with_texture(missing);

        let result = registry.create_pipeline(&mut device, &options, 1);
        assert_eq!(result, Err(Error::TextureNotFound(missing)));
        assert_eq!(registry.pipeline_count(), 0);
        assert!(device.layouts.is_empty());
        assert!(device.pipelines.is_empty());
    }

    #[test]
    fn registered_textures_share_the_id_space() {
        let mut device = RecordingDevice::new();
        let mut registry: Registry<RecordingDevice> = Registry::new();
        let external = registry.register_texture(41);
        let created = checker(&mut device, &mut registry);
        assert_eq!(external, TextureId::from_index(0));
        assert_eq!(created, TextureId::from_index(1));

        let options = PipelineOptions::default().with_texture(external);
        let p = registry.create_pipeline(&mut device, &options, 1).unwrap();
        let group = registry.pipeline(p).unwrap().bind_groups[0].as_ref().unwrap().group;
        assert_eq!(device.bind_groups[group].texture.map(|t| t.1), Some(41));
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn flush_batches_per_buffer() {
        let (mut device, mut registry, p) = setup(4);
        let ids: Vec<_> = (0..4).map(|_| add(&mut device, &mut registry, p)).collect();
        registry.flush(&mut device);
        device.writes.clear();

        for &o in &ids {
            registry
                .update(&UpdateData::new(p, o).with_scale([3.0; 3]), 1.0)
                .unwrap();
        }
        assert!(device.writes.is_empty());

        assert_eq!(registry.flush(&mut device), 1);
        let arena = *registry.pipelines()[0].bind_groups[1].as_ref().unwrap().entries[0].buffer();
        assert_eq!(device.writes, vec![(arena, 0, 3 * 256 + 64)]);
        assert_eq!(registry.flush(&mut device), 0);
    }
}
