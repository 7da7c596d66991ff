use std::ops::Range;

use wgpu::util::DeviceExt;

use super::graphics::{
    check_entry_points, BindGroupDesc, BindGroupLayoutDesc, BufferDesc, BufferUsage, CullMode,
    DrawPass, GraphicsDevice, PipelineDesc, ShaderStage, TextureDesc,
};
use super::Gpu;
use crate::error::{Error, Result};

/// [`GraphicsDevice`] backed by wgpu.
///
/// Holds clones of the device/queue handles, so it can outlive the borrow of
/// the [`Gpu`] it was created from. Pipelines target `color_format` and, when
/// set, test/write depth in `depth_format`.
#[derive(Debug, Clone)]
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

impl WgpuDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, color_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            queue,
            color_format,
            depth_format: None,
        }
    }

    pub fn with_depth(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Targets the surface (and depth buffer, if any) of `gpu`.
    pub fn from_gpu(gpu: &Gpu<'_>) -> Self {
        let device = Self::new(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format());
        match gpu.depth_format() {
            Some(format) => device.with_depth(format),
            None => device,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Runs `f` inside a validation error scope and turns anything wgpu reports
/// into [`Error::Device`] instead of letting it reach the uncaptured-error
/// handler.
fn with_validation_scope<T>(
    device: &wgpu::Device,
    label: &str,
    f: impl FnOnce() -> T,
) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let out = f();
    match pollster::block_on(scope.pop()) {
        None => Ok(out),
        Some(err) => {
            log::error!("wgpu validation failed in {label}: {err}");
            Err(Error::Device(format!("{label}: {err}")))
        }
    }
}

// ── vertex layouts ────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    let layout = |stride: usize, attributes: &'static [wgpu::VertexAttribute]| {
        wgpu::VertexBufferLayout {
            array_stride: (stride * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    };
    [
        layout(3, &POSITION_ATTRS),
        layout(2, &UV_ATTRS),
        layout(3, &NORMAL_ATTRS),
    ]
}

// ── enum mapping ──────────────────────────────────────────────────────────

fn shader_stages(stage: ShaderStage) -> wgpu::ShaderStages {
    match stage {
        ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
        ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        ShaderStage::Both => wgpu::ShaderStages::VERTEX_FRAGMENT,
    }
}

fn cull_face(mode: CullMode) -> Option<wgpu::Face> {
    match mode {
        CullMode::Back => Some(wgpu::Face::Back),
        CullMode::Front => Some(wgpu::Face::Front),
        CullMode::None => None,
    }
}

fn buffer_usages(usage: BufferUsage) -> wgpu::BufferUsages {
    match usage {
        BufferUsage::Vertex => wgpu::BufferUsages::VERTEX,
        BufferUsage::Index => wgpu::BufferUsages::INDEX,
        BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    }
}

impl GraphicsDevice for WgpuDevice {
    type Buffer = wgpu::Buffer;
    type Texture = wgpu::TextureView;
    type Sampler = wgpu::Sampler;
    type BindGroupLayout = wgpu::BindGroupLayout;
    type BindGroup = wgpu::BindGroup;
    type Pipeline = wgpu::RenderPipeline;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(desc.label),
            contents: desc.contents,
            usage: buffer_usages(desc.usage),
        })
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(buffer, offset, data);
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> wgpu::TextureView {
        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some(desc.label),
                size: wgpu::Extent3d {
                    width: desc.width,
                    height: desc.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            desc.pixels,
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_sampler(&mut self, label: &str) -> wgpu::Sampler {
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        })
    }

    fn create_bind_group_layout(&mut self, desc: &BindGroupLayoutDesc<'_>) -> wgpu::BindGroupLayout {
        let mut entries: Vec<wgpu::BindGroupLayoutEntry> = desc
            .entries
            .iter()
            .map(|e| wgpu::BindGroupLayoutEntry {
                binding: e.binding,
                visibility: shader_stages(e.visibility),
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: e.dynamic,
                    min_binding_size: wgpu::BufferSize::new(e.size),
                },
                count: None,
            })
            .collect();

        if let Some(t) = desc.texture {
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: t.texture,
                visibility: shader_stages(t.visibility),
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: t.sampler,
                visibility: shader_stages(t.visibility),
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }

        self.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(desc.label),
                entries: &entries,
            })
    }

    fn create_bind_group(
        &mut self,
        desc: &BindGroupDesc<
            '_,
            wgpu::BindGroupLayout,
            wgpu::Buffer,
            wgpu::TextureView,
            wgpu::Sampler,
        >,
    ) -> wgpu::BindGroup {
        let mut entries: Vec<wgpu::BindGroupEntry> = desc
            .entries
            .iter()
            .map(|e| wgpu::BindGroupEntry {
                binding: e.binding,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: e.buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(e.size),
                }),
            })
            .collect();

        if let Some(t) = &desc.texture {
            entries.push(wgpu::BindGroupEntry {
                binding: t.binding.texture,
                resource: wgpu::BindingResource::TextureView(t.texture),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: t.binding.sampler,
                resource: wgpu::BindingResource::Sampler(t.sampler),
            });
        }

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(desc.label),
            layout: desc.layout,
            entries: &entries,
        })
    }

    fn create_pipeline(
        &mut self,
        desc: &PipelineDesc<'_, wgpu::BindGroupLayout>,
    ) -> Result<wgpu::RenderPipeline> {
        check_entry_points(desc)?;

        let device = &self.device;
        let color_format = self.color_format;
        let depth_format = self.depth_format;
        with_validation_scope(device, desc.label, || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source: wgpu::ShaderSource::Wgsl(desc.shader_source.into()),
            });

            let layout = device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(desc.label),
                    bind_group_layouts: desc.bind_group_layouts,
                    immediate_size: 0,
                });

            let buffers = vertex_layouts();

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(desc.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(desc.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: cull_face(desc.cull_mode),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            })
        })
    }
}

impl DrawPass<WgpuDevice> for wgpu::RenderPass<'_> {
    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        wgpu::RenderPass::set_pipeline(self, pipeline);
    }

    fn set_bind_group(&mut self, index: u32, group: &wgpu::BindGroup, offsets: &[u32]) {
        wgpu::RenderPass::set_bind_group(self, index, group, offsets);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_vertex_buffer(self, slot, buffer.slice(..));
    }

    fn set_index_buffer(&mut self, buffer: &wgpu::Buffer) {
        wgpu::RenderPass::set_index_buffer(self, buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw(self, vertices, instances);
    }

    fn draw_indexed(&mut self, indices: Range<u32>, instances: Range<u32>) {
        wgpu::RenderPass::draw_indexed(self, indices, 0, instances);
    }
}
