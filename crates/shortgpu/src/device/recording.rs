//! In-memory [`GraphicsDevice`] and [`DrawPass`] for tests.
//!
//! Buffers are byte vectors addressed by index; every device call and draw
//! command is recorded so tests can assert on exactly what reached the GPU.

use std::ops::Range;

use super::graphics::{
    check_entry_points, BindGroupDesc, BindGroupLayoutDesc, BufferDesc, BufferUsage, DrawPass,
    GraphicsDevice, PipelineDesc, TextureBinding, TextureDesc, UniformBinding,
};
use crate::error::Result;

#[derive(Debug, Clone)]
pub(crate) struct RecordedBuffer {
    pub label: String,
    pub usage: BufferUsage,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedTexture {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedLayout {
    pub entries: Vec<UniformBinding>,
    pub texture: Option<TextureBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedBindGroup {
    pub layout: usize,
    /// `(binding, buffer, size)`.
    pub entries: Vec<(u32, usize, u64)>,
    /// `(texture binding, texture, sampler binding, sampler)`.
    pub texture: Option<(u32, usize, u32, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedPipeline {
    pub label: String,
    pub layouts: Vec<usize>,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingDevice {
    pub buffers: Vec<RecordedBuffer>,
    /// `(buffer, offset, len)` for every `write_buffer` call.
    pub writes: Vec<(usize, u64, usize)>,
    pub textures: Vec<RecordedTexture>,
    pub samplers: Vec<String>,
    pub layouts: Vec<RecordedLayout>,
    pub bind_groups: Vec<RecordedBindGroup>,
    pub pipelines: Vec<RecordedPipeline>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self, buffer: usize) -> &[u8] {
        &self.buffers[buffer].bytes
    }

    pub fn buffers_with_usage(&self, usage: BufferUsage) -> usize {
        self.buffers.iter().filter(|b| b.usage == usage).count()
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = usize;
    type Texture = usize;
    type Sampler = usize;
    type BindGroupLayout = usize;
    type BindGroup = usize;
    type Pipeline = usize;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> usize {
        self.buffers.push(RecordedBuffer {
            label: desc.label.to_string(),
            usage: desc.usage,
            bytes: desc.contents.to_vec(),
        });
        self.buffers.len() - 1
    }

    fn write_buffer(&mut self, buffer: &usize, offset: u64, data: &[u8]) {
        let start = offset as usize;
        let bytes = &mut self.buffers[*buffer].bytes;
        assert!(start + data.len() <= bytes.len(), "write past end of buffer {buffer}");
        bytes[start..start + data.len()].copy_from_slice(data);
        self.writes.push((*buffer, offset, data.len()));
    }

    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> usize {
        self.textures.push(RecordedTexture {
            label: desc.label.to_string(),
            width: desc.width,
            height: desc.height,
            pixels: desc.pixels.to_vec(),
        });
        self.textures.len() - 1
    }

    fn create_sampler(&mut self, label: &str) -> usize {
        self.samplers.push(label.to_string());
        self.samplers.len() - 1
    }

    fn create_bind_group_layout(&mut self, desc: &BindGroupLayoutDesc<'_>) -> usize {
        self.layouts.push(RecordedLayout {
            entries: desc.entries.to_vec(),
            texture: desc.texture,
        });
        self.layouts.len() - 1
    }

    fn create_bind_group(&mut self, desc: &BindGroupDesc<'_, usize, usize, usize, usize>) -> usize {
        self.bind_groups.push(RecordedBindGroup {
            layout: *desc.layout,
            entries: desc.entries.iter().map(|e| (e.binding, *e.buffer, e.size)).collect(),
            texture: desc.texture.as_ref().map(|t| {
                (t.binding.texture, *t.texture, t.binding.sampler, *t.sampler)
            }),
        });
        self.bind_groups.len() - 1
    }

    fn create_pipeline(&mut self, desc: &PipelineDesc<'_, usize>) -> Result<usize> {
        check_entry_points(desc)?;
        self.pipelines.push(RecordedPipeline {
            label: desc.label.to_string(),
            layouts: desc.bind_group_layouts.iter().map(|l| **l).collect(),
        });
        Ok(self.pipelines.len() - 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    SetPipeline(usize),
    SetBindGroup { index: u32, group: usize, offsets: Vec<u32> },
    SetVertexBuffer { slot: u32, buffer: usize },
    SetIndexBuffer(usize),
    Draw { vertices: Range<u32>, instances: Range<u32> },
    DrawIndexed { indices: Range<u32>, instances: Range<u32> },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPass {
    pub commands: Vec<Command>,
}

impl RecordingPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. } | Command::DrawIndexed { .. }))
            .collect()
    }
}

impl DrawPass<RecordingDevice> for RecordingPass {
    fn set_pipeline(&mut self, pipeline: &usize) {
        self.commands.push(Command::SetPipeline(*pipeline));
    }

    fn set_bind_group(&mut self, index: u32, group: &usize, offsets: &[u32]) {
        self.commands.push(Command::SetBindGroup {
            index,
            group: *group,
            offsets: offsets.to_vec(),
        });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &usize) {
        self.commands.push(Command::SetVertexBuffer { slot, buffer: *buffer });
    }

    fn set_index_buffer(&mut self, buffer: &usize) {
        self.commands.push(Command::SetIndexBuffer(*buffer));
    }

    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>) {
        self.commands.push(Command::Draw { vertices, instances });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, instances: Range<u32>) {
        self.commands.push(Command::DrawIndexed { indices, instances });
    }
}
