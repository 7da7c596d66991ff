//! Device capability consumed by the registry and renderer.
//!
//! The registry never talks to a concrete GPU API. It asks a [`GraphicsDevice`]
//! for buffers, textures, layouts, bind groups and pipelines described
//! declaratively, and records draws into a [`DrawPass`]. Handles returned by
//! the device are owned by the registry for as long as their pipeline lives.

use std::ops::Range;

use crate::error::{Error, Result};

/// Shader stages a uniform is visible to.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    #[default]
    Both,
}

/// Which triangle faces the rasterizer discards.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferUsage {
    Vertex,
    Index,
    Uniform,
}

/// A buffer created with its initial contents. Uniform buffers also accept
/// later writes; vertex and index buffers are immutable.
#[derive(Debug, Copy, Clone)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub usage: BufferUsage,
    pub contents: &'a [u8],
}

/// A 2D sRGB texture uploaded from tightly packed RGBA8 rows.
#[derive(Debug, Copy, Clone)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, top row first.
    pub pixels: &'a [u8],
}

impl TextureDesc<'_> {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Byte length `pixels` must have, `None` on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(Self::BYTES_PER_PIXEL)
    }
}

/// One uniform-buffer binding inside a bind-group layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformBinding {
    pub binding: u32,
    pub visibility: ShaderStage,
    /// Bound with a per-draw dynamic offset.
    pub dynamic: bool,
    /// Bytes visible through the binding (the window, not the whole buffer).
    pub size: u64,
}

/// A filterable 2D texture and the sampler that reads it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureBinding {
    pub texture: u32,
    pub sampler: u32,
    pub visibility: ShaderStage,
}

#[derive(Debug, Copy, Clone)]
pub struct BindGroupLayoutDesc<'a> {
    pub label: &'a str,
    pub entries: &'a [UniformBinding],
    pub texture: Option<TextureBinding>,
}

/// Buffer attached to a binding; `size` is the window starting at offset 0.
pub struct BindGroupEntry<'a, B> {
    pub binding: u32,
    pub buffer: &'a B,
    pub size: u64,
}

pub struct BindGroupTexture<'a, T, S> {
    pub binding: TextureBinding,
    pub texture: &'a T,
    pub sampler: &'a S,
}

pub struct BindGroupDesc<'a, L, B, T, S> {
    pub label: &'a str,
    pub layout: &'a L,
    pub entries: &'a [BindGroupEntry<'a, B>],
    pub texture: Option<BindGroupTexture<'a, T, S>>,
}

/// Render pipeline over the fixed vertex layout:
/// location 0 position (f32x3), 1 uv (f32x2), 2 normal (f32x3), each from its
/// own vertex buffer slot, triangle list, counter-clockwise front faces.
pub struct PipelineDesc<'a, L> {
    pub label: &'a str,
    /// WGSL source.
    pub shader_source: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub cull_mode: CullMode,
    /// Layouts in group order (group 0 first).
    pub bind_group_layouts: &'a [&'a L],
}

/// Buffer/texture/bind-group/pipeline factory.
pub trait GraphicsDevice {
    type Buffer;
    type Texture;
    type Sampler;
    type BindGroupLayout;
    type BindGroup;
    type Pipeline;

    fn create_buffer(&mut self, desc: &BufferDesc<'_>) -> Self::Buffer;

    /// Queues a write; the data reaches the GPU before the next submission.
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    /// `desc.pixels` is already checked against [`TextureDesc::expected_len`].
    fn create_texture(&mut self, desc: &TextureDesc<'_>) -> Self::Texture;

    /// Linear filtering, repeat addressing.
    fn create_sampler(&mut self, label: &str) -> Self::Sampler;

    fn create_bind_group_layout(&mut self, desc: &BindGroupLayoutDesc<'_>) -> Self::BindGroupLayout;

    fn create_bind_group(
        &mut self,
        desc: &BindGroupDesc<'_, Self::BindGroupLayout, Self::Buffer, Self::Texture, Self::Sampler>,
    ) -> Self::BindGroup;

    /// Compiles the shader and links the pipeline. Compilation and validation
    /// failures come back as [`Error::Device`].
    fn create_pipeline(
        &mut self,
        desc: &PipelineDesc<'_, Self::BindGroupLayout>,
    ) -> Result<Self::Pipeline>;
}

/// Command recording for one render pass.
pub trait DrawPass<D: GraphicsDevice + ?Sized> {
    fn set_pipeline(&mut self, pipeline: &D::Pipeline);
    fn set_bind_group(&mut self, index: u32, group: &D::BindGroup, offsets: &[u32]);
    fn set_vertex_buffer(&mut self, slot: u32, buffer: &D::Buffer);
    /// Index format is always `u32`.
    fn set_index_buffer(&mut self, buffer: &D::Buffer);
    fn draw(&mut self, vertices: Range<u32>, instances: Range<u32>);
    fn draw_indexed(&mut self, indices: Range<u32>, instances: Range<u32>);
}

/// Rejects shader sources that do not declare the requested entry points as
/// functions (`fn <name>(`).
///
/// This is a lexical check only; full compilation stays with the backend.
pub fn check_entry_points<L>(desc: &PipelineDesc<'_, L>) -> Result<()> {
    if desc.shader_source.trim().is_empty() {
        return Err(Error::Device(format!("{}: shader source is empty", desc.label)));
    }
    for entry in [desc.vertex_entry, desc.fragment_entry] {
        if !declares_function(desc.shader_source, entry) {
            return Err(Error::Device(format!(
                "{}: shader has no entry point `{entry}`",
                desc.label
            )));
        }
    }
    Ok(())
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn declares_function(source: &str, name: &str) -> bool {
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return false;
    }
    source.match_indices("fn").any(|(at, _)| {
        let before = source[..at].chars().next_back();
        if before.is_some_and(is_ident_char) {
            return false;
        }
        let rest = &source[at + 2..];
        let trimmed = rest.trim_start();
        if trimmed.len() == rest.len() {
            return false;
        }
        trimmed
            .strip_prefix(name)
            .is_some_and(|tail| tail.trim_start().starts_with('('))
    })
}
