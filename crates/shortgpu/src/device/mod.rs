//! GPU device boundary.
//!
//! - [`GraphicsDevice`] / [`DrawPass`]: the capability the registry consumes
//! - [`WgpuDevice`]: that capability over wgpu
//! - [`Gpu`]: device and queue presenting to a window surface, with an
//!   optional depth target; acquires and submits frames

mod context;
mod frame;
mod graphics;
mod init;
mod surface;
mod wgpu_device;

#[cfg(test)]
pub(crate) mod recording;

pub use context::Gpu;
pub use frame::{GpuFrame, SurfaceErrorAction};
pub use graphics::{
    check_entry_points, BindGroupDesc, BindGroupEntry, BindGroupLayoutDesc, BindGroupTexture,
    BufferDesc, BufferUsage, CullMode, DrawPass, GraphicsDevice, PipelineDesc, ShaderStage,
    TextureBinding, TextureDesc, UniformBinding,
};
pub use init::GpuInit;
pub use wgpu_device::WgpuDevice;
