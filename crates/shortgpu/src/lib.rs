//! shortgpu: pipelines, objects, cameras and primitive shapes over wgpu.
//!
//! Callers describe what to draw; the crate owns every GPU buffer, bind group
//! and pipeline behind plain integer ids.
//!
//! - [`Renderer`] / [`Registry`]: create pipelines, add objects, apply
//!   [`UpdateData`], record a frame
//! - [`primitives`]: triangle, plane, cube and sphere generators
//! - [`camera`] and [`math`]: view-projection and column-major matrices
//! - [`device`]: the [`GraphicsDevice`] seam and its wgpu implementation
//! - [`window`] / [`core`] / [`time`] / [`logging`]: a winit runtime for
//!   binaries that just want a window to draw into

pub mod camera;
pub mod core;
pub mod device;
pub mod error;
pub mod logging;
pub mod math;
pub mod primitives;
pub mod render;
pub mod time;
pub mod window;

pub use camera::{compute_view_projection, Camera, CameraTransform, Projection};
pub use device::{CullMode, DrawPass, GraphicsDevice, ShaderStage, TextureDesc, WgpuDevice};
pub use error::{Error, Result};
pub use primitives::Shape;
pub use render::{
    FrameStats, ObjectId, ObjectOptions, PipelineId, PipelineOptions, Registry, Renderer,
    TextureId, UniformDescription, UniformType, UniformValue, UpdateData,
};
