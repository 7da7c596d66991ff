//! Pipelines, objects and per-frame drawing.
//!
//! - [`Registry`]: owns pipelines, their objects and every device handle;
//!   applies [`UpdateData`] to CPU-side staged uniforms
//! - [`Renderer`]: the public entry point; flushes staged data and records
//!   draws into a [`DrawPass`](crate::device::DrawPass)
//!
//! Shader binding contract:
//!
//! | group | binding | contents                                  |
//! |-------|---------|-------------------------------------------|
//! | 0     | 0       | `view_projection: mat4x4<f32>`, shared    |
//! | 0     | 1, 2    | texture and sampler, textured pipelines   |
//! | 1     | 0       | `model: mat4x4<f32>`, dynamic offset      |
//! | 1     | n ≥ 1   | dynamic custom uniforms, dynamic offset   |
//! | 2     | n       | non-dynamic custom uniforms, per object   |
//!
//! Dynamic offsets advance by [`DYNAMIC_STRIDE`] per object.

mod bind_group;
mod ids;
mod object;
mod options;
mod pipeline;
mod registry;
mod renderer;
mod staging;
mod uniform;

pub use ids::{ObjectId, PipelineId, TextureId};
pub use object::{ObjectTransform, RenderObject};
pub use options::{ObjectOptions, PipelineOptions, UpdateData, DEFAULT_SHADER, TEXTURED_SHADER};
pub use pipeline::RenderPipeline;
pub use registry::Registry;
pub use renderer::{FrameStats, Renderer};
pub use uniform::{
    UniformDescription, UniformType, UniformValue, DYNAMIC_STRIDE, DYNAMIC_UNIFORM_LIMIT,
    GROUP_DYNAMIC, GROUP_OBJECT, GROUP_SHARED, MAX_BIND_GROUPS, SAMPLER_BINDING, TEXTURE_BINDING,
};
