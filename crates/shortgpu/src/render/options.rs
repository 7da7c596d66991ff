use std::borrow::Cow;

use super::uniform::{UniformDescription, UniformValue};
use super::{ObjectId, PipelineId, TextureId};
use crate::camera::Camera;
use crate::device::CullMode;
use crate::math::Vec3;

/// WGSL used when [`PipelineOptions::shader`] is left at its default.
///
/// Transforms by the shared view-projection and the per-object model matrix and
/// shades with a fixed directional light.
pub const DEFAULT_SHADER: &str = include_str!("shaders/default.wgsl");

/// Like [`DEFAULT_SHADER`], but takes the base colour from the pipeline's
/// texture. Pair it with [`PipelineOptions::with_texture`].
pub const TEXTURED_SHADER: &str = include_str!("shaders/textured.wgsl");

/// Options for [`Registry::create_pipeline`](super::Registry::create_pipeline).
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Debug label; defaults to `pipeline <id>`.
    pub label: Option<String>,
    /// WGSL source.
    pub shader: Cow<'static, str>,
    pub vertex_function: String,
    pub fragment_function: String,
    pub cull_mode: CullMode,
    /// Custom uniforms, addressed by position in update payloads.
    pub uniforms: Vec<UniformDescription>,
    /// Texture bound in group 0 at [`TEXTURE_BINDING`](super::TEXTURE_BINDING),
    /// with a linear sampler at [`SAMPLER_BINDING`](super::SAMPLER_BINDING).
    pub texture: Option<TextureId>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            label: None,
            shader: Cow::Borrowed(DEFAULT_SHADER),
            vertex_function: "vs_main".to_string(),
            fragment_function: "fs_main".to_string(),
            cull_mode: CullMode::Back,
            uniforms: Vec::new(),
            texture: None,
        }
    }
}

impl PipelineOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_shader(mut self, source: impl Into<Cow<'static, str>>) -> Self {
        self.shader = source.into();
        self
    }

    pub fn with_entry_points(
        mut self,
        vertex: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        self.vertex_function = vertex.into();
        self.fragment_function = fragment.into();
        self
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    pub fn with_uniform(mut self, uniform: UniformDescription) -> Self {
        self.uniforms.push(uniform);
        self
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Options for [`Registry::add_object`](super::Registry::add_object).
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectOptions {
    /// Instance count per draw, at least 1.
    pub instances: u32,
    pub visible: bool,
    pub label: Option<String>,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self {
            instances: 1,
            visible: true,
            label: None,
        }
    }
}

impl ObjectOptions {
    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = instances;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A partial update of one object.
///
/// Absent fields keep their retained value. `camera` replaces the whole
/// pipeline's view-projection, not just this object's.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateData {
    pub pipeline_id: PipelineId,
    pub object_id: ObjectId,
    pub translate: Option<Vec3>,
    pub rotate_axis: Option<Vec3>,
    /// Degrees.
    pub rotate_deg: Option<f32>,
    pub scale: Option<Vec3>,
    pub visible: Option<bool>,
    pub camera: Option<Camera>,
    /// Payloads for the pipeline's custom uniforms, in declaration order. A
    /// shorter list updates only that prefix.
    pub uniform_data: Option<Vec<UniformValue>>,
}

impl UpdateData {
    pub fn new(pipeline_id: PipelineId, object_id: ObjectId) -> Self {
        Self {
            pipeline_id,
            object_id,
            translate: None,
            rotate_axis: None,
            rotate_deg: None,
            scale: None,
            visible: None,
            camera: None,
            uniform_data: None,
        }
    }

    pub fn with_translate(mut self, translate: Vec3) -> Self {
        self.translate = Some(translate);
        self
    }

    /// Sets axis and angle together.
    pub fn with_rotation(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotate_axis = Some(axis);
        self.rotate_deg = Some(degrees);
        self
    }

    pub fn with_rotate_axis(mut self, axis: Vec3) -> Self {
        self.rotate_axis = Some(axis);
        self
    }

    pub fn with_rotate_deg(mut self, degrees: f32) -> Self {
        self.rotate_deg = Some(degrees);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_uniform_data(mut self, data: Vec<UniformValue>) -> Self {
        self.uniform_data = Some(data);
        self
    }

    /// True when any of translate/rotation/scale is present.
    pub fn touches_transform(&self) -> bool {
        self.translate.is_some()
            || self.rotate_axis.is_some()
            || self.rotate_deg.is_some()
            || self.scale.is_some()
    }
}
