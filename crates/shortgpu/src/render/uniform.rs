//! Custom uniform declarations and payloads.
//!
//! A pipeline declares its extra uniforms up front. Dynamic uniforms share one
//! arena buffer per binding in group 1, addressed per object through the same
//! dynamic offset as the model matrix. Non-dynamic uniforms get a dedicated
//! buffer per object, bound through the object's own group 2.

use crate::device::{ShaderStage, UniformBinding};
use crate::error::{Error, Result};

/// Distance between two objects' slots in a dynamic arena.
///
/// Matches the minimum uniform offset alignment every backend guarantees.
pub const DYNAMIC_STRIDE: u64 = 256;

/// Largest payload a dynamic uniform may declare.
pub const DYNAMIC_UNIFORM_LIMIT: u64 = DYNAMIC_STRIDE;

/// Bind group holding the camera view-projection, shared by every object.
pub const GROUP_SHARED: u32 = 0;
/// Bind group holding the model matrix and dynamic custom uniforms.
pub const GROUP_DYNAMIC: u32 = 1;
/// Bind group owned by each object for its non-dynamic custom uniforms.
pub const GROUP_OBJECT: u32 = 2;
/// Group indices a pipeline may use; 3 is reserved.
pub const MAX_BIND_GROUPS: usize = 4;

/// Binding of the model matrix inside [`GROUP_DYNAMIC`].
pub const MODEL_BINDING: u32 = 0;
/// Binding of the view-projection matrix inside [`GROUP_SHARED`].
pub const CAMERA_BINDING: u32 = 0;

pub(crate) const MAT4_SIZE: u64 = 64;

/// Group 0 binding of a pipeline's texture (`texture_2d<f32>`), when it has one.
pub const TEXTURE_BINDING: u32 = 1;
/// Group 0 binding of the sampler paired with [`TEXTURE_BINDING`].
pub const SAMPLER_BINDING: u32 = 2;

/// Shape of a custom uniform's payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformType {
    I32,
    F32,
    Vec2f,
    Vec3f,
    Vec4f,
    /// Opaque bytes; the size must be declared explicitly.
    Struct,
}

impl UniformType {
    /// Implied payload size, `None` for [`UniformType::Struct`].
    pub const fn size_in_bytes(self) -> Option<u64> {
        match self {
            UniformType::I32 | UniformType::F32 => Some(4),
            UniformType::Vec2f => Some(8),
            UniformType::Vec3f => Some(12),
            UniformType::Vec4f => Some(16),
            UniformType::Struct => None,
        }
    }
}

/// Declaration of one custom uniform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformDescription {
    /// Binding index inside group 1 (dynamic) or group 2 (non-dynamic).
    pub bind_slot: u32,
    pub visibility: ShaderStage,
    pub ty: UniformType,
    pub dynamic: bool,
    /// Required for [`UniformType::Struct`]; must agree with the implied size
    /// for every other type.
    pub size_in_bytes: Option<u64>,
}

impl UniformDescription {
    /// A dynamic uniform visible to both stages.
    pub fn new(bind_slot: u32, ty: UniformType) -> Self {
        Self {
            bind_slot,
            visibility: ShaderStage::Both,
            ty,
            dynamic: true,
            size_in_bytes: None,
        }
    }

    /// A [`UniformType::Struct`] of `size` bytes.
    pub fn bytes(bind_slot: u32, size: u64) -> Self {
        Self::new(bind_slot, UniformType::Struct).with_size(size)
    }

    pub fn with_visibility(mut self, visibility: ShaderStage) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size_in_bytes = Some(size);
        self
    }

    /// Resolves the payload size this uniform accepts.
    pub fn byte_size(&self) -> Result<u64> {
        let size = match (self.ty.size_in_bytes(), self.size_in_bytes) {
            (None, None) => {
                return Err(Error::config(format!(
                    "uniform at slot {} is a struct without a size",
                    self.bind_slot
                )));
            }
            (Some(implied), Some(declared)) if implied != declared => {
                return Err(Error::config(format!(
                    "uniform at slot {} declares {declared} bytes, {:?} is {implied}",
                    self.bind_slot, self.ty
                )));
            }
            (Some(size), _) | (None, Some(size)) => size,
        };

        if size == 0 || size % 4 != 0 {
            return Err(Error::config(format!(
                "uniform at slot {} has size {size}, expected a non-zero multiple of 4",
                self.bind_slot
            )));
        }
        if self.dynamic && size > DYNAMIC_UNIFORM_LIMIT {
            return Err(Error::config(format!(
                "dynamic uniform at slot {} is {size} bytes, limit is {DYNAMIC_UNIFORM_LIMIT}",
                self.bind_slot
            )));
        }
        Ok(size)
    }
}

/// Payload for one custom uniform in an update.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    F32(Vec<f32>),
    I32(Vec<i32>),
    Bytes(Vec<u8>),
}

impl UniformValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            UniformValue::F32(v) => bytemuck::cast_slice(v.as_slice()),
            UniformValue::I32(v) => bytemuck::cast_slice(v.as_slice()),
            UniformValue::Bytes(v) => v,
        }
    }

    pub fn byte_len(&self) -> u64 {
        self.as_bytes().len() as u64
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::F32(vec![v])
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::I32(vec![v])
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(v: [f32; N]) -> Self {
        UniformValue::F32(v.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(v: [i32; N]) -> Self {
        UniformValue::I32(v.to_vec())
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::F32(v)
    }
}

impl From<Vec<u8>> for UniformValue {
    fn from(v: Vec<u8>) -> Self {
        UniformValue::Bytes(v)
    }
}

/// Where a declared uniform's bytes live.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Placement {
    /// Index into the group-1 arena entries (entry 0 is the model matrix).
    Dynamic(usize),
    /// Index into the object's group-2 entries.
    Object(usize),
}

/// Validated uniform declarations of one pipeline.
#[derive(Debug, Clone, Default)]
pub(crate) struct UniformLayout {
    /// Resolved size per declaration, in declaration order.
    pub sizes: Vec<u64>,
    pub placements: Vec<Placement>,
    /// Group-1 bindings sorted by binding index, model matrix first.
    pub dynamic_bindings: Vec<UniformBinding>,
    /// Group-2 bindings sorted by binding index; empty when every uniform is dynamic.
    pub object_bindings: Vec<UniformBinding>,
}

impl UniformLayout {
    pub fn new(descriptions: &[UniformDescription]) -> Result<Self> {
        let sizes = descriptions
            .iter()
            .map(UniformDescription::byte_size)
            .collect::<Result<Vec<_>>>()?;

        let mut dynamic_bindings = vec![UniformBinding {
            binding: MODEL_BINDING,
            visibility: ShaderStage::Vertex,
            dynamic: true,
            size: MAT4_SIZE,
        }];
        let mut object_bindings = Vec::new();

        for (desc, &size) in descriptions.iter().zip(&sizes) {
            let target = if desc.dynamic {
                &mut dynamic_bindings
            } else {
                &mut object_bindings
            };
            if target.iter().any(|b| b.binding == desc.bind_slot) {
                let group = if desc.dynamic { GROUP_DYNAMIC } else { GROUP_OBJECT };
                return Err(Error::config(format!(
                    "binding {} of group {group} is declared twice",
                    desc.bind_slot
                )));
            }
            target.push(UniformBinding {
                binding: desc.bind_slot,
                visibility: desc.visibility,
                dynamic: desc.dynamic,
                size,
            });
        }

        dynamic_bindings.sort_by_key(|b| b.binding);
        object_bindings.sort_by_key(|b| b.binding);

        let placements = descriptions
            .iter()
            .map(|desc| {
                let find = |bindings: &[UniformBinding]| {
                    bindings
                        .iter()
                        .position(|b| b.binding == desc.bind_slot)
                        .unwrap_or_default()
                };
                if desc.dynamic {
                    Placement::Dynamic(find(&dynamic_bindings))
                } else {
                    Placement::Object(find(&object_bindings))
                }
            })
            .collect();

        Ok(Self {
            sizes,
            placements,
            dynamic_bindings,
            object_bindings,
        })
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn has_object_group(&self) -> bool {
        !self.object_bindings.is_empty()
    }

    /// Checks an update's payloads against the declarations without staging anything.
    pub fn check_payloads(&self, payloads: &[UniformValue]) -> Result<()> {
        if let Some(extra) = payloads.get(self.len()) {
            return Err(Error::SizeMismatch {
                uniform: self.len(),
                expected: 0,
                actual: extra.byte_len(),
            });
        }
        for (index, (payload, &expected)) in payloads.iter().zip(&self.sizes).enumerate() {
            let actual = payload.byte_len();
            if actual != expected {
                return Err(Error::SizeMismatch {
                    uniform: index,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
