/// Handle to a pipeline owned by a [`Registry`](super::Registry).
///
/// Ids are assigned sequentially in creation order and never reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PipelineId(pub(crate) usize);

impl PipelineId {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to an object within its pipeline.
///
/// Object ids are only meaningful together with the [`PipelineId`] they were
/// returned for; they stay valid for the lifetime of that pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to a texture registered with a [`Registry`](super::Registry).
///
/// Pipelines reference it through
/// [`PipelineOptions::texture`](super::PipelineOptions::texture).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub(crate) usize);

impl TextureId {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}
