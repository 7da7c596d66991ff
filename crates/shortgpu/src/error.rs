use std::fmt;

use crate::render::{ObjectId, PipelineId, TextureId};

/// Errors surfaced by the registry, renderer and math helpers.
///
/// Every error is reported synchronously to the caller of the failing
/// operation. A failed operation leaves previously registered state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed pipeline or uniform options at creation time.
    Configuration(String),

    /// The pipeline already holds `max` objects.
    Capacity { pipeline: PipelineId, max: usize },

    /// No pipeline is registered under this id.
    PipelineNotFound(PipelineId),

    /// The pipeline exists but has no object under this id.
    ObjectNotFound { pipeline: PipelineId, object: ObjectId },

    /// No texture is registered under this id.
    TextureNotFound(TextureId),

    /// A custom uniform payload does not match its declared size.
    ///
    /// `uniform` is the index of the declaration in `PipelineOptions::uniforms`.
    SizeMismatch { uniform: usize, expected: u64, actual: u64 },

    /// Degenerate numeric input (projection parameters, malformed shapes).
    InvalidParameter(String),

    /// The graphics device rejected a request.
    Device(String),
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Error::Capacity { pipeline, max } => {
                write!(f, "pipeline {} is full ({max} objects)", pipeline.index())
            }
            Error::PipelineNotFound(pipeline) => {
                write!(f, "no pipeline with id {}", pipeline.index())
            }
            Error::ObjectNotFound { pipeline, object } => write!(
                f,
                "no object with id {} in pipeline {}",
                object.index(),
                pipeline.index()
            ),
            Error::TextureNotFound(texture) => {
                write!(f, "no texture with id {}", texture.index())
            }
            Error::SizeMismatch { uniform, expected, actual } => write!(
                f,
                "uniform {uniform} expects {expected} bytes, got {actual}"
            ),
            Error::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Error::Device(msg) => write!(f, "device error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used across the crate's public API.
pub type Result<T> = std::result::Result<T, Error>;
