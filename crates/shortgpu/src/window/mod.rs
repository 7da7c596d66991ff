//! Window and runtime loop.
//!
//! [`Runtime`] owns the `winit` event loop and a single window, pairs the
//! window with a [`Gpu`](crate::device::Gpu) and drives an
//! [`App`](crate::core::App) once per frame.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
