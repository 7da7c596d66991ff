//! Contract between the window runtime and applications.
//!
//! An [`App`] is handed the GPU once the window exists, sees raw window
//! events, and draws through a [`FrameCtx`] once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
