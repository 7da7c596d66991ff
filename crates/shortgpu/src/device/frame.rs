/// One acquired swap-chain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// frame, so submit it through [`Gpu::submit`](super::Gpu::submit) promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    /// Depth attachment sized like `view`, when the GPU was created with depth.
    pub depth_view: Option<wgpu::TextureView>,
    pub encoder: wgpu::CommandEncoder,
}

/// What the caller should do after [`Gpu::begin_frame`](super::Gpu::begin_frame) fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; draw again next frame.
    Reconfigured,
    SkipFrame,
    /// Out of memory; shut down.
    Fatal,
}
