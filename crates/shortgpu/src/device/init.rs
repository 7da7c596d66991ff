/// Options for [`Gpu::new`](super::Gpu::new).
///
/// The defaults suit the bundled runtime: sRGB output, vsync, a 32-bit float
/// depth buffer and no optional wgpu features.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick the first sRGB surface format the adapter offers, if any.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Used only when the surface supports it; otherwise its first mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint, honored per backend.
    pub desired_maximum_frame_latency: u32,

    /// `None` disables depth testing in every pipeline built for this GPU.
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            depth_format: Some(wgpu::TextureFormat::Depth32Float),
        }
    }
}

impl GpuInit {
    pub fn with_present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.present_mode = mode;
        self
    }

    pub fn with_depth(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn without_depth(mut self) -> Self {
        self.depth_format = None;
        self
    }

    /// Limits low enough for WebGL2-class and older mobile adapters.
    pub fn with_downlevel_limits(mut self) -> Self {
        self.required_limits = wgpu::Limits::downlevel_webgl2_defaults();
        self
    }
}
