use winit::dpi::PhysicalSize;

use super::{GpuInit, SurfaceErrorAction};

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if caps.formats.is_empty() {
        return None;
    }

    if prefer_srgb {
        if let Some(f) = caps.formats.iter().copied().find(|f| f.is_srgb()) {
            return Some(f);
        }
    }

    Some(caps.formats[0])
}

fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Configuration for a freshly created surface, `None` when the surface
/// reports no formats for this adapter.
pub(crate) fn initial_config(
    caps: &wgpu::SurfaceCapabilities,
    size: PhysicalSize<u32>,
    init: &GpuInit,
) -> Option<wgpu::SurfaceConfiguration> {
    let format = choose_surface_format(caps, init.prefer_srgb)?;
    Some(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width,
        height: size.height,
        present_mode: init.present_mode,
        alpha_mode: choose_alpha_mode(caps, init.alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}

/// Depth attachment that follows the surface size.
pub(crate) struct DepthTarget {
    pub format: wgpu::TextureFormat,
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            format,
            view: Self::allocate(device, config, format),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) {
        self.view = Self::allocate(device, config, self.format);
    }

    fn allocate(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        format: wgpu::TextureFormat,
    ) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("shortgpu depth"),
                size: wgpu::Extent3d {
                    width: config.width.max(1),
                    height: config.height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Applies a new drawable size.
///
/// Returns `false` when the surface was left unconfigured (zero-sized, e.g.
/// minimized); wgpu rejects 0x0 configurations.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            // A minimized window stays unconfigured until the next resize.
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    };

    match action {
        SurfaceErrorAction::Fatal => log::error!("surface error: {err}"),
        SurfaceErrorAction::Reconfigured => log::debug!("surface error: {err}, reconfigured"),
        SurfaceErrorAction::SkipFrame => log::warn!("surface error: {err}, frame skipped"),
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(formats: &[wgpu::TextureFormat]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: vec![wgpu::CompositeAlphaMode::Opaque],
            ..Default::default()
        }
    }

    #[test]
    fn srgb_format_is_preferred() {
        let caps = caps(&[
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ]);
        let config = initial_config(&caps, PhysicalSize::new(640, 480), &GpuInit::default());
        let config = config.expect("surface has formats");
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!((config.width, config.height), (640, 480));

        let init = GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        };
        let config = initial_config(&caps, PhysicalSize::new(1, 1), &init).expect("formats");
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8Unorm);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let caps = caps(&[wgpu::TextureFormat::Rgba8Unorm]);
        let init = GpuInit {
            alpha_mode: Some(wgpu::CompositeAlphaMode::PreMultiplied),
            ..GpuInit::default()
        };
        let config = initial_config(&caps, PhysicalSize::new(8, 8), &init).expect("formats");
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn incompatible_surface_has_no_config() {
        assert!(initial_config(&caps(&[]), PhysicalSize::new(8, 8), &GpuInit::default()).is_none());
    }
}
