/// Initialization parameters for the GPU layer.
///
/// The demo only ever opens one device, so this stays a flat bag of knobs that
/// map straight onto wgpu descriptors.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when the surface offers one.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO waits for the display refresh, which is what paces the frame loop.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features. Empty for the demo.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// Texture dimension limits are raised to what the adapter supports so
    /// the surface can follow the window up to the display's resolution.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface (a hint).
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Picks the present mode from a vsync flag.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        self
    }
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
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_fit_wide_windows() {
        let init = GpuInit::default();
        assert!(init.required_limits.max_texture_dimension_2d >= 8192);
    }

    #[test]
    fn vsync_selects_present_mode() {
        assert_eq!(GpuInit::default().with_vsync(true).present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(
            GpuInit::default().with_vsync(false).present_mode,
            wgpu::PresentMode::AutoNoVsync
        );
    }
}
