//! Environment signals for a native window.

use hero_core::tier::EnvironmentSignals;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Signals a desktop window cannot report by itself.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProbeOverrides {
    pub prefers_reduced_motion: bool,
    pub coarse_pointer: bool,
    pub device_memory_gb: Option<f32>,
}

pub fn probe_window(window: &Window, overrides: &ProbeOverrides) -> EnvironmentSignals {
    let cores = std::thread::available_parallelism()
        .ok()
        .map(|n| n.get() as u32);
    let signals = signals_from(
        window.inner_size(),
        window.scale_factor(),
        cores,
        window.is_visible().unwrap_or(true),
        overrides,
    );
    log::debug!("Environment: {signals:?}");
    signals
}

/// Viewport sizes are reported in logical pixels, like a browser's CSS pixels.
pub fn signals_from(
    size: PhysicalSize<u32>,
    scale_factor: f64,
    hardware_concurrency: Option<u32>,
    visible: bool,
    overrides: &ProbeOverrides,
) -> EnvironmentSignals {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    let logical = size.to_logical::<f64>(scale);
    EnvironmentSignals {
        viewport_width: logical.width as f32,
        viewport_height: logical.height as f32,
        device_pixel_ratio: scale as f32,
        coarse_pointer: overrides.coarse_pointer,
        hardware_concurrency,
        device_memory_gb: overrides.device_memory_gb,
        prefers_reduced_motion: overrides.prefers_reduced_motion,
        page_visible: visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_is_reported_in_logical_pixels() {
        let signals = signals_from(
            PhysicalSize::new(2560, 1440),
            2.0,
            Some(8),
            true,
            &ProbeOverrides::default(),
        );
        assert_eq!(signals.viewport_width, 1280.0);
        assert_eq!(signals.viewport_height, 720.0);
        assert_eq!(signals.device_pixel_ratio, 2.0);
        assert_eq!(signals.hardware_concurrency, Some(8));
        assert!(!signals.prefers_reduced_motion);
    }

    #[test]
    fn overrides_pass_through() {
        let overrides = ProbeOverrides {
            prefers_reduced_motion: true,
            coarse_pointer: true,
            device_memory_gb: Some(2.0),
        };
        let signals = signals_from(PhysicalSize::new(800, 600), 0.0, None, false, &overrides);
        assert_eq!(signals.device_pixel_ratio, 1.0);
        assert!(signals.prefers_reduced_motion);
        assert!(signals.coarse_pointer);
        assert_eq!(signals.device_memory_gb, Some(2.0));
        assert!(!signals.page_visible);
    }
}
