use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Let the surface composite over whatever is behind the window.
    pub transparent: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Hero Scene".to_string(),
            width: 1280,
            height: 720,
            transparent: false,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
        .with_transparent(config.transparent);

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| format!("Failed to create window: {e}"))?;
    Ok(Arc::new(window))
}
