//! Hero viewer: runs the scroll-synchronized hero scene in a native window.
//!
//! The window stands in for a page. Wheel and keyboard input move a virtual
//! scroll offset (see `page.rs`), the controller reacts through its host
//! listeners, and every redraw delivers queued animation frames followed by
//! one ticker callback.

mod args;
mod page;

use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use args::ViewerArgs;
use hero_controller::{EventKind, GltfFileLoader, HeroController, HostEvent};
use hero_core::config::{load_config_from_path, HeroConfig, InteractionMode};
use hero_core::tier::DeviceProfile;
use hero_platform::environment::{probe_window, ProbeOverrides};
use hero_platform::window::PlatformConfig;
use hero_render::{RendererConfig, WgpuRenderer};
use page::WindowPage;

/// Logical pixels per wheel line.
const LINE_HEIGHT: f32 = 100.0;
/// Logical pixels per arrow key press.
const ARROW_STEP: f32 = 80.0;

type Controller = HeroController<WindowPage, WgpuRenderer, GltfFileLoader>;

struct App {
    args: ViewerArgs,
    platform: PlatformConfig,
    controller: Option<Controller>,
    start: Instant,
    pointer_y: f32,
}

impl App {
    fn new(args: ViewerArgs) -> Self {
        Self {
            args,
            platform: PlatformConfig::default(),
            controller: None,
            start: Instant::now(),
            pointer_y: 0.0,
        }
    }

    fn load_config(&self) -> Result<HeroConfig, String> {
        let mut config = match &self.args.config_path {
            Some(path) => load_config_from_path(path)?,
            None => HeroConfig::default(),
        };
        if self.args.step {
            config.interaction = InteractionMode::Step;
        }
        Ok(config)
    }

    fn overrides(&self) -> ProbeOverrides {
        ProbeOverrides {
            prefers_reduced_motion: self.args.reduced_motion,
            coarse_pointer: self.args.coarse_pointer,
            device_memory_gb: None,
        }
    }

    fn start_controller(&self, event_loop: &ActiveEventLoop) -> Result<Controller, String> {
        let window = hero_platform::window::create_window(event_loop, &self.platform)?;
        log::info!(
            "Window created: {}x{}",
            self.platform.width,
            self.platform.height
        );

        let overrides = self.overrides();
        let profile = DeviceProfile::from_signals(&probe_window(&window, &overrides));
        let config = self.load_config()?;

        let renderer = WgpuRenderer::new(
            window.clone(),
            RendererConfig {
                antialias: profile.antialias,
                exposure: config.exposure,
                clear_color: config.clear_color,
            },
        )?;
        let loader = GltfFileLoader::new(&self.args.asset_root);
        let page = WindowPage::new(
            window,
            overrides,
            &self.platform.title,
            profile.scroll_distance_factor,
        );
        HeroController::init(page, renderer, loader, config).map_err(|e| e.to_string())
    }

    /// Move the virtual page and let the controller see the scroll.
    fn scroll_page(controller: &mut Controller, delta: f32) {
        let page = controller.host_mut();
        if page.scroll_by(delta) && page.is_listening(EventKind::Scroll) {
            controller.handle_event(HostEvent::Scroll);
        }
    }

    fn keyboard_scroll(controller: &mut Controller, key: KeyCode) {
        let viewport = controller.host().viewport_height();
        match key {
            KeyCode::ArrowDown => Self::scroll_page(controller, ARROW_STEP),
            KeyCode::ArrowUp => Self::scroll_page(controller, -ARROW_STEP),
            KeyCode::PageDown | KeyCode::Space => Self::scroll_page(controller, viewport),
            KeyCode::PageUp => Self::scroll_page(controller, -viewport),
            KeyCode::Home => Self::scroll_page(controller, f32::MIN),
            KeyCode::End => Self::scroll_page(controller, f32::MAX),
            _ => {}
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(controller) = self.controller.as_mut() {
            controller.destroy();
            log::info!(
                "Controller destroyed after {} rendered frames.",
                controller.frames_rendered()
            );
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_some() {
            return;
        }
        match self.start_controller(event_loop) {
            Ok(controller) => self.controller = Some(controller),
            Err(err) => {
                log::error!("Failed to start the hero scene: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(controller) = &self.controller {
            if controller.host().ticker_running() {
                controller.host().request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(size) => {
                let listening = controller.host().is_listening(EventKind::Resize);
                if size.width > 0 && size.height > 0 && listening {
                    controller.handle_event(HostEvent::Resize);
                }
            }

            WindowEvent::Occluded(occluded) => {
                if controller.host().is_listening(EventKind::Visibility) {
                    controller.handle_event(HostEvent::VisibilityChanged(!occluded));
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = controller.host().scale_factor();
                self.pointer_y = (position.y / scale) as f32;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(pos) => {
                        (-pos.y / controller.host().scale_factor()) as f32
                    }
                };
                let outcome = if controller.host().is_listening(EventKind::Wheel) {
                    controller.handle_event(HostEvent::Wheel {
                        delta_y,
                        pointer_y: self.pointer_y,
                    })
                } else {
                    hero_controller::EventOutcome::PASS
                };
                if !outcome.default_prevented {
                    Self::scroll_page(controller, delta_y);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape {
                        self.shutdown(event_loop);
                        return;
                    }
                    Self::keyboard_scroll(controller, key);
                }
            }

            WindowEvent::RedrawRequested => {
                for id in controller.host_mut().take_pending_frames() {
                    controller.handle_event(HostEvent::AnimationFrame(id));
                }
                if controller.host().ticker_running() {
                    let time = self.start.elapsed().as_secs_f64();
                    controller.handle_event(HostEvent::Tick { time });
                }
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match ViewerArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    log::info!("Hero viewer starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args);
    event_loop.run_app(&mut app).expect("Event loop error");
}
