//! The scroll-synchronized hero scene controller.
//!
//! One `HeroController` owns every piece of mutable state: the camera rig,
//! the scene graph, the timeline binding, the dirty flag and the host
//! registrations. Host events arrive through [`HeroController::handle_event`]
//! and are handled synchronously; asset completions are drained once per tick.

use hero_core::camera_frame::{CameraFrames, CameraPose};
use hero_core::config::{HeroConfig, InteractionMode};
use hero_core::scene::{ModelSlot, SceneGraph, SceneModel};
use hero_core::stage::{Stage, StageMap};
use hero_core::tier::{DeviceProfile, EnvironmentSignals};
use hero_core::time::FrameClock;
use hero_core::timeline::Timeline;
use hero_render::{PerspectiveCamera, Renderer};

use crate::assets::{place_model, MeshLoader, ModelSlots, ModelState};
use crate::camera_rig::CameraRig;
use crate::driver::{DriverSettings, TimelineDriver};
use crate::error::{AssetLoadError, InitError};
use crate::host::{EventKind, EventOutcome, FrameRequestId, Host, HostEvent};
use crate::lifecycle::Disposers;
use crate::render_loop::idle_transform;

/// Drawing surface size in CSS pixels plus the capped device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl ViewportSize {
    pub fn from_signals(signals: &EnvironmentSignals, profile: &DeviceProfile) -> Self {
        Self {
            width: signals.viewport_width.max(1.0).round() as u32,
            height: signals.viewport_height.max(1.0).round() as u32,
            pixel_ratio: profile.pixel_ratio(signals.device_pixel_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

pub struct HeroController<H: Host, R: Renderer, L: MeshLoader> {
    host: H,
    renderer: R,
    loader: L,
    config: HeroConfig,
    profile: DeviceProfile,
    frames: CameraFrames,
    scene: SceneGraph,
    camera: PerspectiveCamera,
    rig: CameraRig,
    models: ModelSlots,
    driver: Option<TimelineDriver>,
    disposers: Disposers,
    clock: FrameClock,
    viewport: ViewportSize,
    pending_resize: Option<FrameRequestId>,
    visible: bool,
    dirty: bool,
    load_token: u64,
    destroyed: bool,
    frames_rendered: u64,
}

impl<H: Host, R: Renderer, L: MeshLoader> HeroController<H, R, L> {
    /// Wire the scene into `host`: size the surface, bind the scroll timeline
    /// when the pinned root exists, register listeners and the ticker, and
    /// start loading both models.
    pub fn init(mut host: H, mut renderer: R, mut loader: L, config: HeroConfig) -> Result<Self, InitError> {
        config.validate().map_err(InitError::InvalidConfig)?;
        if !host.has_canvas(&config.canvas_selector) {
            return Err(InitError::MissingCanvas(config.canvas_selector.clone()));
        }

        let signals = host.environment();
        let profile = DeviceProfile::from_signals(&signals);
        let frames = CameraFrames::for_class(profile.class);
        let stages = StageMap::new(config.stage_count).map_err(InitError::InvalidConfig)?;
        let timeline =
            Timeline::build(stages, &frames, &config.sections).map_err(InitError::InvalidConfig)?;

        let mode = match config.interaction {
            InteractionMode::Step if !profile.step_mode_allowed => {
                log::info!("Step interaction needs a fine pointer; using continuous scroll");
                InteractionMode::Continuous
            }
            mode => mode,
        };

        let viewport = ViewportSize::from_signals(&signals, &profile);
        let lens = config.lens;
        let mut camera = PerspectiveCamera::new(lens.fov_y_deg, viewport.aspect(), lens.near, lens.far);
        let mut rig = CameraRig::new(frames.pose(Stage::Stage1));
        renderer.resize_surface(viewport.width, viewport.height, viewport.pixel_ratio);

        let mut disposers = Disposers::new();
        disposers.start_ticker(&mut host);
        disposers.listen(&mut host, EventKind::Resize);
        disposers.listen(&mut host, EventKind::Visibility);

        let driver = match host.pinned_region(&config.pinned_selector) {
            Some(region) => {
                let settings = DriverSettings {
                    mode,
                    snap: config.snap,
                    step: config.step,
                    scrub_seconds: profile.scrub_seconds,
                    duration_scale: profile.duration_scale(),
                    distance_factor: profile.scroll_distance_factor,
                };
                let mut driver = TimelineDriver::new(
                    timeline,
                    settings,
                    &config.pinned_selector,
                    region,
                    signals.viewport_height,
                );
                host.set_stage_attribute(Stage::Stage1);
                driver.sync(&mut host, &mut rig);
                disposers.listen(&mut host, EventKind::Scroll);
                if mode == InteractionMode::Step {
                    disposers.listen(&mut host, EventKind::Wheel);
                }
                Some(driver)
            }
            None => {
                log::info!(
                    "Pinned root '{}' not found; scroll binding disabled",
                    config.pinned_selector
                );
                None
            }
        };
        let pose = rig.pose();
        camera.look_at(pose.position, pose.target);

        let load_token = 1;
        let mut models = ModelSlots::new();
        for &slot in ModelSlot::ALL {
            models.begin_loading(slot);
            loader.request(slot, &config.model(slot).url, load_token);
        }

        log::info!(
            "Hero scene initialised: {:?} viewport {}x{} @{:.2}, {} tier, {} stages, {:?} interaction{}",
            profile.class,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            profile.power,
            config.stage_count,
            mode,
            if profile.reduced_motion { ", reduced motion" } else { "" }
        );

        Ok(Self {
            host,
            renderer,
            loader,
            config,
            profile,
            frames,
            scene: SceneGraph::new(),
            camera,
            rig,
            models,
            driver,
            disposers,
            clock: FrameClock::new(),
            viewport,
            pending_resize: None,
            visible: signals.page_visible,
            dirty: true,
            load_token,
            destroyed: false,
            frames_rendered: 0,
        })
    }

    /// Feed one host event. Everything is ignored after [`Self::destroy`].
    pub fn handle_event(&mut self, event: HostEvent) -> EventOutcome {
        if self.destroyed {
            return EventOutcome::PASS;
        }
        let now = self.clock.now;
        match event {
            HostEvent::Resize => self.schedule_resize(),
            HostEvent::AnimationFrame(id) => {
                if self.pending_resize == Some(id) {
                    self.pending_resize = None;
                    self.apply_resize();
                }
            }
            HostEvent::VisibilityChanged(visible) => {
                log::debug!("Page visibility changed: {visible}");
                self.visible = visible;
                if visible {
                    self.dirty = true;
                }
            }
            HostEvent::Wheel { delta_y, pointer_y } => {
                if let Some(driver) = self.driver.as_mut() {
                    return driver.on_wheel(&mut self.host, delta_y, pointer_y, now);
                }
            }
            HostEvent::Scroll => {
                if let Some(driver) = self.driver.as_mut() {
                    self.dirty |= driver.on_scroll(&mut self.host, &mut self.rig, now);
                }
            }
            HostEvent::Tick { time } => self.tick(time),
        }
        EventOutcome::PASS
    }

    fn tick(&mut self, time: f64) {
        self.clock.begin_frame(time);
        let now = self.clock.now;

        self.drain_loads(now);
        if !self.visible {
            return;
        }

        if let Some(driver) = self.driver.as_mut() {
            self.dirty |= driver.update(&mut self.host, &mut self.rig, now);
        }
        self.dirty |= self.rig.step(now);
        if !self.profile.reduced_motion {
            self.dirty |= self.animate_models(now);
        }

        let pose = self.rig.pose();
        self.camera.look_at(pose.position, pose.target);

        if self.dirty {
            self.renderer.render(&self.scene, &self.camera);
            self.frames_rendered += 1;
            self.dirty = false;
        }

        if self.clock.stats_due() {
            log::debug!(
                "{:.1} fps ({:.2} ms), {} frames rendered",
                self.clock.smoothed_fps,
                self.clock.smoothed_frame_time_ms,
                self.frames_rendered
            );
        }
    }

    fn drain_loads(&mut self, now: f64) {
        for completion in self.loader.poll() {
            let slot = completion.slot;
            if completion.token != self.load_token {
                log::debug!("Discarding stale {slot} load");
                continue;
            }
            let url = &self.config.model(slot).url;
            let loaded = completion.result.and_then(|bundle| match bundle.bounds() {
                Some(bounds) => Ok((bundle, bounds)),
                None => Err(AssetLoadError::EmptyMesh { url: url.clone() }),
            });
            match loaded {
                Ok((bundle, bounds)) => {
                    let rest = place_model(bounds, self.config.model(slot));
                    self.renderer.upload_model(slot, &bundle);
                    self.models.place(
                        slot,
                        rest,
                        &self.config.intro,
                        !self.profile.reduced_motion,
                        now,
                    );
                    let mut transform = rest;
                    transform.translation.y += self.models.intro_offset(slot);
                    self.scene.insert(SceneModel { slot, transform });
                    self.dirty = true;
                    log::info!("Placed {slot} model at scale {:.3}", rest.scale);
                }
                Err(e) => {
                    log::warn!("{slot} model unavailable: {e}");
                    self.models.fail(slot);
                }
            }
        }
    }

    /// Intro and idle motion for every present model.
    fn animate_models(&mut self, now: f64) -> bool {
        let mut moved = self.models.advance_intros(now);
        let t = self.clock.elapsed;
        for &slot in ModelSlot::ALL {
            let Some(rest) = self.models.rest(slot) else {
                continue;
            };
            let transform = idle_transform(
                rest,
                &self.config.model(slot).idle,
                self.models.intro_offset(slot),
                t,
            );
            if let Some(model) = self.scene.model_mut(slot) {
                model.transform = transform;
                moved = true;
            }
        }
        moved
    }

    /// Coalesce resizes into one deferred update on the next frame.
    fn schedule_resize(&mut self) {
        if let Some(id) = self.pending_resize.take() {
            self.host.cancel_frame(id);
        }
        self.pending_resize = Some(self.host.request_frame());
    }

    fn apply_resize(&mut self) {
        let signals = self.host.environment();
        self.viewport = ViewportSize::from_signals(&signals, &self.profile);
        self.camera.set_aspect(self.viewport.aspect());
        self.renderer.resize_surface(
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
        );
        if let Some(driver) = self.driver.as_mut() {
            driver.refresh_region(
                &mut self.host,
                &mut self.rig,
                signals.viewport_height,
                self.clock.now,
            );
        }
        self.dirty = true;
        log::debug!(
            "Resized to {}x{} @{:.2}",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio
        );
    }

    /// Tear everything down. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        if let Some(id) = self.pending_resize.take() {
            self.host.cancel_frame(id);
        }
        self.disposers.dispose(&mut self.host);
        let had_binding = self.driver.is_some();
        if let Some(mut driver) = self.driver.take() {
            driver.kill();
        }
        self.rig.stop();
        for &slot in ModelSlot::ALL {
            self.renderer.release_model(slot);
            self.scene.remove(slot);
            self.models.release(slot);
        }
        self.load_token += 1;
        if had_binding {
            self.host.set_stage_attribute(Stage::Stage1);
        }
        self.dirty = false;
        log::info!("Hero scene destroyed after {} rendered frames", self.frames_rendered);
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn stage(&self) -> Stage {
        self.driver.as_ref().map_or(Stage::Stage1, TimelineDriver::stage)
    }

    pub fn progress(&self) -> f32 {
        self.driver.as_ref().map_or(0.0, TimelineDriver::progress)
    }

    pub fn interaction_mode(&self) -> Option<InteractionMode> {
        self.driver.as_ref().map(TimelineDriver::mode)
    }

    pub fn step_in_flight(&self) -> bool {
        self.driver.as_ref().is_some_and(TimelineDriver::in_flight)
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.rig.pose()
    }

    pub fn stage_pose(&self, stage: Stage) -> CameraPose {
        self.frames.pose(stage)
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn model_state(&self, slot: ModelSlot) -> ModelState {
        self.models.state(slot)
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Direct renderer access, e.g. to force a context loss.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}
