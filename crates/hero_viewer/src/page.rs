//! A virtual document hosted in a native window.
//!
//! The window is the viewport and the pinned root starts at the top of the
//! document, followed by its scroll distance and a short tail. Scrolling is
//! virtual: the wheel and keyboard move `scroll_y`, nothing else does.

use std::collections::HashMap;
use std::sync::Arc;

use hero_controller::{EventKind, FrameRequestId, Host, ListenerId, PinnedRegion, TickerId};
use hero_core::section::{SectionId, SectionStyle};
use hero_core::stage::Stage;
use hero_core::tier::EnvironmentSignals;
use hero_platform::environment::{probe_window, ProbeOverrides};
use winit::window::Window;

/// Document length past the pinned region, in viewport heights.
const TAIL_VIEWPORTS: f32 = 0.5;

pub struct WindowPage {
    window: Arc<Window>,
    overrides: ProbeOverrides,
    title: String,
    /// Pinned scroll distance in viewport heights, from the device tier.
    distance_factor: f32,
    scroll_y: f32,
    stage: Stage,
    sections: HashMap<SectionId, SectionStyle>,
    listeners: HashMap<ListenerId, EventKind>,
    pending_frames: Vec<FrameRequestId>,
    ticker: Option<TickerId>,
    next_id: u64,
}

impl WindowPage {
    pub fn new(
        window: Arc<Window>,
        overrides: ProbeOverrides,
        title: &str,
        distance_factor: f32,
    ) -> Self {
        Self {
            window,
            overrides,
            title: title.to_string(),
            distance_factor,
            scroll_y: 0.0,
            stage: Stage::Stage1,
            sections: HashMap::new(),
            listeners: HashMap::new(),
            pending_frames: Vec::new(),
            ticker: None,
            next_id: 0,
        }
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn take_pending_frames(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending_frames)
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    pub fn viewport_height(&self) -> f32 {
        self.environment().viewport_height
    }

    fn max_scroll(&self) -> f32 {
        self.viewport_height() * (self.distance_factor + TAIL_VIEWPORTS)
    }

    /// User scroll. Returns true if the offset moved.
    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.scroll_y + delta)
    }

    pub fn scroll_to(&mut self, y: f32) -> bool {
        let clamped = y.clamp(0.0, self.max_scroll());
        if clamped == self.scroll_y {
            return false;
        }
        self.scroll_y = clamped;
        true
    }

    fn refresh_title(&self) {
        let visible: Vec<&str> = SectionId::ALL
            .iter()
            .filter(|id| self.sections.get(*id).map_or(true, SectionStyle::visible))
            .map(|id| id.label())
            .collect();
        self.window.set_title(&format!(
            "{} | stage {} | {}",
            self.title,
            self.stage.attribute_value(),
            visible.join(" + ")
        ));
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for WindowPage {
    fn has_canvas(&self, _selector: &str) -> bool {
        // The window surface is the canvas.
        true
    }

    fn environment(&self) -> EnvironmentSignals {
        probe_window(&self.window, &self.overrides)
    }

    fn pinned_region(&self, _selector: &str) -> Option<PinnedRegion> {
        Some(PinnedRegion {
            start: 0.0,
            top: 0.0,
            bottom: self.viewport_height(),
        })
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn set_scroll_y(&mut self, y: f32) {
        self.scroll_to(y);
    }

    fn apply_section_style(&mut self, section: SectionId, style: SectionStyle) {
        let was_visible = self.sections.get(&section).map_or(true, SectionStyle::visible);
        self.sections.insert(section, style);
        if was_visible != style.visible() {
            log::debug!(
                "Section {section} {}",
                if style.visible() { "shown" } else { "hidden" }
            );
            self.refresh_title();
        }
    }

    fn set_stage_attribute(&mut self, stage: Stage) {
        self.stage = stage;
        self.refresh_title();
    }

    fn subscribe(&mut self, kind: EventKind) -> ListenerId {
        let id = self.next();
        self.listeners.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_frame(&mut self) -> FrameRequestId {
        let id = self.next();
        self.pending_frames.push(id);
        self.window.request_redraw();
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending_frames.retain(|pending| *pending != id);
    }

    fn add_ticker(&mut self) -> TickerId {
        let id = self.next();
        self.ticker = Some(id);
        id
    }

    fn remove_ticker(&mut self, id: TickerId) {
        if self.ticker == Some(id) {
            self.ticker = None;
        }
    }
}
