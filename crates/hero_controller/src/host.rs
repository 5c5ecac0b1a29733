//! The page the hero scene lives in.
//!
//! The controller never holds references into the host; it queries and
//! styles it through [`Host`] and receives everything else as [`HostEvent`]s.

use hero_core::section::{SectionId, SectionStyle};
use hero_core::stage::Stage;
use hero_core::tier::EnvironmentSignals;

pub type ListenerId = u64;
pub type FrameRequestId = u64;
pub type TickerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    Visibility,
    Wheel,
    Scroll,
}

/// Geometry of the pinned root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedRegion {
    /// Document scroll offset at which pinning starts.
    pub start: f32,
    /// Viewport-relative vertical bounds of the pinned element.
    pub top: f32,
    pub bottom: f32,
}

impl PinnedRegion {
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

pub trait Host {
    fn has_canvas(&self, selector: &str) -> bool;

    /// Current environment snapshot. Viewport size and visibility are re-read
    /// on resize; the rest only matters at init.
    fn environment(&self) -> EnvironmentSignals;

    fn pinned_region(&self, selector: &str) -> Option<PinnedRegion>;

    fn scroll_y(&self) -> f32;

    fn set_scroll_y(&mut self, y: f32);

    fn apply_section_style(&mut self, section: SectionId, style: SectionStyle);

    fn set_stage_attribute(&mut self, stage: Stage);

    fn subscribe(&mut self, kind: EventKind) -> ListenerId;

    fn unsubscribe(&mut self, id: ListenerId);

    /// Ask for a one-shot [`HostEvent::AnimationFrame`] before the next paint.
    fn request_frame(&mut self) -> FrameRequestId;

    fn cancel_frame(&mut self, id: FrameRequestId);

    /// Start delivering [`HostEvent::Tick`] once per frame.
    fn add_ticker(&mut self) -> TickerId;

    fn remove_ticker(&mut self, id: TickerId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize,
    VisibilityChanged(bool),
    /// `pointer_y` is viewport-relative.
    Wheel { delta_y: f32, pointer_y: f32 },
    Scroll,
    AnimationFrame(FrameRequestId),
    /// Ticker callback with the ticker's time in seconds.
    Tick { time: f64 },
}

/// What the host should do with the event after the controller saw it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    /// The host must not apply its default action (native scrolling).
    pub default_prevented: bool,
}

impl EventOutcome {
    pub const PASS: EventOutcome = EventOutcome {
        default_prevented: false,
    };

    pub const CONSUMED: EventOutcome = EventOutcome {
        default_prevented: true,
    };
}
