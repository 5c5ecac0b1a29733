//! Binds the scroll timeline to the host's scroll position.
//!
//! Continuous mode scrubs the timeline with the scroll offset and snaps to
//! labels once scrolling rests. Step mode turns each wheel gesture into one
//! programmatic scroll to the neighbouring label; intermediate offsets run
//! through the same continuous path, so both modes share one source of truth.

use hero_core::config::{InteractionMode, SnapConfig, StepConfig};
use hero_core::easing::Easing;
use hero_core::stage::Stage;
use hero_core::timeline::Timeline;
use hero_core::tween::ActiveTween;

use crate::camera_rig::CameraRig;
use crate::host::{EventOutcome, Host, PinnedRegion};
use crate::snap::{directional_target, snap_duration};

/// Camera catch-up curve while scrubbing.
const SCRUB_EASE: Easing = Easing::Power3Out;

/// Scroll offsets within this many pixels of our own last write are echoes.
const ECHO_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollTweenKind {
    Snap,
    Step,
}

#[derive(Debug, Clone, Copy)]
struct ScrollTween {
    kind: ScrollTweenKind,
    /// Destination as a fraction of the pinned distance.
    target: f32,
    tween: ActiveTween<f32>,
}

/// Timing knobs resolved from config and device profile at init.
#[derive(Debug, Clone, Copy)]
pub struct DriverSettings {
    pub mode: InteractionMode,
    pub snap: SnapConfig,
    pub step: StepConfig,
    pub scrub_seconds: f64,
    /// Multiplies scripted scroll durations; zero under reduced motion.
    pub duration_scale: f64,
    /// Pinned scroll distance in viewport heights.
    pub distance_factor: f32,
}

pub struct TimelineDriver {
    timeline: Timeline,
    settings: DriverSettings,
    pinned_selector: String,
    region: PinnedRegion,
    distance: f32,
    stage: Stage,
    progress: f32,
    last_scroll_y: f32,
    direction: f32,
    /// Controller time of the last user scroll not yet settled by a snap.
    snap_pending_since: Option<f64>,
    scroll_tween: Option<ScrollTween>,
    echo_y: Option<f32>,
    in_flight: bool,
    killed: bool,
}

impl TimelineDriver {
    pub fn new(
        timeline: Timeline,
        settings: DriverSettings,
        pinned_selector: &str,
        region: PinnedRegion,
        viewport_height: f32,
    ) -> Self {
        let stage = timeline.stages().first();
        Self {
            timeline,
            settings,
            pinned_selector: pinned_selector.to_string(),
            region,
            distance: scroll_distance(settings.distance_factor, viewport_height),
            stage,
            progress: 0.0,
            last_scroll_y: region.start,
            direction: 0.0,
            snap_pending_since: None,
            scroll_tween: None,
            echo_y: None,
            in_flight: false,
            killed: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn mode(&self) -> InteractionMode {
        self.settings.mode
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_snapping(&self) -> bool {
        matches!(
            self.scroll_tween,
            Some(ScrollTween {
                kind: ScrollTweenKind::Snap,
                ..
            })
        )
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Document offset of a stage label.
    pub fn label_offset(&self, stage: Stage) -> Option<f32> {
        self.timeline
            .stages()
            .label_fraction(stage)
            .map(|fraction| self.region.start + fraction * self.distance)
    }

    /// Apply the host's current scroll offset with the camera placed directly.
    pub fn sync<H: Host>(&mut self, host: &mut H, rig: &mut CameraRig) {
        let y = host.scroll_y();
        self.last_scroll_y = y;
        self.apply_offset(y, host, rig, 0.0, None);
    }

    /// Re-measure the pinned region after a resize.
    pub fn refresh_region<H: Host>(
        &mut self,
        host: &mut H,
        rig: &mut CameraRig,
        viewport_height: f32,
        now: f64,
    ) {
        if self.killed {
            return;
        }
        if let Some(region) = host.pinned_region(&self.pinned_selector) {
            self.region = region;
        }
        self.distance = scroll_distance(self.settings.distance_factor, viewport_height);
        self.retarget_scroll_tween(host, now);
        let y = host.scroll_y();
        self.apply_offset(y, host, rig, now, Some(self.settings.scrub_seconds));
    }

    /// Point a running step or snap at its label's offset in the current
    /// layout, keeping the time it has left.
    fn retarget_scroll_tween<H: Host>(&mut self, host: &H, now: f64) {
        let Some(active) = self.scroll_tween.as_mut() else {
            return;
        };
        let destination = self.region.start + active.target * self.distance;
        if destination == active.tween.to {
            return;
        }
        let remaining = (active.tween.start + active.tween.duration - now).max(0.0);
        log::debug!(
            "Layout changed mid-scroll; retargeting {:.1} -> {:.1}",
            active.tween.to,
            destination
        );
        active.tween = ActiveTween::new(
            host.scroll_y(),
            destination,
            now,
            remaining,
            active.tween.ease,
        );
    }

    /// A scroll event from the host. Returns true when anything was applied.
    pub fn on_scroll<H: Host>(&mut self, host: &mut H, rig: &mut CameraRig, now: f64) -> bool {
        if self.killed {
            return false;
        }
        let y = host.scroll_y();
        if let Some(echo) = self.echo_y.take() {
            if (y - echo).abs() <= ECHO_TOLERANCE {
                return false;
            }
        }
        if self.is_snapping() {
            log::debug!("User scroll cancelled snap");
            self.scroll_tween = None;
        }
        let delta = y - self.last_scroll_y;
        if delta != 0.0 {
            self.direction = delta.signum();
        }
        self.last_scroll_y = y;
        if self.settings.mode == InteractionMode::Continuous && self.settings.snap.enabled {
            self.snap_pending_since = Some(now);
        }
        self.apply_offset(y, host, rig, now, Some(self.settings.scrub_seconds));
        true
    }

    /// A wheel gesture. In step mode gestures over the pinned region are
    /// consumed and may start a transition to the neighbouring stage.
    pub fn on_wheel<H: Host>(
        &mut self,
        host: &mut H,
        delta_y: f32,
        pointer_y: f32,
        now: f64,
    ) -> EventOutcome {
        if self.killed || self.settings.mode != InteractionMode::Step {
            return EventOutcome::PASS;
        }
        let Some(region) = host.pinned_region(&self.pinned_selector) else {
            return EventOutcome::PASS;
        };
        if !region.contains_y(pointer_y) {
            return EventOutcome::PASS;
        }
        if delta_y == 0.0 || self.in_flight {
            return EventOutcome::CONSUMED;
        }

        let current = self.stage.index();
        let target = if delta_y > 0.0 {
            current + 1
        } else if current > 0 {
            current - 1
        } else {
            log::debug!("Step gesture ignored: already at the first stage");
            return EventOutcome::CONSUMED;
        };
        if target >= self.timeline.stages().len() {
            log::debug!("Step gesture ignored: already at the last stage");
            return EventOutcome::CONSUMED;
        }
        let Some(stage) = Stage::from_index(target) else {
            return EventOutcome::CONSUMED;
        };
        let Some(target) = self.timeline.stages().label_fraction(stage) else {
            return EventOutcome::CONSUMED;
        };
        let destination = self.region.start + target * self.distance;

        let duration = self.settings.step.duration * self.settings.duration_scale;
        self.scroll_tween = Some(ScrollTween {
            kind: ScrollTweenKind::Step,
            target,
            tween: ActiveTween::new(
                host.scroll_y(),
                destination,
                now,
                duration,
                self.settings.step.ease,
            ),
        });
        self.in_flight = true;
        self.snap_pending_since = None;
        log::debug!("Stepping {} -> {stage}", self.stage);
        EventOutcome::CONSUMED
    }

    /// Per-tick work: advance a programmatic scroll, then consider snapping.
    /// Returns true when the scene needs a render.
    pub fn update<H: Host>(&mut self, host: &mut H, rig: &mut CameraRig, now: f64) -> bool {
        if self.killed {
            return false;
        }
        if let Some(active) = self.scroll_tween {
            let y = active.tween.value_at(now);
            host.set_scroll_y(y);
            self.echo_y = Some(y);
            self.last_scroll_y = y;
            self.apply_offset(y, host, rig, now, Some(self.settings.scrub_seconds));
            if active.tween.is_finished(now) {
                self.scroll_tween = None;
                if active.kind == ScrollTweenKind::Step {
                    self.in_flight = false;
                }
            }
            return true;
        }

        let Some(since) = self.snap_pending_since else {
            return false;
        };
        if now - since < self.settings.snap.delay {
            return false;
        }
        self.snap_pending_since = None;
        self.start_snap(host, now);
        false
    }

    fn start_snap<H: Host>(&mut self, host: &mut H, now: f64) {
        let labels = self.timeline.stages().label_fractions();
        let Some(target) = directional_target(self.progress, self.direction, labels) else {
            return;
        };
        let duration = snap_duration(target - self.progress, labels, &self.settings.snap)
            * self.settings.duration_scale;
        let destination = self.region.start + target * self.distance;
        log::debug!(
            "Snapping from progress {:.3} to {:.3} over {:.2}s",
            self.progress,
            target,
            duration
        );
        self.scroll_tween = Some(ScrollTween {
            kind: ScrollTweenKind::Snap,
            target,
            tween: ActiveTween::new(
                host.scroll_y(),
                destination,
                now,
                duration,
                self.settings.snap.ease,
            ),
        });
    }

    /// Stop all scroll-driven work. Later calls do nothing.
    pub fn kill(&mut self) {
        if self.killed {
            return;
        }
        self.killed = true;
        self.scroll_tween = None;
        self.snap_pending_since = None;
        self.in_flight = false;
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Map a scroll offset onto the timeline. `camera_seconds` of `None`
    /// places the camera directly.
    fn apply_offset<H: Host>(
        &mut self,
        y: f32,
        host: &mut H,
        rig: &mut CameraRig,
        now: f64,
        camera_seconds: Option<f64>,
    ) {
        self.progress = if self.distance > 0.0 {
            ((y - self.region.start) / self.distance).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let sample = self.timeline.sample_progress(self.progress);
        for (section, style) in &sample.sections {
            host.apply_section_style(*section, *style);
        }
        match camera_seconds {
            Some(seconds) => rig.tween_to(sample.camera, seconds, SCRUB_EASE, now),
            None => rig.snap_to(sample.camera),
        }

        let stage = self.timeline.stages().stage_at(self.progress);
        if stage != self.stage {
            log::debug!("Stage {} -> {stage} at progress {:.3}", self.stage, self.progress);
            self.stage = stage;
            host.set_stage_attribute(stage);
        }
    }
}

fn scroll_distance(factor: f32, viewport_height: f32) -> f32 {
    (factor * viewport_height).max(0.0)
}
