//! Mesh loading seam, model placement, and per-slot model state.

use glam::Vec3;
use hero_core::config::{IntroConfig, ModelSpec};
use hero_core::scene::{Bounds, MeshBundle, ModelSlot, ModelTransform};
use hero_core::tween::ActiveTween;

use crate::error::AssetLoadError;

/// Heights at or below this are treated as flat and left unscaled.
const DEGENERATE_HEIGHT: f32 = 1e-6;

/// A finished load, tagged with the token it was requested under.
#[derive(Debug, Clone)]
pub struct LoadCompletion {
    pub slot: ModelSlot,
    pub token: u64,
    pub result: Result<MeshBundle, AssetLoadError>,
}

/// Asynchronous source of mesh bundles.
///
/// `request` must return without blocking; results surface later from `poll`,
/// in any order.
pub trait MeshLoader {
    fn request(&mut self, slot: ModelSlot, url: &str, token: u64);

    fn poll(&mut self) -> Vec<LoadCompletion>;
}

/// Scale the bundle to the configured target height, stand it on y = 0 centered
/// in x/z, then shift by the base offset.
pub fn place_model(bounds: Bounds, spec: &ModelSpec) -> ModelTransform {
    let height = bounds.size().y;
    let scale = if height <= DEGENERATE_HEIGHT {
        log::warn!("Model {} has a flat bounding box; keeping unit scale", spec.url);
        1.0
    } else {
        spec.target_height / height
    };
    let center = bounds.center() * scale;
    let min_y = bounds.min.y * scale;
    ModelTransform {
        translation: Vec3::new(-center.x, -min_y, -center.z) + Vec3::from_array(spec.base_offset),
        yaw: spec.rest_yaw,
        scale,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    Absent,
    Loading,
    Intro,
    Ready,
    Failed,
}

impl ModelState {
    pub fn is_present(self) -> bool {
        matches!(self, Self::Intro | Self::Ready)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ModelRecord {
    state: ModelState,
    rest: ModelTransform,
    intro: Option<ActiveTween<f32>>,
    intro_offset: f32,
}

/// Lifecycle bookkeeping for both model slots.
#[derive(Debug, Default)]
pub struct ModelSlots {
    records: [ModelRecord; 2],
}

impl ModelSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, slot: ModelSlot) -> ModelState {
        self.records[slot.index()].state
    }

    pub fn rest(&self, slot: ModelSlot) -> Option<ModelTransform> {
        let record = &self.records[slot.index()];
        record.state.is_present().then_some(record.rest)
    }

    /// Vertical offset the entrance animation currently adds.
    pub fn intro_offset(&self, slot: ModelSlot) -> f32 {
        self.records[slot.index()].intro_offset
    }

    pub fn begin_loading(&mut self, slot: ModelSlot) {
        self.records[slot.index()].state = ModelState::Loading;
    }

    pub fn fail(&mut self, slot: ModelSlot) {
        self.records[slot.index()] = ModelRecord {
            state: ModelState::Failed,
            ..ModelRecord::default()
        };
    }

    /// Record a placed model and start its entrance. With `animate` false the
    /// model goes straight to `Ready` at its rest transform.
    pub fn place(
        &mut self,
        slot: ModelSlot,
        rest: ModelTransform,
        intro: &IntroConfig,
        animate: bool,
        now: f64,
    ) {
        let record = &mut self.records[slot.index()];
        record.rest = rest;
        if animate && intro.duration > 0.0 {
            record.intro = Some(ActiveTween::new(-intro.rise, 0.0, now, intro.duration, intro.ease));
            record.intro_offset = -intro.rise;
            record.state = ModelState::Intro;
        } else {
            record.intro = None;
            record.intro_offset = 0.0;
            record.state = ModelState::Ready;
        }
    }

    /// Step running entrance animations. Returns true if any offset moved.
    pub fn advance_intros(&mut self, now: f64) -> bool {
        let mut changed = false;
        for record in &mut self.records {
            let Some(tween) = record.intro else {
                continue;
            };
            let offset = tween.value_at(now);
            changed |= offset != record.intro_offset;
            record.intro_offset = offset;
            if tween.is_finished(now) {
                record.intro = None;
                record.intro_offset = 0.0;
                record.state = ModelState::Ready;
            }
        }
        changed
    }

    pub fn release(&mut self, slot: ModelSlot) {
        self.records[slot.index()] = ModelRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::config::HeroConfig;

    fn spec(target_height: f32, base_offset: [f32; 3]) -> ModelSpec {
        ModelSpec {
            url: "/test.glb".to_string(),
            target_height,
            base_offset,
            rest_yaw: 0.25,
            idle: Default::default(),
        }
    }

    fn bounds(min: [f32; 3], max: [f32; 3]) -> Bounds {
        Bounds {
            min: Vec3::from_array(min),
            max: Vec3::from_array(max),
        }
    }

    fn placed_bounds(b: Bounds, t: &ModelTransform) -> (Vec3, Vec3) {
        // yaw is ignored here; it rotates about the model origin after placement.
        (b.min * t.scale + t.translation, b.max * t.scale + t.translation)
    }

    #[test]
    fn placement_normalizes_height_and_origin() {
        let b = bounds([3.0, 10.0, -7.0], [5.0, 14.0, -1.0]);
        let t = place_model(b, &spec(2.0, [0.0, 0.0, 0.0]));
        assert!((t.scale - 0.5).abs() < 1e-6);
        let (min, max) = placed_bounds(b, &t);
        assert!(min.y.abs() < 1e-5);
        assert!((max.y - 2.0).abs() < 1e-5);
        assert!((min.x + max.x).abs() < 1e-5);
        assert!((min.z + max.z).abs() < 1e-5);
        assert_eq!(t.yaw, 0.25);
    }

    #[test]
    fn placement_is_shape_invariant() {
        let a = bounds([-1.0, 0.0, -1.0], [1.0, 4.0, 1.0]);
        let b = bounds([100.0, -50.0, 20.0], [101.0, -30.0, 22.0]);
        let s = spec(2.55, [-0.42, -0.98, -0.62]);
        for b in [a, b] {
            let t = place_model(b, &s);
            let (min, max) = placed_bounds(b, &t);
            assert!((min.y - -0.98).abs() < 1e-4);
            assert!((max.y - min.y - 2.55).abs() < 1e-4);
            assert!(((min.x + max.x) * 0.5 - -0.42).abs() < 1e-4);
            assert!(((min.z + max.z) * 0.5 - -0.62).abs() < 1e-4);
        }
    }

    #[test]
    fn flat_bounds_keep_unit_scale() {
        let t = place_model(bounds([0.0, 1.0, 0.0], [2.0, 1.0, 2.0]), &spec(1.9, [0.0; 3]));
        assert_eq!(t.scale, 1.0);
        assert!((t.translation.y - -1.0).abs() < 1e-6);
    }

    #[test]
    fn intro_rises_to_rest_then_reports_ready() {
        let intro = HeroConfig::default().intro;
        let mut slots = ModelSlots::new();
        slots.begin_loading(ModelSlot::Robot);
        assert_eq!(slots.state(ModelSlot::Robot), ModelState::Loading);
        assert!(slots.rest(ModelSlot::Robot).is_none());

        slots.place(ModelSlot::Robot, ModelTransform::default(), &intro, true, 1.0);
        assert_eq!(slots.state(ModelSlot::Robot), ModelState::Intro);
        assert_eq!(slots.intro_offset(ModelSlot::Robot), -0.35);

        assert!(slots.advance_intros(1.3));
        let mid = slots.intro_offset(ModelSlot::Robot);
        assert!(mid > -0.35 && mid < 0.0);

        slots.advance_intros(1.0 + intro.duration);
        assert_eq!(slots.state(ModelSlot::Robot), ModelState::Ready);
        assert_eq!(slots.intro_offset(ModelSlot::Robot), 0.0);
        assert!(!slots.advance_intros(5.0));
    }

    #[test]
    fn placement_without_animation_is_ready_at_rest() {
        let mut slots = ModelSlots::new();
        slots.place(
            ModelSlot::Human,
            ModelTransform::default(),
            &IntroConfig::default(),
            false,
            0.0,
        );
        assert_eq!(slots.state(ModelSlot::Human), ModelState::Ready);
        assert_eq!(slots.intro_offset(ModelSlot::Human), 0.0);
    }

    #[test]
    fn placed_slots_are_present_as_soon_as_place_returns() {
        let instant = IntroConfig {
            duration: 0.0,
            ..IntroConfig::default()
        };
        for (intro, animate, expected) in [
            (IntroConfig::default(), true, ModelState::Intro),
            (instant, true, ModelState::Ready),
            (IntroConfig::default(), false, ModelState::Ready),
        ] {
            let mut slots = ModelSlots::new();
            slots.begin_loading(ModelSlot::Robot);
            slots.place(ModelSlot::Robot, ModelTransform::default(), &intro, animate, 0.0);
            let state = slots.state(ModelSlot::Robot);
            assert_eq!(state, expected);
            assert!(state.is_present());
            assert!(slots.rest(ModelSlot::Robot).is_some());
        }
    }

    #[test]
    fn failure_and_release_clear_the_slot() {
        let mut slots = ModelSlots::new();
        slots.fail(ModelSlot::Human);
        assert_eq!(slots.state(ModelSlot::Human), ModelState::Failed);
        assert!(!slots.state(ModelSlot::Human).is_present());
        slots.release(ModelSlot::Human);
        assert_eq!(slots.state(ModelSlot::Human), ModelState::Absent);
    }
}
