//! Deterministic interpolation primitives.
//!
//! Nothing here reads a wall clock. Callers inject the current time (seconds
//! from the frame ticker, or timeline units) so every result is reproducible.

use glam::Vec3;

use crate::easing::Easing;

const END_EPSILON: f32 = 1e-5;

/// Values that can be linearly interpolated.
pub trait Interpolate: Copy {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *other, t)
    }
}

/// `lerp(a, b, ease(t))`, with `t` clamped to the unit interval.
pub fn ease_lerp<T: Interpolate>(a: T, b: T, t: f32, ease: Easing) -> T {
    let k = ease.apply(t);
    if k >= 1.0 {
        return b;
    }
    a.lerp(&b, k)
}

/// One in-flight tween of a single field.
#[derive(Debug, Clone, Copy)]
pub struct ActiveTween<T: Interpolate> {
    pub from: T,
    pub to: T,
    pub start: f64,
    pub duration: f64,
    pub ease: Easing,
}

impl<T: Interpolate> ActiveTween<T> {
    pub fn new(from: T, to: T, start: f64, duration: f64, ease: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(0.0),
            ease,
        }
    }

    /// Normalized progress at `now`. Zero-length tweens are complete immediately.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, now: f64) -> T {
        ease_lerp(self.from, self.to, self.progress(now), self.ease)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A timed segment on a [`Track`], expressed in timeline units.
#[derive(Debug, Clone, Copy)]
pub struct Segment<T: Interpolate> {
    pub start: f32,
    pub duration: f32,
    pub ease: Easing,
    pub from: T,
    pub to: T,
}

impl<T: Interpolate> Segment<T> {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Ordered, non-overlapping segments animating one field.
///
/// Each segment's `from` is the previous segment's `to` (or the initial value)
/// unless an explicit start value was given, matching from/to semantics.
#[derive(Debug, Clone)]
pub struct Track<T: Interpolate> {
    initial: T,
    segments: Vec<Segment<T>>,
}

impl<T: Interpolate> Track<T> {
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            segments: Vec::new(),
        }
    }

    /// Initial value, before any segment starts.
    pub fn initial(&self) -> T {
        self.initial
    }

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Value at the end of the last segment.
    pub fn final_value(&self) -> T {
        self.segments.last().map_or(self.initial, |s| s.to)
    }

    /// Append a segment animating to `to`. `from` overrides the chained start
    /// value and, on the first segment, also becomes the initial value.
    pub fn push(
        &mut self,
        start: f32,
        duration: f32,
        ease: Easing,
        from: Option<T>,
        to: T,
    ) -> Result<(), String> {
        if duration < 0.0 || !duration.is_finite() || !start.is_finite() {
            return Err(format!(
                "Track segment at {start} has invalid duration {duration}"
            ));
        }
        if let Some(last) = self.segments.last() {
            if start + 1e-6 < last.end() {
                return Err(format!(
                    "Track segment at {start} overlaps previous segment ending at {}",
                    last.end()
                ));
            }
        } else if let Some(from) = from {
            self.initial = from;
        }
        let from = from.unwrap_or_else(|| self.final_value());
        self.segments.push(Segment {
            start,
            duration,
            ease,
            from,
            to,
        });
        Ok(())
    }

    /// Pure sample at time `t`. The latest segment that has started wins.
    pub fn sample(&self, t: f32) -> T {
        let Some(segment) = self.segments.iter().rev().find(|s| s.start <= t) else {
            return self.initial;
        };
        // Label offsets accumulate f32 rounding; treat "at the end" as done.
        if segment.duration <= 0.0 || t >= segment.end() - END_EPSILON {
            return segment.to;
        }
        ease_lerp(
            segment.from,
            segment.to,
            (t - segment.start) / segment.duration,
            segment.ease,
        )
    }

    pub fn end(&self) -> f32 {
        self.segments.last().map_or(0.0, Segment::end)
    }
}
