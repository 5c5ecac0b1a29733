//! Directional label snapping for continuous scroll.

use hero_core::config::SnapConfig;

/// Progress closer than this to a label counts as already on it.
pub const ON_LABEL_EPSILON: f32 = 1e-4;

/// Label to settle on after scrolling stops at `progress`.
///
/// Moving down (`direction > 0`) picks the next label at or after the
/// progress, moving up the previous one at or before it. Without a direction
/// the nearest label wins. Returns `None` when already on a label.
pub fn directional_target(progress: f32, direction: f32, labels: &[f32]) -> Option<f32> {
    if labels.iter().any(|l| (l - progress).abs() < ON_LABEL_EPSILON) {
        return None;
    }
    if direction > 0.0 {
        labels.iter().copied().find(|&l| l >= progress)
    } else if direction < 0.0 {
        labels.iter().rev().copied().find(|&l| l <= progress)
    } else {
        labels.iter().copied().min_by(|a, b| {
            (a - progress)
                .abs()
                .total_cmp(&(b - progress).abs())
        })
    }
}

/// Snap duration for a move of `distance` progress units, proportional to
/// the widest gap between labels and clamped to the configured range.
pub fn snap_duration(distance: f32, labels: &[f32], snap: &SnapConfig) -> f64 {
    let widest = labels
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold(0.0f32, f32::max);
    if widest <= 0.0 {
        return snap.min_duration;
    }
    let ratio = f64::from(distance.abs() / widest);
    (snap.min_duration + (snap.max_duration - snap.min_duration) * ratio)
        .clamp(snap.min_duration, snap.max_duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [f32; 3] = [0.0, 0.5, 1.0];

    #[test]
    fn snaps_forward_when_scrolling_down() {
        assert_eq!(directional_target(0.1, 1.0, &LABELS), Some(0.5));
        assert_eq!(directional_target(0.6, 1.0, &LABELS), Some(1.0));
    }

    #[test]
    fn snaps_back_when_scrolling_up() {
        assert_eq!(directional_target(0.45, -1.0, &LABELS), Some(0.0));
        assert_eq!(directional_target(0.9, -1.0, &LABELS), Some(0.5));
    }

    #[test]
    fn no_snap_when_on_a_label() {
        assert_eq!(directional_target(0.5, 1.0, &LABELS), None);
        assert_eq!(directional_target(0.50005, -1.0, &LABELS), None);
        assert_eq!(directional_target(1.0, 1.0, &LABELS), None);
    }

    #[test]
    fn undirected_snap_picks_nearest() {
        assert_eq!(directional_target(0.3, 0.0, &LABELS), Some(0.5));
        assert_eq!(directional_target(0.2, 0.0, &LABELS), Some(0.0));
    }

    #[test]
    fn duration_scales_with_distance_within_bounds() {
        let snap = SnapConfig::default();
        assert!((snap_duration(0.0, &LABELS, &snap) - 0.4).abs() < 1e-9);
        assert!((snap_duration(0.5, &LABELS, &snap) - 0.9).abs() < 1e-6);
        let quarter = snap_duration(0.25, &LABELS, &snap);
        assert!((quarter - 0.65).abs() < 1e-6);
        assert!((snap_duration(2.0, &LABELS, &snap) - 0.9).abs() < 1e-9);
    }
}
