use glam::Vec3;
use hero_core::camera_frame::CameraPose;
use hero_core::easing::Easing;
use hero_core::tween::ActiveTween;

/// Live camera position and look-at target, moved by tweens.
///
/// Each field holds at most one active tween. A new request replaces it and
/// starts from the current live value, so motion never jumps.
#[derive(Debug, Clone)]
pub struct CameraRig {
    position: Vec3,
    target: Vec3,
    position_tween: Option<ActiveTween<Vec3>>,
    target_tween: Option<ActiveTween<Vec3>>,
}

impl CameraRig {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            position: pose.position,
            target: pose.target,
            position_tween: None,
            target_tween: None,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target)
    }

    pub fn tween_to(&mut self, pose: CameraPose, duration: f64, ease: Easing, now: f64) {
        if duration <= 0.0 {
            self.snap_to(pose);
            return;
        }
        self.position_tween = Some(ActiveTween::new(self.position, pose.position, now, duration, ease));
        self.target_tween = Some(ActiveTween::new(self.target, pose.target, now, duration, ease));
    }

    /// Jump to `pose` and drop any running tweens.
    pub fn snap_to(&mut self, pose: CameraPose) {
        self.position_tween = None;
        self.target_tween = None;
        self.position = pose.position;
        self.target = pose.target;
    }

    pub fn stop(&mut self) {
        self.position_tween = None;
        self.target_tween = None;
    }

    pub fn is_animating(&self) -> bool {
        self.position_tween.is_some() || self.target_tween.is_some()
    }

    /// Advance both tweens to `now`. Returns true if the pose changed.
    pub fn step(&mut self, now: f64) -> bool {
        let moved_position = advance(&mut self.position, &mut self.position_tween, now);
        let moved_target = advance(&mut self.target, &mut self.target_tween, now);
        moved_position || moved_target
    }
}

fn advance(value: &mut Vec3, tween: &mut Option<ActiveTween<Vec3>>, now: f64) -> bool {
    let Some(active) = tween else {
        return false;
    };
    let next = active.value_at(now);
    if active.is_finished(now) {
        *tween = None;
    }
    let changed = next != *value;
    *value = next;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: f32) -> CameraPose {
        CameraPose::new(Vec3::new(x, 0.0, 0.0), Vec3::new(0.0, x, 0.0))
    }

    #[test]
    fn tween_reaches_its_destination() {
        let mut rig = CameraRig::new(pose(0.0));
        rig.tween_to(pose(4.0), 1.0, Easing::Power2InOut, 10.0);
        assert!(rig.step(10.5));
        let mid = rig.pose().position.x;
        assert!(mid > 0.0 && mid < 4.0);
        assert!(rig.step(11.0));
        assert_eq!(rig.pose(), pose(4.0));
        assert!(!rig.is_animating());
        assert!(!rig.step(12.0));
    }

    #[test]
    fn retarget_starts_from_the_live_value() {
        let mut rig = CameraRig::new(pose(0.0));
        rig.tween_to(pose(10.0), 1.0, Easing::Linear, 0.0);
        rig.step(0.5);
        let live = rig.pose().position.x;
        assert!((live - 5.0).abs() < 1e-5);

        rig.tween_to(pose(-2.0), 1.0, Easing::Linear, 0.5);
        rig.step(0.5);
        assert!((rig.pose().position.x - live).abs() < 1e-5);
        rig.step(1.5);
        assert_eq!(rig.pose(), pose(-2.0));
    }

    #[test]
    fn zero_duration_snaps() {
        let mut rig = CameraRig::new(pose(0.0));
        rig.tween_to(pose(3.0), 0.0, Easing::Linear, 0.0);
        assert_eq!(rig.pose(), pose(3.0));
        assert!(!rig.is_animating());
    }

    #[test]
    fn stop_freezes_the_pose() {
        let mut rig = CameraRig::new(pose(0.0));
        rig.tween_to(pose(3.0), 1.0, Easing::Linear, 0.0);
        rig.step(0.25);
        let frozen = rig.pose();
        rig.stop();
        assert!(!rig.step(5.0));
        assert_eq!(rig.pose(), frozen);
    }
}
