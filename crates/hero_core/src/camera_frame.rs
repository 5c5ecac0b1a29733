use glam::Vec3;

use crate::stage::Stage;
use crate::tier::DeviceClass;

/// Camera eye position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }
}

/// Per-stage camera poses for one device class. Immutable once selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrames {
    stage1: CameraPose,
    stage2: CameraPose,
    stage3: CameraPose,
}

const NARROW: CameraFrames = CameraFrames {
    stage1: CameraPose::new(Vec3::new(0.04, 1.04, 9.1), Vec3::new(0.02, 0.04, 0.08)),
    stage2: CameraPose::new(Vec3::new(0.1, 1.16, 2.2), Vec3::new(0.08, 1.02, 0.24)),
    stage3: CameraPose::new(Vec3::new(0.68, 1.4, 0.92), Vec3::new(1.38, 1.7, -2.4)),
};

const WIDE: CameraFrames = CameraFrames {
    stage1: CameraPose::new(Vec3::new(0.02, 1.08, 7.9), Vec3::new(0.0, 0.03, 0.06)),
    stage2: CameraPose::new(Vec3::new(0.16, 1.15, 1.62), Vec3::new(0.05, 1.02, 0.34)),
    stage3: CameraPose::new(Vec3::new(0.84, 1.52, 0.56), Vec3::new(1.48, 1.8, -2.8)),
};

impl CameraFrames {
    pub fn for_class(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Narrow => NARROW,
            DeviceClass::Wide => WIDE,
        }
    }

    pub fn pose(&self, stage: Stage) -> CameraPose {
        match stage {
            Stage::Stage1 => self.stage1,
            Stage::Stage2 => self.stage2,
            Stage::Stage3 => self.stage3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_has_a_pose_for_both_classes() {
        for class in [DeviceClass::Narrow, DeviceClass::Wide] {
            let frames = CameraFrames::for_class(class);
            for &stage in Stage::ALL {
                let pose = frames.pose(stage);
                assert!(pose.position.is_finite());
                assert!(pose.target.is_finite());
            }
        }
    }

    #[test]
    fn narrow_frames_pull_the_camera_back() {
        let narrow = CameraFrames::for_class(DeviceClass::Narrow).pose(Stage::Stage1);
        let wide = CameraFrames::for_class(DeviceClass::Wide).pose(Stage::Stage1);
        assert!(narrow.position.z > wide.position.z);
    }
}
