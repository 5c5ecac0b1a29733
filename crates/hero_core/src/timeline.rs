//! Declarative scroll timeline.
//!
//! The timeline is a set of tracks laid out in timeline units, with one label
//! per stage. Scroll progress maps linearly onto `[0, duration]`; sampling is
//! a pure function of that position.

use glam::Vec3;

use crate::camera_frame::{CameraFrames, CameraPose};
use crate::easing::Easing;
use crate::section::{SectionEffect, SectionId, SectionStyle};
use crate::stage::{Stage, StageMap, STAGE_SPAN};
use crate::tween::Track;

/// Camera move between consecutive labels.
const CAMERA_EASE: Easing = Easing::Power2InOut;

/// Everything the timeline drives at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSample {
    pub camera: CameraPose,
    pub sections: Vec<(SectionId, SectionStyle)>,
}

impl TimelineSample {
    pub fn section(&self, id: SectionId) -> Option<SectionStyle> {
        self.sections
            .iter()
            .find(|(section, _)| *section == id)
            .map(|(_, style)| *style)
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    stages: StageMap,
    camera_position: Track<Vec3>,
    camera_target: Track<Vec3>,
    sections: Vec<(SectionId, Track<SectionStyle>)>,
}

impl Timeline {
    pub fn build(
        stages: StageMap,
        frames: &CameraFrames,
        effects: &[SectionEffect],
    ) -> Result<Self, String> {
        let first = frames.pose(stages.first());
        let mut camera_position = Track::new(first.position);
        let mut camera_target = Track::new(first.target);
        for pair in stages.stages().windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let pose = frames.pose(to);
            camera_position.push(from.offset(), STAGE_SPAN, CAMERA_EASE, None, pose.position)?;
            camera_target.push(from.offset(), STAGE_SPAN, CAMERA_EASE, None, pose.target)?;
        }

        let mut sections: Vec<(SectionId, Track<SectionStyle>)> = Vec::new();
        for effect in effects {
            if !stages.contains(effect.stage) {
                continue;
            }
            if sections.iter().any(|(id, _)| *id == effect.section) {
                return Err(format!(
                    "Section '{}' has more than one effect entry",
                    effect.section
                ));
            }
            let mut track = Track::new(SectionStyle::SHOWN);
            if let Some(enter) = effect.enter.filter(|_| effect.stage != stages.first()) {
                let anchor = Stage::from_index(effect.stage.index() - 1)
                    .map_or(0.0, Stage::offset);
                track
                    .push(
                        anchor + enter.delay,
                        enter.duration,
                        enter.ease,
                        Some(enter.style),
                        SectionStyle::SHOWN,
                    )
                    .map_err(|e| format!("Section '{}' enter: {e}", effect.section))?;
            }
            if let Some(exit) = effect.exit.filter(|_| effect.stage != stages.last()) {
                track
                    .push(
                        effect.stage.offset() + exit.delay,
                        exit.duration,
                        exit.ease,
                        None,
                        exit.style,
                    )
                    .map_err(|e| format!("Section '{}' exit: {e}", effect.section))?;
            }
            if track.end() > stages.duration() + 1e-4 {
                return Err(format!(
                    "Section '{}' animates past the last label ({} > {})",
                    effect.section,
                    track.end(),
                    stages.duration()
                ));
            }
            sections.push((effect.section, track));
        }

        Ok(Self {
            stages,
            camera_position,
            camera_target,
            sections,
        })
    }

    pub fn stages(&self) -> &StageMap {
        &self.stages
    }

    pub fn duration(&self) -> f32 {
        self.stages.duration()
    }

    /// Timeline position for a scroll progress in `[0, 1]`.
    pub fn time_at(&self, progress: f32) -> f32 {
        progress.clamp(0.0, 1.0) * self.duration()
    }

    pub fn sample(&self, time: f32) -> TimelineSample {
        TimelineSample {
            camera: CameraPose::new(
                self.camera_position.sample(time),
                self.camera_target.sample(time),
            ),
            sections: self
                .sections
                .iter()
                .map(|(id, track)| (*id, track.sample(time)))
                .collect(),
        }
    }

    pub fn sample_progress(&self, progress: f32) -> TimelineSample {
        self.sample(self.time_at(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::default_section_effects;
    use crate::tier::DeviceClass;

    fn timeline(count: usize) -> (Timeline, CameraFrames) {
        let frames = CameraFrames::for_class(DeviceClass::Wide);
        let map = StageMap::new(count).expect("stage map");
        let timeline = Timeline::build(map, &frames, &default_section_effects()).expect("build");
        (timeline, frames)
    }

    #[test]
    fn camera_endpoints_match_first_and_last_frames() {
        for count in 2..=3 {
            let (timeline, frames) = timeline(count);
            let last = timeline.stages().last();
            assert_eq!(timeline.sample_progress(0.0).camera, frames.pose(Stage::Stage1));
            assert_eq!(timeline.sample_progress(1.0).camera, frames.pose(last));
        }
    }

    #[test]
    fn camera_passes_through_middle_label() {
        let (timeline, frames) = timeline(3);
        assert_eq!(timeline.sample_progress(0.5).camera, frames.pose(Stage::Stage2));
    }

    #[test]
    fn initial_section_styles() {
        let (timeline, _) = timeline(3);
        let start = timeline.sample(0.0);
        assert_eq!(start.section(SectionId::Intro), Some(SectionStyle::SHOWN));
        assert_eq!(start.section(SectionId::Access), Some(SectionStyle::hidden(12.0)));
        assert_eq!(start.section(SectionId::Pricing), Some(SectionStyle::hidden(10.0)));
    }

    #[test]
    fn sections_swap_across_the_sequence() {
        let (timeline, _) = timeline(3);
        let mid = timeline.sample(1.5);
        assert!(!mid.section(SectionId::Intro).expect("intro").visible());
        assert_eq!(mid.section(SectionId::Access), Some(SectionStyle::SHOWN));

        let end = timeline.sample(3.0);
        assert!(!end.section(SectionId::Access).expect("access").visible());
        assert_eq!(end.section(SectionId::Pricing), Some(SectionStyle::SHOWN));
        let intro = end.section(SectionId::Intro).expect("intro");
        assert_eq!(intro.scale, 0.74);
        assert_eq!(intro.y_percent, -10.0);
    }

    #[test]
    fn two_stage_layout_drops_pricing_and_keeps_access_shown() {
        let (timeline, _) = timeline(2);
        assert_eq!(timeline.duration(), 1.5);
        let end = timeline.sample_progress(1.0);
        assert!(end.section(SectionId::Pricing).is_none());
        assert_eq!(end.section(SectionId::Access), Some(SectionStyle::SHOWN));
    }

    #[test]
    fn duplicate_section_entries_are_rejected() {
        let frames = CameraFrames::for_class(DeviceClass::Wide);
        let mut effects = default_section_effects();
        effects.push(effects[0]);
        let err = Timeline::build(StageMap::new(3).expect("map"), &frames, &effects)
            .expect_err("duplicate should fail");
        assert!(err.contains("more than one"));
    }

    #[test]
    fn effects_past_the_last_label_are_rejected() {
        let frames = CameraFrames::for_class(DeviceClass::Wide);
        let mut effects = default_section_effects();
        if let Some(enter) = effects[2].enter.as_mut() {
            enter.duration = 5.0;
        }
        let err = Timeline::build(StageMap::new(3).expect("map"), &frames, &effects)
            .expect_err("overlong effect should fail");
        assert!(err.contains("past the last label"));
    }
}
