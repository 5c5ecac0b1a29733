//! Content sections of the pinned region and the effects that reveal or hide
//! them as the sequence moves between stages.

use serde::Deserialize;

use crate::easing::Easing;
use crate::stage::Stage;
use crate::tween::Interpolate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Intro,
    Access,
    Pricing,
}

impl SectionId {
    pub const ALL: &'static [SectionId] = &[SectionId::Intro, SectionId::Access, SectionId::Pricing];

    pub fn label(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Access => "access",
            Self::Pricing => "pricing",
        }
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation state of a section. `y_percent` is a vertical offset in
/// percent of the section's own height.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SectionStyle {
    pub opacity: f32,
    pub y_percent: f32,
    pub scale: f32,
}

impl SectionStyle {
    pub const SHOWN: SectionStyle = SectionStyle {
        opacity: 1.0,
        y_percent: 0.0,
        scale: 1.0,
    };

    pub const fn hidden(y_percent: f32) -> Self {
        Self {
            opacity: 0.0,
            y_percent,
            scale: 1.0,
        }
    }

    /// Fully transparent sections are also taken out of hit testing.
    pub fn visible(&self) -> bool {
        self.opacity > 0.0
    }
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self::SHOWN
    }
}

impl Interpolate for SectionStyle {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity.lerp(&other.opacity, t),
            y_percent: self.y_percent.lerp(&other.y_percent, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

/// A timed style change relative to a stage label.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SectionTransition {
    /// Timeline units after the anchoring label.
    pub delay: f32,
    pub duration: f32,
    #[serde(default)]
    pub ease: Easing,
    /// Start style for an entrance, end style for an exit.
    pub style: SectionStyle,
}

/// How one section enters while moving into `stage` and exits while moving
/// out of it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SectionEffect {
    pub section: SectionId,
    pub stage: Stage,
    #[serde(default)]
    pub enter: Option<SectionTransition>,
    #[serde(default)]
    pub exit: Option<SectionTransition>,
}

/// The stock stage -> section table.
pub fn default_section_effects() -> Vec<SectionEffect> {
    vec![
        SectionEffect {
            section: SectionId::Intro,
            stage: Stage::Stage1,
            enter: None,
            exit: Some(SectionTransition {
                delay: 0.03,
                duration: 1.0,
                ease: Easing::Power2InOut,
                style: SectionStyle {
                    opacity: 0.0,
                    y_percent: -10.0,
                    scale: 0.74,
                },
            }),
        },
        SectionEffect {
            section: SectionId::Access,
            stage: Stage::Stage2,
            enter: Some(SectionTransition {
                delay: 0.5,
                duration: 1.0,
                ease: Easing::Power2Out,
                style: SectionStyle::hidden(12.0),
            }),
            exit: Some(SectionTransition {
                delay: 0.25,
                duration: 0.85,
                ease: Easing::Power2InOut,
                style: SectionStyle::hidden(-11.0),
            }),
        },
        SectionEffect {
            section: SectionId::Pricing,
            stage: Stage::Stage3,
            enter: Some(SectionTransition {
                delay: 0.6,
                duration: 0.9,
                ease: Easing::Power2Out,
                style: SectionStyle::hidden(10.0),
            }),
            exit: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_each_section_once() {
        let table = default_section_effects();
        for &id in SectionId::ALL {
            assert_eq!(table.iter().filter(|e| e.section == id).count(), 1, "{id}");
        }
    }

    #[test]
    fn style_lerp_blends_every_field() {
        let a = SectionStyle::hidden(12.0);
        let mid = a.lerp(&SectionStyle::SHOWN, 0.5);
        assert_eq!(mid.opacity, 0.5);
        assert_eq!(mid.y_percent, 6.0);
        assert_eq!(mid.scale, 1.0);
        assert!(mid.visible());
        assert!(!a.visible());
    }

    #[test]
    fn partial_style_json_fills_shown_defaults() {
        let style: SectionStyle = serde_json::from_str(r#"{ "opacity": 0.0 }"#).expect("parse");
        assert_eq!(style, SectionStyle::hidden(0.0));
    }

    #[test]
    fn effect_json_parses() {
        let effect: SectionEffect = serde_json::from_str(
            r#"{
              "section": "access",
              "stage": "stage2",
              "enter": { "delay": 0.5, "duration": 1.0, "ease": "power2.out", "style": { "opacity": 0.0, "y_percent": 12.0 } }
            }"#,
        )
        .expect("parse");
        assert_eq!(effect.section, SectionId::Access);
        assert_eq!(effect.stage, Stage::Stage2);
        assert!(effect.exit.is_none());
        assert_eq!(effect.enter.expect("enter").ease, Easing::Power2Out);
    }
}
