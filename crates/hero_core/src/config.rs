//! Hero scene configuration (JSON).
//!
//! Every field has a default, so `{}` is a complete configuration. Files are
//! validated after parsing so runtime code can trust ranges without extra
//! branching.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::easing::Easing;
use crate::scene::ModelSlot;
use crate::section::{default_section_effects, SectionEffect};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Scroll scrubs the timeline continuously, with directional snap.
    #[default]
    Continuous,
    /// Each wheel gesture advances exactly one stage.
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct IdleMotion {
    #[serde(default)]
    pub bob_frequency: f32,
    #[serde(default)]
    pub bob_amplitude: f32,
    #[serde(default)]
    pub bob_phase: f32,
    #[serde(default)]
    pub sway_frequency: f32,
    #[serde(default)]
    pub sway_amplitude: f32,
    #[serde(default)]
    pub sway_phase: f32,
}

impl IdleMotion {
    /// Vertical offset at time `t` seconds.
    pub fn bob(&self, t: f64) -> f32 {
        ((t as f32) * self.bob_frequency + self.bob_phase).sin() * self.bob_amplitude
    }

    /// Yaw offset at time `t` seconds.
    pub fn sway(&self, t: f64) -> f32 {
        ((t as f32) * self.sway_frequency + self.sway_phase).sin() * self.sway_amplitude
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelSpec {
    pub url: String,
    /// Model height in world units after placement.
    pub target_height: f32,
    /// Added to the normalized origin (centered x/z, feet at y = 0).
    pub base_offset: [f32; 3],
    #[serde(default)]
    pub rest_yaw: f32,
    #[serde(default)]
    pub idle: IdleMotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub enabled: bool,
    pub min_duration: f64,
    pub max_duration: f64,
    /// Quiet time after the last scroll event before snapping.
    pub delay: f64,
    pub ease: Easing,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_duration: 0.4,
            max_duration: 0.9,
            delay: 0.02,
            ease: Easing::Power2InOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    pub duration: f64,
    pub ease: Easing,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            duration: 0.9,
            ease: Easing::Power2InOut,
        }
    }
}

/// Entrance animation played once per model after placement.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub duration: f64,
    /// How far below its rest height a model starts.
    pub rise: f32,
    pub ease: Easing,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            duration: 0.9,
            rise: 0.35,
            ease: Easing::Power2Out,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 34.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub canvas_selector: String,
    pub pinned_selector: String,
    pub stage_count: usize,
    pub interaction: InteractionMode,
    pub robot: ModelSpec,
    pub human: ModelSpec,
    pub snap: SnapConfig,
    pub step: StepConfig,
    pub intro: IntroConfig,
    pub lens: LensConfig,
    pub exposure: f32,
    pub clear_color: [f32; 4],
    pub sections: Vec<SectionEffect>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.robot-3D".to_string(),
            pinned_selector: ".hero_main".to_string(),
            stage_count: Stage::ALL.len(),
            interaction: InteractionMode::Continuous,
            robot: ModelSpec {
                url: "/Meshy_AI_Cyber_Sentinel_Superi_0215162113_texture.glb".to_string(),
                target_height: 2.55,
                base_offset: [-0.42, -0.98, -0.62],
                rest_yaw: -0.16,
                idle: IdleMotion {
                    bob_frequency: 1.3,
                    bob_amplitude: 0.025,
                    bob_phase: 0.0,
                    sway_frequency: 0.46,
                    sway_amplitude: 0.08,
                    sway_phase: 0.0,
                },
            },
            human: ModelSpec {
                url: "/male_09_official.glb".to_string(),
                target_height: 1.9,
                base_offset: [0.4, -1.34, 0.84],
                rest_yaw: 0.12,
                idle: IdleMotion {
                    bob_frequency: 1.05,
                    bob_amplitude: 0.012,
                    bob_phase: 0.7,
                    sway_frequency: 0.34,
                    sway_amplitude: 0.02,
                    sway_phase: 0.0,
                },
            },
            snap: SnapConfig::default(),
            step: StepConfig::default(),
            intro: IntroConfig::default(),
            lens: LensConfig::default(),
            exposure: 1.28,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            sections: default_section_effects(),
        }
    }
}

impl HeroConfig {
    pub fn model(&self, slot: ModelSlot) -> &ModelSpec {
        match slot {
            ModelSlot::Robot => &self.robot,
            ModelSlot::Human => &self.human,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(2..=Stage::ALL.len()).contains(&self.stage_count) {
            return Err(format!(
                "Config validation failed: stage_count must be 2 or 3, got {}",
                self.stage_count
            ));
        }
        for &slot in ModelSlot::ALL {
            let spec = self.model(slot);
            if spec.url.is_empty() {
                return Err(format!("Config validation failed: {slot} url is empty"));
            }
            if !(spec.target_height > 0.0) {
                return Err(format!(
                    "Config validation failed: {slot} target_height must be > 0"
                ));
            }
        }
        if self.snap.min_duration < 0.0 || self.snap.min_duration > self.snap.max_duration {
            return Err(
                "Config validation failed: snap durations must satisfy 0 <= min <= max"
                    .to_string(),
            );
        }
        if self.snap.delay < 0.0 || self.step.duration < 0.0 || self.intro.duration < 0.0 {
            return Err("Config validation failed: durations must be >= 0".to_string());
        }
        if !(self.lens.fov_y_deg > 0.0 && self.lens.fov_y_deg < 180.0) {
            return Err("Config validation failed: fov_y_deg must be in (0, 180)".to_string());
        }
        if !(self.lens.near > 0.0 && self.lens.near < self.lens.far) {
            return Err("Config validation failed: lens needs 0 < near < far".to_string());
        }
        if self.canvas_selector.is_empty() {
            log::warn!("Config has an empty canvas_selector; init will fail on most hosts.");
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<HeroConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: HeroConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hero_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn empty_object_yields_defaults() {
        let path = temp_file_path("empty");
        fs::write(&path, "{}").expect("write temp file");
        let config = load_config_from_path(&path).expect("empty config is valid");
        assert_eq!(config, HeroConfig::default());
        assert_eq!(config.stage_count, 3);
        assert_eq!(config.robot.target_height, 2.55);
        assert_eq!(config.human.idle.bob_phase, 0.7);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{ "stage_count": 2, "interaction": "step", "snap": { "max_duration": 1.2 } }"#,
        )
        .expect("write temp file");
        let config = load_config_from_path(&path).expect("should parse");
        assert_eq!(config.stage_count, 2);
        assert_eq!(config.interaction, InteractionMode::Step);
        assert_eq!(config.snap.max_duration, 1.2);
        assert_eq!(config.snap.min_duration, 0.4);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_bad_stage_count() {
        let path = temp_file_path("stages");
        fs::write(&path, r#"{ "stage_count": 5 }"#).expect("write temp file");
        let err = load_config_from_path(&path).expect_err("should fail");
        assert!(err.contains("stage_count"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_inverted_snap_bounds() {
        let config = HeroConfig {
            snap: SnapConfig {
                min_duration: 1.0,
                max_duration: 0.5,
                ..SnapConfig::default()
            },
            ..HeroConfig::default()
        };
        assert!(config.validate().expect_err("should fail").contains("snap"));
    }

    #[test]
    fn rejects_non_positive_target_height() {
        let mut config = HeroConfig::default();
        config.human.target_height = 0.0;
        assert!(config
            .validate()
            .expect_err("should fail")
            .contains("target_height"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_config_from_path(&path).expect_err("missing file");
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn idle_motion_is_zero_at_rest_phase() {
        let idle = HeroConfig::default().robot.idle;
        assert_eq!(idle.bob(0.0), 0.0);
        assert_eq!(idle.sway(0.0), 0.0);
        let human = HeroConfig::default().human.idle;
        assert!(human.bob(0.0) > 0.0);
    }
}
