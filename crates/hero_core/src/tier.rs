//! Device tiers selected once at startup from environment signals.
//! Tiers tune presentation cost and pacing; they never change stage semantics.

/// Viewports narrower than this use the narrow camera frames.
pub const NARROW_VIEWPORT_MAX_WIDTH: f32 = 768.0;

/// Snapshot of what the host environment reports about the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSignals {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub device_pixel_ratio: f32,
    /// Primary pointer is coarse (touch).
    pub coarse_pointer: bool,
    pub hardware_concurrency: Option<u32>,
    /// Device memory hint in gigabytes.
    pub device_memory_gb: Option<f32>,
    pub prefers_reduced_motion: bool,
    pub page_visible: bool,
}

impl Default for EnvironmentSignals {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            device_pixel_ratio: 1.0,
            coarse_pointer: false,
            hardware_concurrency: None,
            device_memory_gb: None,
            prefers_reduced_motion: false,
            page_visible: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Narrow,
    #[default]
    Wide,
}

impl DeviceClass {
    pub fn from_viewport_width(width: f32) -> Self {
        if width < NARROW_VIEWPORT_MAX_WIDTH {
            Self::Narrow
        } else {
            Self::Wide
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerTier {
    #[default]
    Standard,
    /// Touch devices with few cores or little memory, or any very small CPU.
    LowPower,
}

impl PowerTier {
    pub const ALL: &'static [PowerTier] = &[PowerTier::Standard, PowerTier::LowPower];

    pub fn detect(signals: &EnvironmentSignals) -> Self {
        let few_cores = signals.hardware_concurrency.is_some_and(|c| c <= 4);
        let tiny_cpu = signals.hardware_concurrency.is_some_and(|c| c <= 2);
        let low_memory = signals.device_memory_gb.is_some_and(|m| m <= 4.0);
        if tiny_cpu || (signals.coarse_pointer && (few_cores || low_memory)) {
            Self::LowPower
        } else {
            Self::Standard
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::LowPower => "low-power",
        }
    }

    pub fn pixel_ratio_cap(self) -> f32 {
        match self {
            Self::Standard => 2.0,
            Self::LowPower => 1.5,
        }
    }

    pub fn antialias(self) -> bool {
        matches!(self, Self::Standard)
    }

    /// Pinned scroll distance in viewport heights.
    pub fn scroll_distance_factor(self) -> f32 {
        match self {
            Self::Standard => 3.4,
            Self::LowPower => 2.8,
        }
    }

    /// Seconds the camera takes to catch up with the scroll position.
    pub fn scrub_seconds(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::LowPower => 0.6,
        }
    }
}

impl std::fmt::Display for PowerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything derived from [`EnvironmentSignals`] at init.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    pub power: PowerTier,
    pub pixel_ratio_cap: f32,
    pub antialias: bool,
    pub scroll_distance_factor: f32,
    pub scrub_seconds: f64,
    pub reduced_motion: bool,
    /// Wheel-driven step interaction needs a fine pointer.
    pub step_mode_allowed: bool,
}

impl DeviceProfile {
    pub fn from_signals(signals: &EnvironmentSignals) -> Self {
        let power = PowerTier::detect(signals);
        let reduced_motion = signals.prefers_reduced_motion;
        Self {
            class: DeviceClass::from_viewport_width(signals.viewport_width),
            power,
            pixel_ratio_cap: power.pixel_ratio_cap(),
            antialias: power.antialias(),
            scroll_distance_factor: power.scroll_distance_factor(),
            scrub_seconds: if reduced_motion {
                0.0
            } else {
                power.scrub_seconds()
            },
            reduced_motion,
            step_mode_allowed: !signals.coarse_pointer,
        }
    }

    /// Device pixel ratio after the tier cap. Non-positive ratios read as 1.
    pub fn pixel_ratio(&self, device_pixel_ratio: f32) -> f32 {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        ratio.min(self.pixel_ratio_cap)
    }

    /// Scale applied to scripted durations; zero under reduced motion.
    pub fn duration_scale(&self) -> f64 {
        if self.reduced_motion {
            0.0
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_below_breakpoint() {
        assert_eq!(DeviceClass::from_viewport_width(767.0), DeviceClass::Narrow);
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Wide);
    }

    #[test]
    fn desktop_defaults_to_standard() {
        let profile = DeviceProfile::from_signals(&EnvironmentSignals::default());
        assert_eq!(profile.power, PowerTier::Standard);
        assert!(profile.antialias);
        assert!(profile.step_mode_allowed);
        assert_eq!(profile.pixel_ratio(3.0), 2.0);
        assert_eq!(profile.scroll_distance_factor, 3.4);
    }

    #[test]
    fn weak_touch_device_is_low_power() {
        let signals = EnvironmentSignals {
            viewport_width: 390.0,
            coarse_pointer: true,
            hardware_concurrency: Some(4),
            ..EnvironmentSignals::default()
        };
        let profile = DeviceProfile::from_signals(&signals);
        assert_eq!(profile.class, DeviceClass::Narrow);
        assert_eq!(profile.power, PowerTier::LowPower);
        assert!(!profile.antialias);
        assert!(!profile.step_mode_allowed);
        assert_eq!(profile.pixel_ratio(3.0), 1.5);
    }

    #[test]
    fn dual_core_desktop_is_low_power() {
        let signals = EnvironmentSignals {
            hardware_concurrency: Some(2),
            ..EnvironmentSignals::default()
        };
        assert_eq!(PowerTier::detect(&signals), PowerTier::LowPower);
    }

    #[test]
    fn reduced_motion_zeroes_scripted_durations() {
        let signals = EnvironmentSignals {
            prefers_reduced_motion: true,
            ..EnvironmentSignals::default()
        };
        let profile = DeviceProfile::from_signals(&signals);
        assert_eq!(profile.scrub_seconds, 0.0);
        assert_eq!(profile.duration_scale(), 0.0);
    }

    #[test]
    fn invalid_pixel_ratio_reads_as_one() {
        let profile = DeviceProfile::from_signals(&EnvironmentSignals::default());
        assert_eq!(profile.pixel_ratio(0.0), 1.0);
    }

    #[test]
    fn display_matches_label() {
        for &tier in PowerTier::ALL {
            assert_eq!(format!("{}", tier), tier.label());
        }
    }
}
