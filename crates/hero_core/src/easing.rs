//! Named easing curves.
//!
//! Every curve maps `[0, 1]` onto `[0, 1]`, is continuous, monotonic
//! non-decreasing, and hits both endpoints exactly. Inputs outside the unit
//! interval are clamped first, so callers can pass raw `elapsed / duration`.

use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Easing {
    #[serde(rename = "linear", alias = "none")]
    Linear,
    #[serde(rename = "power2.in")]
    Power2In,
    #[serde(rename = "power2.out")]
    Power2Out,
    #[default]
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    #[serde(rename = "power3.out")]
    Power3Out,
    #[serde(rename = "sine.inOut")]
    SineInOut,
}

impl Easing {
    pub const ALL: &'static [Easing] = &[
        Easing::Linear,
        Easing::Power2In,
        Easing::Power2Out,
        Easing::Power2InOut,
        Easing::Power3Out,
        Easing::SineInOut,
    ];

    /// Look up a curve by the name used in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Power2In => "power2.in",
            Self::Power2Out => "power2.out",
            Self::Power2InOut => "power2.inOut",
            Self::Power3Out => "power3.out",
            Self::SineInOut => "sine.inOut",
        }
    }

    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        // Pin the endpoints so settled tweens land exactly on their targets.
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::Power2In => t * t * t,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
            Self::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
        }
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for &ease in Easing::ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease} at 0");
            assert_eq!(ease.apply(1.0), 1.0, "{ease} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for &ease in Easing::ALL {
            let mut prev = 0.0;
            for i in 0..=1000 {
                let v = ease.apply(i as f32 / 1000.0);
                assert!(v + 1e-6 >= prev, "{ease} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::Power2InOut.apply(-3.0), 0.0);
        assert_eq!(Easing::Power2InOut.apply(7.5), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 0.0);
    }

    #[test]
    fn in_out_is_symmetric_around_midpoint() {
        let e = Easing::Power2InOut;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.2) + e.apply(0.8) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn from_name_round_trips_every_curve() {
        for &ease in Easing::ALL {
            assert_eq!(Easing::from_name(ease.name()), Some(ease));
        }
        assert_eq!(Easing::from_name("elastic.out"), None);
    }

    #[test]
    fn deserializes_from_config_names() {
        let ease: Easing = serde_json::from_str("\"power2.out\"").expect("valid easing");
        assert_eq!(ease, Easing::Power2Out);
        let ease: Easing = serde_json::from_str("\"none\"").expect("alias");
        assert_eq!(ease, Easing::Linear);
    }
}
