use hero_core::config::IdleMotion;
use hero_core::scene::ModelTransform;

/// Idle pose at ticker time `t`: a vertical bob and a yaw sway around the
/// rest transform, plus whatever the entrance animation still adds.
pub fn idle_transform(
    rest: ModelTransform,
    idle: &IdleMotion,
    intro_offset: f32,
    t: f64,
) -> ModelTransform {
    let mut transform = rest;
    transform.translation.y = rest.translation.y + intro_offset + idle.bob(t);
    transform.yaw = rest.yaw + idle.sway(t);
    transform
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use hero_core::config::HeroConfig;

    fn rest() -> ModelTransform {
        ModelTransform {
            translation: Vec3::new(-0.4, 0.6, -0.6),
            yaw: -0.16,
            scale: 0.5,
        }
    }

    #[test]
    fn idle_only_touches_height_and_yaw() {
        let idle = HeroConfig::default().robot.idle;
        let t = idle_transform(rest(), &idle, 0.0, 1.2);
        assert_eq!(t.translation.x, -0.4);
        assert_eq!(t.translation.z, -0.6);
        assert_eq!(t.scale, 0.5);
        assert!((t.translation.y - (0.6 + (1.2f32 * 1.3).sin() * 0.025)).abs() < 1e-6);
        assert!((t.yaw - (-0.16 + (1.2f32 * 0.46).sin() * 0.08)).abs() < 1e-6);
    }

    #[test]
    fn bob_stays_within_amplitude() {
        let idle = HeroConfig::default().human.idle;
        for i in 0..200 {
            let t = idle_transform(rest(), &idle, 0.0, i as f64 * 0.1);
            assert!((t.translation.y - 0.6).abs() <= 0.012 + 1e-6);
            assert!((t.yaw + 0.16).abs() <= 0.02 + 1e-6);
        }
    }

    #[test]
    fn intro_offset_shifts_the_height() {
        let t = idle_transform(rest(), &IdleMotion::default(), -0.35, 3.0);
        assert!((t.translation.y - 0.25).abs() < 1e-6);
        assert_eq!(t.yaw, -0.16);
    }
}
