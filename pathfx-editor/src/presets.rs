//! Effect presets

use glam::{Vec3, Vec4};
use pathfx::config::{ColourRange, EmitterConfig, GlobalEffects, SteeringConfig, ValueRange};
use pathfx::emission::{EmissionConfig, EmissionShape};

pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: fn() -> EmitterConfig,
}

impl Preset {
    /// Look a preset up by name, ignoring case.
    pub fn find(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Fire",
        description: "Short-lived flames rising from a flat box, red to smoky grey",
        config: || EmitterConfig {
            particle_count: 400,
            emission: EmissionConfig {
                shape: EmissionShape::Cuboid,
                rate: 200.0,
                box_size: Vec3::new(20.0, 20.0, 2.0),
                ..Default::default()
            },
            initial_speed: ValueRange::new(20.0, 60.0),
            life: ValueRange::new(0.5, 1.5),
            size_begin: ValueRange::new(8.0, 14.0),
            size_end: ValueRange::new(1.0, 2.0),
            global: GlobalEffects {
                enabled: true,
                force: Vec3::ZERO,
                acceleration: Vec3::new(0.0, 0.0, 30.0),
            },
            ..Default::default()
        },
    },
    Preset {
        name: "Fountain",
        description: "Water thrown up a cone and pulled back down by gravity",
        config: || EmitterConfig {
            particle_count: 1000,
            emission: EmissionConfig {
                shape: EmissionShape::Frustum,
                rate: 300.0,
                frustum_radius_spawn: 0.5,
                frustum_radius_target: 2.0,
                frustum_height: 4.0,
                ..Default::default()
            },
            initial_speed: ValueRange::new(40.0, 50.0),
            life: ValueRange::new(2.0, 3.0),
            size_begin: ValueRange::new(2.0, 3.0),
            size_end: ValueRange::new(1.0, 1.5),
            global: GlobalEffects {
                enabled: true,
                force: Vec3::ZERO,
                acceleration: Vec3::new(0.0, -30.0, 0.0),
            },
            colour_begin: ColourRange::new(
                Vec4::new(0.6, 0.8, 1.0, 1.0),
                Vec4::new(0.3, 0.5, 1.0, 1.0),
            ),
            colour_end: ColourRange::new(
                Vec4::new(0.1, 0.2, 0.6, 0.0),
                Vec4::new(0.2, 0.3, 0.8, 0.0),
            ),
            ..Default::default()
        },
    },
    Preset {
        name: "Smoke",
        description: "Slow, growing puffs that drift upward and fade",
        config: || EmitterConfig {
            particle_count: 200,
            emission: EmissionConfig {
                shape: EmissionShape::Sphere,
                rate: 30.0,
                sphere_radius: 4.0,
                ..Default::default()
            },
            initial_speed: ValueRange::new(2.0, 6.0),
            life: ValueRange::new(4.0, 6.0),
            size_begin: ValueRange::new(4.0, 6.0),
            size_end: ValueRange::new(20.0, 30.0),
            mass: ValueRange::new(0.5, 1.0),
            global: GlobalEffects {
                enabled: true,
                force: Vec3::new(1.0, 0.0, 0.0),
                acceleration: Vec3::new(0.0, 3.0, 0.0),
            },
            colour_begin: ColourRange::new(
                Vec4::new(0.4, 0.4, 0.4, 0.8),
                Vec4::new(0.5, 0.5, 0.5, 0.8),
            ),
            colour_end: ColourRange::new(
                Vec4::new(0.2, 0.2, 0.2, 0.0),
                Vec4::new(0.3, 0.3, 0.3, 0.0),
            ),
            ..Default::default()
        },
    },
    Preset {
        name: "Sparkler",
        description: "Fast sparks from a point, capped in speed as they cool",
        config: || EmitterConfig {
            particle_count: 600,
            emission: EmissionConfig {
                shape: EmissionShape::Sphere,
                rate: 500.0,
                sphere_radius: 0.5,
                ..Default::default()
            },
            initial_speed: ValueRange::new(80.0, 150.0),
            life: ValueRange::new(0.3, 0.8),
            limit_speed_over_lifetime: true,
            speed_limit_begin: ValueRange::new(150.0, 150.0),
            speed_limit_end: ValueRange::new(5.0, 10.0),
            size_begin: ValueRange::new(1.0, 2.0),
            size_end: ValueRange::new(0.2, 0.5),
            colour_begin: ColourRange::new(
                Vec4::new(1.0, 1.0, 0.8, 1.0),
                Vec4::new(1.0, 0.9, 0.4, 1.0),
            ),
            colour_end: ColourRange::new(
                Vec4::new(1.0, 0.3, 0.0, 0.0),
                Vec4::new(0.8, 0.1, 0.0, 0.0),
            ),
            ..Default::default()
        },
    },
    Preset {
        name: "Snow",
        description: "Flakes falling from a wide box, drawn down toward a point",
        config: || EmitterConfig {
            particle_count: 2000,
            emission: EmissionConfig {
                shape: EmissionShape::Cuboid,
                rate: 150.0,
                box_size: Vec3::new(200.0, 2.0, 200.0),
                ..Default::default()
            },
            initial_speed: ValueRange::new(0.0, 2.0),
            life: ValueRange::new(8.0, 12.0),
            size_over_lifetime: false,
            size_begin: ValueRange::new(0.5, 1.5),
            size_end: ValueRange::new(0.5, 1.5),
            steering: SteeringConfig {
                seeking: true,
                gravitate_point: Vec3::new(0.0, -500.0, 0.0),
                gravitate_power: 200.0,
                gravitate_max: 10.0,
                ..Default::default()
            },
            global: GlobalEffects {
                enabled: false,
                ..Default::default()
            },
            colour_over_lifetime: false,
            colour_begin: ColourRange::new(Vec4::ONE, Vec4::new(0.9, 0.95, 1.0, 1.0)),
            ..Default::default()
        },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(Preset::find("fire").map(|p| p.name), Some("Fire"));
        assert_eq!(Preset::find("SNOW").map(|p| p.name), Some("Snow"));
        assert!(Preset::find("lava").is_none());
    }

    #[test]
    fn test_presets_are_sane() {
        for preset in PRESETS {
            let config = (preset.config)();
            assert!(config.particle_count > 0, "{}", preset.name);
            assert!(config.emission.rate > 0.0, "{}", preset.name);
            assert!(config.life.min > 0.0, "{}", preset.name);
        }
    }
}
