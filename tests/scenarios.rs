//! End-to-end scenarios.
//!
//! These drive the public API the way an editor or game would: build a
//! path, hand it to emitters, tick them, and push the result through the
//! file formats.

use pathfx::persistence;
use pathfx::prelude::*;
use pathfx::render::CollectSink;
use pathfx::{GlobalEffects, PathFollow, PersistenceError};

fn quiet_config() -> EmitterConfig {
    let mut config = EmitterConfig::default();
    config.global = GlobalEffects {
        enabled: false,
        ..GlobalEffects::default()
    };
    config.initial_speed = ValueRange::constant(0.0);
    config
}

fn zigzag_builder() -> PathBuilder {
    let mut builder = PathBuilder::new();
    builder.add_linear(Vec3::ZERO);
    builder.add_linear(Vec3::new(10.0, 0.0, 0.0));
    builder.add_linear(Vec3::new(10.0, 10.0, 0.0));
    builder
}

// ============================================================================
// Emission
// ============================================================================

#[test]
fn test_steady_rate_fills_pool_one_per_tick() {
    let mut config = quiet_config();
    config.particle_count = 100;
    config.emission.rate = 10.0;
    config.life = ValueRange::constant(5.0);

    let mut emitter = Emitter::with_seed(config, 11);
    for _ in 0..10 {
        emitter.update(0.1, Mat4::IDENTITY);
    }

    assert_eq!(emitter.live_count(), 10);

    let mut lives: Vec<f32> = emitter.live_particles().map(|p| p.life).collect();
    lives.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!((lives[0] - 4.0).abs() < 1e-4, "oldest {}", lives[0]);
    assert!((lives[9] - 4.9).abs() < 1e-4, "newest {}", lives[9]);
}

#[test]
fn test_particles_retire_after_lifespan() {
    let mut config = quiet_config();
    config.particle_count = 8;
    config.emission.rate = 1000.0;
    config.life = ValueRange::constant(0.25);

    let mut emitter = Emitter::with_seed(config, 5);
    emitter.update(0.1, Mat4::IDENTITY);
    assert_eq!(emitter.live_count(), 8);

    let mut stopped = emitter.config().clone();
    stopped.emission.rate = 0.0;
    emitter.set_config(stopped);
    for _ in 0..3 {
        emitter.update(0.1, Mat4::IDENTITY);
    }
    assert_eq!(emitter.live_count(), 0);
}

#[test]
fn test_finite_duration_stops_emitting() {
    let mut config = quiet_config();
    config.emission.rate = 20.0;
    config.life = ValueRange::constant(100.0);
    config.playback = Playback {
        playing: true,
        looping: false,
        loop_delay: 0.0,
        duration: Some(0.5),
    };

    let mut emitter = Emitter::with_seed(config, 2);
    for _ in 0..60 {
        emitter.update(1.0 / 60.0, Mat4::IDENTITY);
    }
    let after_one_second = emitter.live_count();
    for _ in 0..60 {
        emitter.update(1.0 / 60.0, Mat4::IDENTITY);
    }

    assert!(after_one_second > 0);
    assert!(after_one_second <= 11);
    assert_eq!(emitter.live_count(), after_one_second);
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_linear_path_length_and_lookup() {
    let mut builder = zigzag_builder();
    let path = builder.rebuild().clone();

    assert_eq!(path.interval_count(), 2);
    assert!((path.total_length() - 20.0).abs() < 1e-4);

    let mid = path.lookup_value(15.0);
    assert!(mid.abs_diff_eq(Vec3::new(10.0, 5.0, 0.0), 1e-4));
    assert_eq!(path.lookup_value(-3.0), Vec3::ZERO);
    assert!(path.lookup_value(99.0).abs_diff_eq(Vec3::new(10.0, 10.0, 0.0), 1e-4));
}

#[test]
fn test_identity_graph_returns_query() {
    let graph = PathTable::identity();
    for x in [0.0, 0.25, 0.5, 0.9] {
        assert!((graph.sample_normalized(x) - x).abs() < 1e-6);
    }
}

#[test]
fn test_direct_follow_walks_the_path() {
    let mut builder = zigzag_builder();
    let mut config = quiet_config();
    config.particle_count = 1;
    config.emission.rate = 1000.0;
    config.life = ValueRange::constant(50.0);
    config.path.mode = FollowMode::Direct;
    // Direct mode moves at the follow power in units per second.
    config.path.power = 5.0;

    let mut emitter = Emitter::with_seed(config, 9);
    emitter.set_path(builder.rebuild().clone());

    for _ in 0..20 {
        emitter.update(0.1, Mat4::IDENTITY);
    }

    // 2 seconds at 5 units/s is 10 units: the corner.
    let position = emitter.particle_position(0).unwrap();
    assert!(position.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-3), "{position}");
}

/// A single unit-mass particle spawned at `offset` that follows the zigzag
/// in corridor mode.
fn corridor_emitter(offset: Vec3, power: f32) -> Emitter {
    let mut builder = zigzag_builder();
    let mut config = quiet_config();
    config.particle_count = 1;
    config.emission.rate = 1000.0;
    config.emission.box_size = Vec3::ZERO;
    config.emitter_offset = offset;
    config.life = ValueRange::constant(50.0);
    config.mass = ValueRange::constant(1.0);
    config.path = PathFollow {
        mode: FollowMode::Corridor,
        look_ahead: 2.0,
        radius: 0.5,
        power,
    };

    let mut emitter = Emitter::with_seed(config, 21);
    emitter.set_path(builder.rebuild().clone());
    emitter
}

#[test]
fn test_corridor_pulls_stray_particle_back() {
    let mut emitter = corridor_emitter(Vec3::new(3.0, 4.0, 0.0), 20.0);
    emitter.update(0.05, Mat4::IDENTITY);

    let mut previous = emitter.particle_position(0).unwrap();
    assert!(previous.y <= 4.0);
    for _ in 0..5 {
        emitter.update(0.05, Mat4::IDENTITY);
        let position = emitter.particle_position(0).unwrap();
        assert!(position.y < previous.y, "{position} after {previous}");
        previous = position;
    }

    let particle = &emitter.particles()[0];
    assert!(particle.velocity.y < 0.0);
    assert!(particle.distance_along_path > 0.0);
}

#[test]
fn test_corridor_particle_progresses_along_path() {
    let mut emitter = corridor_emitter(Vec3::new(0.0, 1.0, 0.0), 4.0);

    let dt = 1.0 / 60.0;
    for _ in 0..120 {
        emitter.update(dt, Mat4::IDENTITY);
        let position = emitter.particle_position(0).unwrap();
        let distance = emitter.particles()[0].distance_along_path;
        assert!(position.y.abs() <= 1.5, "{position}");
        assert!(position.z.abs() < 1e-4, "{position}");
        assert!((0.0..=20.0).contains(&distance), "{distance}");
    }

    let position = emitter.particle_position(0).unwrap();
    assert!(position.x > 1.0, "{position}");
    assert!(emitter.particles()[0].distance_along_path > 1.0);
}

#[test]
fn test_render_contract_sees_live_particles_and_path() {
    let mut builder = zigzag_builder();
    let mut config = quiet_config();
    config.particle_count = 16;
    config.emission.rate = 1000.0;

    let mut system = ParticleSystem::new();
    let mut emitter = Emitter::with_seed(config, 4);
    emitter.set_path(builder.rebuild().clone());
    system.add_emitter(emitter);
    system.update(0.1, Mat4::IDENTITY);

    let mut sink = CollectSink::default();
    system.render(&mut sink);
    system.render_paths(Vec4::ONE, &mut sink);

    assert_eq!(sink.particles.len(), system.live_count());
    assert_eq!(sink.path_samples.len(), builder.table().sample_count());
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_system_file_round_trip() {
    let mut builder = zigzag_builder();
    let mut config = quiet_config();
    config.emission.shape = EmissionShape::Frustum;
    config.path.mode = FollowMode::Corridor;

    let mut emitter = Emitter::with_seed(config.clone(), 1);
    emitter.set_path(builder.rebuild().clone());
    emitter.transform_mut().set_position(Vec3::new(1.0, 2.0, 3.0));
    emitter.set_size_graph(PathTable::curve(&[(0.0, 1.0), (1.0, 0.0)]).unwrap());

    let system = ParticleSystem::from_emitters(vec![emitter, Emitter::with_seed(config, 2)]);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("effect.pfxs");
    persistence::save_system(&file, &system).unwrap();
    let loaded = persistence::load_system(&file).unwrap();

    assert_eq!(loaded.len(), 2);
    let first = loaded.emitter(0).unwrap();
    assert_eq!(first.config(), system.emitter(0).unwrap().config());
    assert_eq!(first.transform().position(), Vec3::new(1.0, 2.0, 3.0));
    assert!((first.path().total_length() - 20.0).abs() < 1e-4);
    assert_eq!(first.size_graph().sample_normalized(0.5), 0.5);
    assert_eq!(first.live_count(), 0);
}

#[test]
fn test_truncated_files_are_rejected() {
    let mut builder = zigzag_builder();
    let bytes = persistence::encode_path(builder.rebuild());

    for len in 0..bytes.len() {
        assert!(persistence::decode_path(&bytes[..len]).is_err(), "prefix {len}");
    }
    assert!(persistence::decode_path(&bytes).is_ok());
}

#[test]
fn test_wrong_file_kind_is_rejected() {
    let bytes = persistence::encode_graph(&PathTable::identity());
    assert!(matches!(
        persistence::decode_path(&bytes),
        Err(PersistenceError::InvalidMagic { .. })
    ));
}
