//! Particle emitters.
//!
//! An [`Emitter`] owns a fixed pool of [`Particle`]s, its configuration, its
//! transform, the spatial path particles may follow and three motion graphs
//! that shape particles over their lifetime.
//!
//! # Tick order
//!
//! [`Emitter::update`] runs once per frame:
//!
//! 1. Spin the emitter by `rotational_velocity * dt` and refresh its world
//!    matrix from the parent.
//! 2. Advance playback. A finite duration that has run out stops emission;
//!    a looping emitter kills its particles and restarts once the loop delay
//!    has also passed.
//! 3. Walk the pool in slot order. Live particles are updated; dead ones are
//!    respawned while the emission budget `floor(emission_time * rate)`
//!    lasts, and are updated in the same tick.
//!
//! # Motion graphs
//!
//! | Graph | Drives | Enabled by |
//! |-------|--------|------------|
//! | size | `size_begin -> size_end` | `size_over_lifetime` |
//! | speed | speed limit `begin -> end` | `limit_speed_over_lifetime` |
//! | colour | `colour_begin -> colour_end` | `colour_over_lifetime` |
//!
//! Each graph is sampled at the particle's normalized life; the result is
//! the blend factor between the particle's begin and end values.
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = Emitter::new(EmitterConfig::default());
//! emitter.set_path(builder.rebuild().clone());
//!
//! loop {
//!     emitter.update(1.0 / 60.0, Mat4::IDENTITY);
//!     renderer.upload(emitter.instance_bytes());
//! }
//! ```

use glam::{Mat4, Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{EmitterConfig, ValueRange};
use crate::math::lerp;
use crate::particle::Particle;
use crate::render::{ParticleInstance, RenderSink};
use crate::steering::{self, Corridor, FollowMode, DEFAULT_MIN_RANGE};
use crate::table::PathTable;
use crate::transform::Transform;

/// Largest particle pool an emitter allocates. Larger requests are capped.
pub const MAX_PARTICLES: usize = 1_000_000;

/// Bring a config within what an emitter runs: the pool is capped at
/// [`MAX_PARTICLES`] and a duration that is not positive becomes `None`.
pub(crate) fn normalize_config(config: &mut EmitterConfig) {
    if config.particle_count > MAX_PARTICLES {
        log::warn!(
            "particle pool of {} capped at {MAX_PARTICLES}",
            config.particle_count
        );
        config.particle_count = MAX_PARTICLES;
    }
    config.playback.duration = config.playback.duration.filter(|d| *d > 0.0);
}

/// A particle pool plus everything needed to spawn into and animate it.
#[derive(Clone, Debug)]
pub struct Emitter {
    config: EmitterConfig,
    transform: Transform,
    world_matrix: Mat4,

    path: PathTable<Vec3>,
    size_graph: PathTable<f32>,
    speed_graph: PathTable<f32>,
    colour_graph: PathTable<f32>,

    particles: Vec<Particle>,
    /// Unspent emission time in seconds.
    emission_time: f32,
    /// Playback countdown; only meaningful with a finite duration.
    time_remaining: f32,
    rng: StdRng,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter {
    /// Create an emitter with an entropy-seeded random source.
    pub fn new(config: EmitterConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an emitter with a fixed seed, for reproducible runs.
    pub fn with_seed(config: EmitterConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut config: EmitterConfig, rng: StdRng) -> Self {
        normalize_config(&mut config);
        let particles = vec![Particle::default(); config.particle_count];
        let time_remaining = config.playback.duration.unwrap_or(0.0);
        Self {
            config,
            transform: Transform::default(),
            world_matrix: Mat4::IDENTITY,
            path: PathTable::new(),
            size_graph: PathTable::identity(),
            speed_graph: PathTable::identity(),
            colour_graph: PathTable::identity(),
            particles,
            emission_time: 0.0,
            time_remaining,
            rng,
        }
    }

    /// Reassemble an emitter from decoded parts. The pool starts dead.
    pub fn from_parts(
        config: EmitterConfig,
        transform: Transform,
        path: PathTable<Vec3>,
        size_graph: PathTable<f32>,
        speed_graph: PathTable<f32>,
        colour_graph: PathTable<f32>,
    ) -> Self {
        let mut emitter = Self::new(config);
        emitter.transform = transform;
        emitter.world_matrix = transform.matrix();
        emitter.path = path;
        emitter.size_graph = size_graph;
        emitter.speed_graph = speed_graph;
        emitter.colour_graph = colour_graph;
        emitter
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Replace the whole configuration.
    ///
    /// A changed particle count reallocates the pool (see
    /// [`set_particle_count`](Self::set_particle_count)). The playback
    /// countdown restarts. The pool size is capped at [`MAX_PARTICLES`] and
    /// a duration that is not positive is stored as `None`.
    pub fn set_config(&mut self, mut config: EmitterConfig) {
        normalize_config(&mut config);
        let count = config.particle_count;
        self.time_remaining = config.playback.duration.unwrap_or(0.0);
        self.config = config;
        if count != self.particles.len() {
            self.set_particle_count(count);
        }
    }

    /// Resize the particle pool.
    ///
    /// The pool is rebuilt from scratch: every existing particle is lost,
    /// including live ones. Counts above [`MAX_PARTICLES`] are capped.
    pub fn set_particle_count(&mut self, count: usize) {
        let count = count.min(MAX_PARTICLES);
        log::debug!(
            "reallocating particle pool: {} -> {} slots",
            self.particles.len(),
            count
        );
        self.particles = vec![Particle::default(); count];
        self.config.particle_count = count;
    }

    pub fn set_life_range(&mut self, min: f32, max: f32) {
        self.config.life = ValueRange::new(min, max);
    }

    pub fn set_size_range_begin(&mut self, min: f32, max: f32) {
        self.config.size_begin = ValueRange::new(min, max);
    }

    pub fn set_size_range_end(&mut self, min: f32, max: f32) {
        self.config.size_end = ValueRange::new(min, max);
    }

    // ========================================================================
    // Transform and tables
    // ========================================================================

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Parent matrix times the emitter's own matrix, as of the last update.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn path(&self) -> &PathTable<Vec3> {
        &self.path
    }

    /// Install a new path. Particles keep their distance along the path but
    /// drop their cached lookup position.
    pub fn set_path(&mut self, path: PathTable<Vec3>) {
        if !steering::can_follow(&path) {
            log::warn!(
                "path with {} samples and length {} cannot be followed",
                path.sample_count(),
                path.total_length()
            );
        }
        self.path = path;
        for particle in &mut self.particles {
            particle.path_cursor = Default::default();
        }
    }

    pub fn size_graph(&self) -> &PathTable<f32> {
        &self.size_graph
    }

    pub fn set_size_graph(&mut self, graph: PathTable<f32>) {
        self.size_graph = graph;
    }

    pub fn speed_graph(&self) -> &PathTable<f32> {
        &self.speed_graph
    }

    pub fn set_speed_graph(&mut self, graph: PathTable<f32>) {
        self.speed_graph = graph;
    }

    pub fn colour_graph(&self) -> &PathTable<f32> {
        &self.colour_graph
    }

    pub fn set_colour_graph(&mut self, graph: PathTable<f32>) {
        self.colour_graph = graph;
    }

    // ========================================================================
    // Pool queries
    // ========================================================================

    /// Every slot, dead or alive.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn live_particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live_particles().count()
    }

    /// Position of the particle in slot `index`.
    pub fn particle_position(&self, index: usize) -> Option<Vec3> {
        self.particles.get(index).map(Particle::position)
    }

    /// Unspent emission time in seconds.
    pub fn emission_time(&self) -> f32 {
        self.emission_time
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Mark every particle dead.
    pub fn kill_particles(&mut self) {
        for particle in &mut self.particles {
            particle.kill();
        }
    }

    /// Kill everything and restart playback from the beginning.
    pub fn restart(&mut self) {
        self.kill_particles();
        self.emission_time = 0.0;
        self.time_remaining = self.config.playback.duration.unwrap_or(0.0);
    }

    /// Advance the emitter and its particles by `dt` seconds.
    ///
    /// `parent` is the world matrix of whatever the emitter is attached to.
    pub fn update(&mut self, dt: f32, parent: Mat4) {
        let spin = self.config.rotational_velocity * dt;
        if spin != Vec3::ZERO {
            self.transform.rotate(spin);
        }
        self.world_matrix = parent * self.transform.matrix();

        if !self.config.playback.playing || self.particles.is_empty() {
            return;
        }

        self.advance_playback(dt);

        let rate = self.config.emission.rate;
        let mut budget = if rate > 0.0 {
            (self.emission_time * rate).floor().max(0.0) as usize
        } else {
            0
        };

        let tick = Tick {
            config: &self.config,
            transform: &self.transform,
            world_matrix: self.world_matrix,
            path: &self.path,
            size_graph: &self.size_graph,
            speed_graph: &self.speed_graph,
            colour_graph: &self.colour_graph,
        };

        for particle in &mut self.particles {
            if !particle.is_alive() {
                if budget == 0 {
                    continue;
                }
                tick.spawn(&mut self.rng, particle);
                budget -= 1;
                self.emission_time -= 1.0 / rate;
            }
            tick.update_particle(particle, dt);
        }
    }

    fn advance_playback(&mut self, dt: f32) {
        self.emission_time += dt;
        self.time_remaining -= dt;

        let playback = self.config.playback;
        let Some(duration) = playback.duration.filter(|d| *d > 0.0) else {
            return;
        };
        if self.time_remaining < 0.0 {
            self.emission_time = 0.0;
            if playback.looping && self.time_remaining < -playback.loop_delay {
                log::debug!("emitter loop restart after {duration}s");
                self.kill_particles();
                self.time_remaining = duration;
            }
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Feed every live particle to `sink`.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for particle in self.live_particles() {
            sink.particle(&particle.world_matrix, particle.colour);
        }
    }

    /// Feed every sample of this emitter's path to `sink`.
    pub fn render_path<S: RenderSink + ?Sized>(&self, colour: Vec4, sink: &mut S) {
        crate::render::render_path(&self.path, colour, sink);
    }

    /// Instance records for every live particle.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.live_particles()
            .map(|p| ParticleInstance::new(p.world_matrix, p.colour))
            .collect()
    }

    /// Instance records as raw bytes, ready for a vertex buffer.
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances()).to_vec()
    }
}

/// Read-only view of an emitter shared by every particle in one tick.
struct Tick<'a> {
    config: &'a EmitterConfig,
    transform: &'a Transform,
    world_matrix: Mat4,
    path: &'a PathTable<Vec3>,
    size_graph: &'a PathTable<f32>,
    speed_graph: &'a PathTable<f32>,
    colour_graph: &'a PathTable<f32>,
}

impl Tick<'_> {
    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, p: &mut Particle) {
        let config = self.config;

        p.colour_begin = config.colour_begin.sample(rng);
        p.colour_end = config.colour_end.sample(rng);

        p.lifespan = config.life.sample(rng);
        p.life = p.lifespan;

        // One draw couples mass and size.
        let heft = rng.gen::<f32>();
        p.mass = config.mass.lerp(heft);
        p.size_begin = config.size_begin.lerp(heft);
        p.size_end = config.size_end.lerp(heft);

        let sample = config.emission.sample(rng);
        let speed = config.initial_speed.sample(rng);
        let mut velocity = sample.direction * speed;
        let mut position = sample.position + config.emitter_offset;

        p.speed_limit_begin = config.speed_limit_begin.sample(rng);
        p.speed_limit_end = config.speed_limit_end.sample(rng);

        p.distance_along_path = 0.0;
        p.path_cursor = Default::default();
        p.force = Vec3::ZERO;
        p.acceleration = Vec3::ZERO;

        if !config.parent_transforms {
            velocity = self.transform.rotation_matrix().transform_vector3(velocity);
            position = self.world_matrix.transform_point3(position);
        }
        p.velocity = velocity;

        p.transform = Transform::default();
        p.transform.set_position(position);
        p.transform.set_uniform_scale(p.size_begin);
        p.colour = p.colour_begin;
    }

    fn update_particle(&self, p: &mut Particle, dt: f32) {
        let config = self.config;
        let position = p.position();
        let velocity = p.velocity;

        let s = &config.steering;
        if s.seeking {
            p.force += steering::seek(position, s.seek_point, s.seek_force);
            p.force += steering::gravitate(
                position,
                s.gravitate_point,
                s.gravitate_power,
                s.gravitate_max,
                DEFAULT_MIN_RANGE,
            );
            p.force += steering::attract(
                position,
                s.attract_point,
                s.attract_force,
                s.attract_range,
                DEFAULT_MIN_RANGE,
            );
        }
        if s.steering {
            p.force += steering::steer(position, velocity, s.steer_point, s.steer_force, s.steer_max);
            p.force += steering::arrive(
                position,
                velocity,
                s.arrive_point,
                s.arrive_force,
                s.arrive_range,
                s.arrive_max,
            );
        }

        if config.global.enabled {
            p.force += config.global.force;
            p.acceleration += config.global.acceleration;
        }

        let mut placed_on_path = false;
        match config.path.mode {
            FollowMode::Off => {}
            FollowMode::Corridor => {
                let corridor = Corridor {
                    look_ahead: config.path.look_ahead,
                    radius: config.path.radius,
                    power: config.path.power,
                };
                p.force += steering::corridor_steer(
                    self.path,
                    &corridor,
                    position,
                    velocity,
                    dt,
                    &mut p.distance_along_path,
                    &mut p.path_cursor,
                );
            }
            FollowMode::Direct => {
                if let Some(on_path) = steering::direct_follow(
                    self.path,
                    config.path.power,
                    dt,
                    &mut p.distance_along_path,
                    &mut p.path_cursor,
                ) {
                    p.transform.set_position(on_path);
                    placed_on_path = true;
                }
            }
        }

        let life = p.normalized_life();
        if config.size_over_lifetime {
            let t = self.size_graph.sample_normalized(life);
            p.transform.set_uniform_scale(lerp(p.size_begin, p.size_end, t));
        }
        if config.colour_over_lifetime {
            let t = self.colour_graph.sample_normalized(life);
            p.colour = p.colour_begin.lerp(p.colour_end, t);
        }

        if placed_on_path {
            p.force = Vec3::ZERO;
            p.acceleration = Vec3::ZERO;
        } else {
            p.integrate(dt);
            if config.limit_speed_over_lifetime {
                let t = self.speed_graph.sample_normalized(life);
                p.limit_speed(lerp(p.speed_limit_begin, p.speed_limit_end, t));
            }
            p.advance(dt);
        }

        p.world_matrix = if config.parent_transforms {
            self.world_matrix * p.transform.matrix()
        } else {
            p.transform.matrix()
        };

        p.life -= dt;
    }
}
