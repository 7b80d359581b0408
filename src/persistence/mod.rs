//! Binary persistence for paths, motion graphs, emitters and systems.
//!
//! Every file is a 4-byte magic, a 1-byte format version and a body. All
//! numbers are little-endian; bools take one byte.
//!
//! | Magic | Body |
//! |-------|------|
//! | `PFXP` | one `PathTable<Vec3>` |
//! | `PFXG` | one `PathTable<f32>` motion graph |
//! | `PFXE` | one emitter record |
//! | `PFXS` | emitter count (`i32`) then that many emitter records |
//!
//! An emitter record is the configuration field block, the transform
//! (position, rotation, scale, then translation, rotation, scale and local
//! matrices) and four tables: path, size graph, speed graph, colour graph.
//!
//! A table is an interval count (`i32`); per interval a sample count (`i32`)
//! and the samples `{value, local_param, cumulative_distance}`; then the
//! stored total length (`f32`).
//!
//! Decoding never panics and never returns partial results: a file either
//! decodes completely or yields a [`PersistenceError`].

mod format;
mod reader;
mod writer;

pub use format::*;
pub use reader::ByteReader;
pub use writer::ByteWriter;

use std::path::Path;

use glam::{Vec3, Vec4};
use thiserror::Error;

use crate::config::{
    ColourRange, EmitterConfig, GlobalEffects, PathFollow, Playback, SteeringConfig, ValueRange,
};
use crate::emission::{EmissionConfig, EmissionShape};
use crate::emitter::Emitter;
use crate::error::PathFxError;
use crate::steering::FollowMode;
use crate::system::ParticleSystem;
use crate::table::{PathTable, TableEntry, TableValue};
use crate::transform::Transform;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    #[error("invalid file magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported format version {found} (this build reads {expected})")]
    UnsupportedVersion { expected: u8, found: u8 },

    #[error("truncated data")]
    TruncatedData,

    #[error("negative {what} count: {count}")]
    NegativeCount { what: &'static str, count: i32 },

    #[error("unknown emission shape id {0}")]
    UnknownShape(i32),

    #[error("particle pool of {0} exceeds the limit of {MAX_PARTICLES}")]
    PoolTooLarge(i32),

    #[error("interval {interval} has {samples} samples, at least 2 are required")]
    ShortInterval { interval: usize, samples: usize },

    #[error("{0} unexpected bytes after the last record")]
    TrailingBytes(usize),
}

// ============================================================================
// Table values
// ============================================================================

/// Table value types with a fixed binary encoding.
pub trait SampleValue: TableValue {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn write(&self, writer: &mut ByteWriter);
    fn read(reader: &mut ByteReader) -> Result<Self, PersistenceError>;
}

impl SampleValue for f32 {
    const SIZE: usize = 4;

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_f32(*self);
    }

    fn read(reader: &mut ByteReader) -> Result<Self, PersistenceError> {
        reader.read_f32()
    }
}

impl SampleValue for Vec3 {
    const SIZE: usize = 12;

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_vec3(*self);
    }

    fn read(reader: &mut ByteReader) -> Result<Self, PersistenceError> {
        reader.read_vec3()
    }
}

pub fn write_table<T: SampleValue>(writer: &mut ByteWriter, table: &PathTable<T>) {
    writer.write_count(table.interval_count());
    for interval in table.intervals() {
        writer.write_count(interval.len());
        for entry in interval {
            entry.value.write(writer);
            writer.write_f32(entry.local_param);
            writer.write_f32(entry.cumulative_distance);
        }
    }
    writer.write_f32(table.total_length());
}

pub fn read_table<T: SampleValue>(reader: &mut ByteReader) -> Result<PathTable<T>, PersistenceError> {
    let sample_size = T::SIZE + 8;
    // Each interval needs at least its count plus two samples.
    let interval_count = reader.read_count("interval", 4 + 2 * sample_size)?;

    let mut intervals = Vec::with_capacity(interval_count);
    for interval in 0..interval_count {
        let samples = reader.read_count("sample", sample_size)?;
        if samples < 2 {
            return Err(PersistenceError::ShortInterval { interval, samples });
        }
        let mut entries = Vec::with_capacity(samples);
        for _ in 0..samples {
            let value = T::read(reader)?;
            let local_param = reader.read_f32()?;
            let cumulative_distance = reader.read_f32()?;
            entries.push(TableEntry::with_distance(value, local_param, cumulative_distance));
        }
        intervals.push(entries);
    }
    let stored_length = reader.read_f32()?;

    let table = PathTable::from_intervals(intervals);
    let computed = table.total_length();
    if (stored_length - computed).abs() > LENGTH_WARN_TOLERANCE * computed.abs().max(1.0) {
        log::warn!("stored table length {stored_length} disagrees with recomputed {computed}");
    }
    Ok(table)
}

// ============================================================================
// Emitter records
// ============================================================================

fn write_range(writer: &mut ByteWriter, range: ValueRange) {
    writer.write_f32(range.min);
    writer.write_f32(range.max);
}

fn read_range(reader: &mut ByteReader) -> Result<ValueRange, PersistenceError> {
    Ok(ValueRange::new(reader.read_f32()?, reader.read_f32()?))
}

fn write_config(w: &mut ByteWriter, config: &EmitterConfig) {
    w.write_vec3(config.rotational_velocity);
    w.write_vec3(config.emitter_offset);
    w.write_count(config.particle_count);

    let emission = &config.emission;
    w.write_i32(emission.shape.id());
    w.write_f32(emission.rate);
    w.write_vec3(emission.box_size);
    w.write_f32(emission.sphere_radius);
    w.write_f32(emission.frustum_radius_spawn);
    w.write_f32(emission.frustum_radius_target);
    w.write_f32(emission.frustum_height);

    let playback = &config.playback;
    w.write_bool(playback.playing);
    w.write_bool(playback.looping);
    w.write_f32(playback.loop_delay);
    // Negative means "forever".
    w.write_f32(playback.duration.unwrap_or(-1.0));

    w.write_bool(config.parent_transforms);

    let path = &config.path;
    w.write_bool(path.mode != FollowMode::Off);
    w.write_bool(path.mode == FollowMode::Direct);
    w.write_f32(path.look_ahead);
    w.write_f32(path.radius);
    w.write_f32(path.power);

    let s = &config.steering;
    w.write_bool(s.seeking);
    w.write_bool(s.steering);
    w.write_vec3(s.seek_point);
    w.write_f32(s.seek_force);
    w.write_vec3(s.steer_point);
    w.write_f32(s.steer_force);
    w.write_f32(s.steer_max);
    w.write_vec3(s.gravitate_point);
    w.write_f32(s.gravitate_power);
    w.write_f32(s.gravitate_max);
    w.write_vec3(s.attract_point);
    w.write_f32(s.attract_force);
    w.write_f32(s.attract_range);
    w.write_vec3(s.arrive_point);
    w.write_f32(s.arrive_force);
    w.write_f32(s.arrive_range);
    w.write_f32(s.arrive_max);

    w.write_bool(config.global.enabled);
    w.write_vec3(config.global.force);
    w.write_vec3(config.global.acceleration);

    write_range(w, config.initial_speed);
    w.write_bool(config.limit_speed_over_lifetime);
    write_range(w, config.speed_limit_begin);
    write_range(w, config.speed_limit_end);
    write_range(w, config.life);

    w.write_bool(config.size_over_lifetime);
    write_range(w, config.size_begin);
    write_range(w, config.size_end);
    write_range(w, config.mass);

    w.write_bool(config.colour_over_lifetime);
    w.write_vec4(config.colour_begin.a);
    w.write_vec4(config.colour_begin.b);
    w.write_vec4(config.colour_end.a);
    w.write_vec4(config.colour_end.b);
}

fn read_config(r: &mut ByteReader) -> Result<EmitterConfig, PersistenceError> {
    let rotational_velocity = r.read_vec3()?;
    let emitter_offset = r.read_vec3()?;

    let particle_count = r.read_i32()?;
    if particle_count < 0 {
        return Err(PersistenceError::NegativeCount {
            what: "particle",
            count: particle_count,
        });
    }
    if particle_count > MAX_PARTICLES {
        return Err(PersistenceError::PoolTooLarge(particle_count));
    }

    let shape_id = r.read_i32()?;
    let shape = EmissionShape::from_id(shape_id).ok_or(PersistenceError::UnknownShape(shape_id))?;
    let emission = EmissionConfig {
        shape,
        rate: r.read_f32()?,
        box_size: r.read_vec3()?,
        sphere_radius: r.read_f32()?,
        frustum_radius_spawn: r.read_f32()?,
        frustum_radius_target: r.read_f32()?,
        frustum_height: r.read_f32()?,
    };

    let playing = r.read_bool()?;
    let looping = r.read_bool()?;
    let loop_delay = r.read_f32()?;
    let duration = r.read_f32()?;
    let playback = Playback {
        playing,
        looping,
        loop_delay,
        duration: (duration > 0.0).then_some(duration),
    };

    let parent_transforms = r.read_bool()?;

    let follow = r.read_bool()?;
    let direct = r.read_bool()?;
    let path = PathFollow {
        mode: match (follow, direct) {
            (false, _) => FollowMode::Off,
            (true, false) => FollowMode::Corridor,
            (true, true) => FollowMode::Direct,
        },
        look_ahead: r.read_f32()?,
        radius: r.read_f32()?,
        power: r.read_f32()?,
    };

    let steering = SteeringConfig {
        seeking: r.read_bool()?,
        steering: r.read_bool()?,
        seek_point: r.read_vec3()?,
        seek_force: r.read_f32()?,
        steer_point: r.read_vec3()?,
        steer_force: r.read_f32()?,
        steer_max: r.read_f32()?,
        gravitate_point: r.read_vec3()?,
        gravitate_power: r.read_f32()?,
        gravitate_max: r.read_f32()?,
        attract_point: r.read_vec3()?,
        attract_force: r.read_f32()?,
        attract_range: r.read_f32()?,
        arrive_point: r.read_vec3()?,
        arrive_force: r.read_f32()?,
        arrive_range: r.read_f32()?,
        arrive_max: r.read_f32()?,
    };

    let global = GlobalEffects {
        enabled: r.read_bool()?,
        force: r.read_vec3()?,
        acceleration: r.read_vec3()?,
    };

    Ok(EmitterConfig {
        particle_count: particle_count as usize,
        rotational_velocity,
        emitter_offset,
        emission,
        playback,
        parent_transforms,
        path,
        steering,
        global,
        initial_speed: read_range(r)?,
        limit_speed_over_lifetime: r.read_bool()?,
        speed_limit_begin: read_range(r)?,
        speed_limit_end: read_range(r)?,
        life: read_range(r)?,
        size_over_lifetime: r.read_bool()?,
        size_begin: read_range(r)?,
        size_end: read_range(r)?,
        mass: read_range(r)?,
        colour_over_lifetime: r.read_bool()?,
        colour_begin: read_colour_range(r)?,
        colour_end: read_colour_range(r)?,
    })
}

fn read_colour_range(r: &mut ByteReader) -> Result<ColourRange, PersistenceError> {
    let a: Vec4 = r.read_vec4()?;
    let b: Vec4 = r.read_vec4()?;
    Ok(ColourRange::new(a, b))
}

fn write_transform(w: &mut ByteWriter, transform: &Transform) {
    w.write_vec3(transform.position());
    w.write_vec3(transform.rotation());
    w.write_vec3(transform.scale());
    w.write_mat4(&transform.translation_matrix());
    w.write_mat4(&transform.rotation_matrix());
    w.write_mat4(&transform.scale_matrix());
    w.write_mat4(&transform.matrix());
}

fn read_transform(r: &mut ByteReader) -> Result<Transform, PersistenceError> {
    Ok(Transform::from_parts(
        r.read_vec3()?,
        r.read_vec3()?,
        r.read_vec3()?,
        r.read_mat4()?,
        r.read_mat4()?,
        r.read_mat4()?,
        r.read_mat4()?,
    ))
}

pub fn write_emitter(w: &mut ByteWriter, emitter: &Emitter) {
    write_config(w, emitter.config());
    write_transform(w, emitter.transform());
    write_table(w, emitter.path());
    write_table(w, emitter.size_graph());
    write_table(w, emitter.speed_graph());
    write_table(w, emitter.colour_graph());
}

pub fn read_emitter(r: &mut ByteReader) -> Result<Emitter, PersistenceError> {
    let config = read_config(r)?;
    let transform = read_transform(r)?;
    let path = read_table(r)?;
    let size = read_table(r)?;
    let speed = read_table(r)?;
    let colour = read_table(r)?;
    Ok(Emitter::from_parts(config, transform, path, size, speed, colour))
}

// ============================================================================
// Whole files
// ============================================================================

fn header(magic: [u8; 4]) -> ByteWriter {
    let mut writer = ByteWriter::new();
    writer.write_bytes(&magic);
    writer.write_u8(FORMAT_VERSION);
    writer
}

fn read_header(reader: &mut ByteReader, expected: [u8; 4]) -> Result<(), PersistenceError> {
    let found = reader.read_magic()?;
    if found != expected {
        return Err(PersistenceError::InvalidMagic { expected, found });
    }
    let version = reader.read_u8()?;
    if version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            expected: FORMAT_VERSION,
            found: version,
        });
    }
    Ok(())
}

fn finish(reader: &ByteReader) -> Result<(), PersistenceError> {
    match reader.remaining() {
        0 => Ok(()),
        extra => Err(PersistenceError::TrailingBytes(extra)),
    }
}

pub fn encode_path(path: &PathTable<Vec3>) -> Vec<u8> {
    let mut writer = header(PATH_MAGIC);
    write_table(&mut writer, path);
    writer.into_bytes()
}

pub fn decode_path(data: &[u8]) -> Result<PathTable<Vec3>, PersistenceError> {
    let mut reader = ByteReader::new(data);
    read_header(&mut reader, PATH_MAGIC)?;
    let table = read_table(&mut reader)?;
    finish(&reader)?;
    Ok(table)
}

pub fn encode_graph(graph: &PathTable<f32>) -> Vec<u8> {
    let mut writer = header(GRAPH_MAGIC);
    write_table(&mut writer, graph);
    writer.into_bytes()
}

pub fn decode_graph(data: &[u8]) -> Result<PathTable<f32>, PersistenceError> {
    let mut reader = ByteReader::new(data);
    read_header(&mut reader, GRAPH_MAGIC)?;
    let table = read_table(&mut reader)?;
    finish(&reader)?;
    Ok(table)
}

pub fn encode_emitter(emitter: &Emitter) -> Vec<u8> {
    let mut writer = header(EMITTER_MAGIC);
    write_emitter(&mut writer, emitter);
    writer.into_bytes()
}

pub fn decode_emitter(data: &[u8]) -> Result<Emitter, PersistenceError> {
    let mut reader = ByteReader::new(data);
    read_header(&mut reader, EMITTER_MAGIC)?;
    let emitter = read_emitter(&mut reader)?;
    finish(&reader)?;
    Ok(emitter)
}

pub fn encode_system(system: &ParticleSystem) -> Vec<u8> {
    let mut writer = header(SYSTEM_MAGIC);
    writer.write_count(system.len());
    for emitter in system.emitters() {
        write_emitter(&mut writer, emitter);
    }
    writer.into_bytes()
}

/// Decode a system file. All records are decoded before anything is
/// returned.
pub fn decode_system(data: &[u8]) -> Result<ParticleSystem, PersistenceError> {
    let mut reader = ByteReader::new(data);
    read_header(&mut reader, SYSTEM_MAGIC)?;
    let count = reader.read_count("emitter", 1)?;
    let mut emitters = Vec::with_capacity(count);
    for _ in 0..count {
        emitters.push(read_emitter(&mut reader)?);
    }
    finish(&reader)?;
    Ok(ParticleSystem::from_emitters(emitters))
}

// ============================================================================
// Filesystem helpers
// ============================================================================

pub fn save_path(path: impl AsRef<Path>, table: &PathTable<Vec3>) -> Result<(), PathFxError> {
    write_file(path.as_ref(), &encode_path(table))
}

pub fn load_path(path: impl AsRef<Path>) -> Result<PathTable<Vec3>, PathFxError> {
    let table = decode_path(&read_file(path.as_ref())?)?;
    log::info!("loaded path {} ({} samples)", path.as_ref().display(), table.sample_count());
    Ok(table)
}

pub fn save_graph(path: impl AsRef<Path>, graph: &PathTable<f32>) -> Result<(), PathFxError> {
    write_file(path.as_ref(), &encode_graph(graph))
}

pub fn load_graph(path: impl AsRef<Path>) -> Result<PathTable<f32>, PathFxError> {
    let graph = decode_graph(&read_file(path.as_ref())?)?;
    log::info!("loaded motion graph {}", path.as_ref().display());
    Ok(graph)
}

pub fn save_emitter(path: impl AsRef<Path>, emitter: &Emitter) -> Result<(), PathFxError> {
    write_file(path.as_ref(), &encode_emitter(emitter))
}

pub fn load_emitter(path: impl AsRef<Path>) -> Result<Emitter, PathFxError> {
    let emitter = decode_emitter(&read_file(path.as_ref())?)?;
    log::info!("loaded emitter {}", path.as_ref().display());
    Ok(emitter)
}

pub fn save_system(path: impl AsRef<Path>, system: &ParticleSystem) -> Result<(), PathFxError> {
    write_file(path.as_ref(), &encode_system(system))
}

pub fn load_system(path: impl AsRef<Path>) -> Result<ParticleSystem, PathFxError> {
    let system = decode_system(&read_file(path.as_ref())?)?;
    log::info!(
        "loaded particle system {} ({} emitters)",
        path.as_ref().display(),
        system.len()
    );
    Ok(system)
}

fn read_file(path: &Path) -> Result<Vec<u8>, PathFxError> {
    Ok(std::fs::read(path)?)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), PathFxError> {
    std::fs::write(path, bytes)?;
    log::info!("saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
