//! pathfx Runner - plays a saved effect without a window
//!
//! Usage: pathfx-runner <effect.pfxs | config.json> [seconds]
//!
//! Loads an emitter-system file, or a single emitter config from JSON, ticks
//! it at a fixed 60 Hz and logs the live particle count once per second.
//! Set `RUST_LOG=debug` for per-emitter detail.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glam::Mat4;
use pathfx::{persistence, Emitter, EmitterConfig, ParticleSystem};
use pathfx_editor::{EditorError, JsonFile};

const TICK_RATE: u32 = 60;
const DEFAULT_SECONDS: f32 = 5.0;

fn load(path: &Path) -> Result<ParticleSystem, EditorError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let config = EmitterConfig::load(path)?;
        Ok(ParticleSystem::from_emitters(vec![Emitter::new(config)]))
    } else {
        Ok(persistence::load_system(path)?)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let Some(effect_path) = args.get(1).map(PathBuf::from) else {
        eprintln!("Usage: pathfx-runner <effect.pfxs | config.json> [seconds]");
        return ExitCode::FAILURE;
    };
    let seconds = match args.get(2).map(|s| s.parse::<f32>()) {
        None => DEFAULT_SECONDS,
        Some(Ok(s)) if s >= 0.0 => s,
        Some(_) => {
            eprintln!("seconds must be a non-negative number");
            return ExitCode::FAILURE;
        }
    };

    let mut system = match load(&effect_path) {
        Ok(system) => system,
        Err(e) => {
            log::error!("failed to load {}: {}", effect_path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "playing {} ({} emitters) for {}s",
        effect_path.display(),
        system.len(),
        seconds
    );

    let dt = 1.0 / TICK_RATE as f32;
    let ticks = (seconds * TICK_RATE as f32).round() as u32;
    for tick in 1..=ticks {
        system.update(dt, Mat4::IDENTITY);

        if tick % TICK_RATE == 0 {
            log::info!("t={:>5.1}s live={}", tick as f32 * dt, system.live_count());
            for (i, emitter) in system.emitters().iter().enumerate() {
                log::debug!(
                    "  emitter {}: live={} remaining={:.2}",
                    i,
                    emitter.live_count(),
                    emitter.time_remaining()
                );
            }
        }
    }

    log::info!("done: {} particles alive", system.live_count());
    ExitCode::SUCCESS
}
