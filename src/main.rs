use bevy_ecs::prelude::World;
use particle_engine::config::ParticleEngineConfig;
use particle_engine::core::{init_logging, ParticleError, ParticleResult};
use particle_engine::ecs::{Time, Transform};
use particle_engine::particles::{particle_schedule, ParticleEffect, ParticlePreset};
use particle_engine::render::{shared, HeadlessRenderer};
use std::env;

const DEFAULT_FRAMES: u32 = 300;
const FRAME_TIME: f32 = 1.0 / 60.0;

/// 无头运行：particle_engine [预设名] [帧数]
fn run() -> ParticleResult<()> {
    let mut config = ParticleEngineConfig::load_or_default();
    config.apply_env_overrides();
    config.validate()?;
    init_logging(&config.logging);

    let mut args = env::args().skip(1);
    let preset = match args.next() {
        Some(name) => ParticlePreset::from_name(&name)
            .ok_or_else(|| ParticleError::General(format!("Unknown preset: {}", name)))?,
        None => ParticlePreset::Fire,
    };
    let frames = match args.next() {
        Some(value) => value
            .parse::<u32>()
            .map_err(|e| ParticleError::General(format!("Invalid frame count {}: {}", value, e)))?,
        None => DEFAULT_FRAMES,
    };

    tracing::info!(target: "particles", preset = preset.name(), frames, "Starting headless particle run");

    let renderer = shared(HeadlessRenderer::new());
    let mut world = World::new();
    world.insert_resource(Time::default());
    let entity = world
        .spawn((
            Transform::default(),
            ParticleEffect::from_configs([preset.to_config()], &renderer, &config),
        ))
        .id();

    let mut schedule = particle_schedule();
    for frame in 0..frames {
        world.resource_mut::<Time>().advance(FRAME_TIME);
        schedule.run(&mut world);

        if frame % 60 == 0 {
            if let Some(effect) = world.get::<ParticleEffect>(entity) {
                tracing::info!(
                    target: "particles",
                    frame,
                    particles = effect.particle_count(),
                    emitted = effect.emitters().iter().map(|e| e.emitted_count()).sum::<u32>(),
                    "Frame stats"
                );
            }
        }
    }

    if let Some(effect) = world.get::<ParticleEffect>(entity) {
        tracing::info!(
            target: "particles",
            particles = effect.particle_count(),
            "Finished headless particle run"
        );
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Particle engine failed: {}", e);
        std::process::exit(1);
    }
}
