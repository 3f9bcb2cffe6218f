use bevy_ecs::prelude::World;
use glam::{Vec3, Vec4};
use particle_engine::config::ParticleEngineConfig;
use particle_engine::ecs::{Time, Transform};
use particle_engine::particles::*;
use particle_engine::render::{shared, HeadlessRenderer, ModelId, RenderCollaborator};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

fn seeded(seed: u64) -> ParticleEngineConfig {
    let mut settings = ParticleEngineConfig::default();
    settings.simulation.seed = Some(seed);
    settings
}

#[test]
fn test_fixed_rate_emission() {
    let config = EmitterConfig::default().with_spawn_rate(10.0, 10.0);
    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded(1));
    let host = StaticHost::default();
    emitter.enable(true);

    for _ in 0..10 {
        emitter.tick(0.1, &host);
    }

    // 一秒内速率 10：首帧在 t=0 生成一个，之后每 0.1 秒一个
    let emitted = emitter.emitted_count();
    assert!((9..=11).contains(&emitted), "emitted {}", emitted);
    assert_eq!(emitter.particle_count(), emitted as usize);
}

#[test]
fn test_burst_only_emitter() {
    let config = EmitterConfig::default()
        .with_spawn_rate(0.0, 0.0)
        .with_burst(5, 5);
    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded(2));
    let host = StaticHost::default();
    emitter.enable(true);
    assert_eq!(emitter.burst_count(), 5);

    emitter.tick(0.016, &host);
    assert_eq!(emitter.particle_count(), 5);
    assert_eq!(emitter.burst_count(), 0);

    emitter.tick(0.016, &host);
    assert_eq!(emitter.particle_count(), 5);
}

#[test]
fn test_finite_emitter_stops_after_last_particle() {
    let config = EmitterConfig::default()
        .with_spawn_rate(10.0, 10.0)
        .with_lifetime(0.5, 0.5)
        .with_total_duration(1.0);
    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded(3));
    let host = StaticHost::default();
    emitter.enable(true);

    let mut stopped_at = None;
    for frame in 0..40 {
        emitter.tick(0.1, &host);
        emitter.render_tick(&host);
        if emitter.state() == EmitterState::Stopped {
            stopped_at = Some(frame);
            break;
        }
    }

    let frame = stopped_at.expect("emitter never stopped");
    assert!(frame >= 10, "stopped too early at frame {}", frame);
    assert_eq!(emitter.particle_count(), 0);
    assert!(!emitter.is_enabled());
    assert_eq!(emitter.renderer().registered_count(), 0);
    assert!(emitter.publisher().fill_slot().is_none());
}

#[test]
fn test_stream_publishes_previous_frame() {
    let config = ParticlePreset::Fire.to_config();
    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded(4));
    let host = StaticHost::at(Vec3::new(1.0, 2.0, 3.0));
    emitter.enable(true);

    emitter.tick(1.0 / 30.0, &host);
    assert!(emitter.render_tick(&host).is_none());

    emitter.tick(1.0 / 30.0, &host);
    let published = emitter.render_tick(&host).expect("second frame publishes");
    assert!(published.quad_count > 0);
    assert_eq!(published.index_count, published.quad_count * 6);

    let renderer = emitter.renderer();
    assert!(!renderer.is_vertex_mapped(published.slot));
    let object = renderer
        .registered(emitter.render_object_id())
        .expect("object registered");
    assert_eq!(object.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(object.slot, Some(published.slot));
}

#[test]
fn test_model_emitter_drives_instances() {
    let mut config = EmitterConfig::default().with_spawn_rate(20.0, 20.0);
    let mut template = ModelTemplate::new(ModelId(7));
    template.materials.push(Default::default());
    config.model_templates.push(template);

    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded(5));
    let host = StaticHost::default();
    emitter.enable(true);

    for _ in 0..5 {
        emitter.tick(0.05, &host);
        assert!(emitter.render_tick(&host).is_none());
    }

    let count = emitter.particle_count();
    assert!(count > 0);
    assert_eq!(emitter.renderer().model_instance_count(), count);
    assert_eq!(emitter.renderer().slot_count(), 0);

    emitter.stop_system();
    assert_eq!(emitter.particle_count(), 0);
    assert_eq!(emitter.renderer().model_instance_count(), 0);
}

#[test]
fn test_shared_renderer_between_emitters() {
    let renderer = Rc::new(RefCell::new(HeadlessRenderer::new()));
    let settings = seeded(6);
    let host = StaticHost::default();

    {
        let mut fire =
            EmitterController::with_settings(ParticlePreset::Fire.to_config(), Rc::clone(&renderer), &settings);
        let mut smoke =
            EmitterController::with_settings(ParticlePreset::Smoke.to_config(), Rc::clone(&renderer), &settings);
        fire.enable(true);
        smoke.enable(true);

        for _ in 0..3 {
            fire.tick(1.0 / 60.0, &host);
            smoke.tick(1.0 / 60.0, &host);
            fire.render_tick(&host);
            smoke.render_tick(&host);
        }

        let shared = renderer.borrow();
        assert_eq!(shared.registered_count(), 2);
        assert_eq!(shared.slot_count(), 2 * settings.stream.buffer_count);
    }

    let stats = renderer.borrow().stats();
    assert_eq!(renderer.borrow().slot_count(), 0);
    assert_eq!(renderer.borrow().registered_count(), 0);
    assert_eq!(stats.slots_created, stats.slots_released);
}

#[test]
fn test_ecs_schedule_runs_effects() {
    let renderer = shared(HeadlessRenderer::new());
    let settings = seeded(7);
    let mut world = World::default();
    world.insert_resource(Time::default());

    let entity = world
        .spawn((
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            ParticleEffect::from_configs(
                [ParticlePreset::Fire.to_config(), ParticlePreset::Sparks.to_config()],
                &renderer,
                &settings,
            ),
        ))
        .id();

    let mut schedule = particle_schedule();
    for _ in 0..10 {
        world.resource_mut::<Time>().advance(1.0 / 60.0);
        schedule.run(&mut world);
    }

    assert_eq!(world.resource::<Time>().frame_count, 10);
    let effect = world.get::<ParticleEffect>(entity).expect("effect component");
    assert_eq!(effect.len(), 2);
    assert!(effect.particle_count() > 0);
    assert!(effect
        .emitters()
        .iter()
        .all(|e| e.publisher().is_initialized()));
}

#[test]
fn test_emitter_config_from_toml_file() -> anyhow::Result<()> {
    let config = EmitterConfig::default()
        .with_spawn_rate(4.0, 8.0)
        .with_burst(2, 3)
        .with_colors(Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::ZERO)
        .with_gravity(Vec3::new(0.0, -9.8, 0.0));

    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(config.to_toml_string()?.as_bytes())?;

    let loaded = EmitterConfig::from_toml_file(file.path())?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_engine_config_from_toml_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[stream]\nbuffer_count = 4\nmax_quads = 64\n\n[simulation]\nseed = 9")?;

    let settings = ParticleEngineConfig::from_toml_file(file.path())?;
    settings.validate()?;
    assert_eq!(settings.stream.buffer_count, 4);
    assert_eq!(settings.stream.max_quads, 64);
    assert_eq!(settings.simulation.seed, Some(9));
    Ok(())
}
