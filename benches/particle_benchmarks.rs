/// 粒子系统性能基准测试
///
/// 测试模拟阶段（老化、积分、生成）与顶点流发布的开销

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use particle_engine::config::{ParticleEngineConfig, StreamConfig};
use particle_engine::particles::{
    EmitterConfig, EmitterController, ParticlePreset, StaticHost, StreamPublisher,
};
use particle_engine::render::{HeadlessRenderer, ParticleQuad};
use std::hint::black_box;

// ============================================================================
// 模拟阶段
// ============================================================================

fn warmed_emitter(rate: f32) -> EmitterController<HeadlessRenderer> {
    let mut settings = ParticleEngineConfig::default();
    settings.simulation.seed = Some(42);
    let config = EmitterConfig::default()
        .with_spawn_rate(rate, rate)
        .with_lifetime(2.0, 2.0);
    let mut emitter = EmitterController::with_settings(config, HeadlessRenderer::new(), &settings);
    emitter.enable(true);

    // 预热到稳定粒子数
    let host = StaticHost::default();
    for _ in 0..150 {
        emitter.tick(1.0 / 60.0, &host);
    }
    emitter
}

fn bench_simulation_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_tick");
    let host = StaticHost::default();

    for rate in [100.0f32, 500.0, 1000.0] {
        let mut emitter = warmed_emitter(rate);
        group.bench_with_input(BenchmarkId::from_parameter(rate as u32), &rate, |bencher, _| {
            bencher.iter(|| {
                emitter.tick(black_box(1.0 / 60.0), &host);
                black_box(emitter.particle_count())
            });
        });
    }

    group.finish();
}

fn bench_preset_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("preset_frame");
    let host = StaticHost::default();

    for preset in [ParticlePreset::Fire, ParticlePreset::Smoke, ParticlePreset::Sparks] {
        let mut emitter = EmitterController::new(preset.to_config(), HeadlessRenderer::new());
        emitter.enable(true);
        group.bench_function(preset.name(), |bencher| {
            bencher.iter(|| {
                emitter.tick(1.0 / 60.0, &host);
                black_box(emitter.render_tick(&host))
            });
        });
    }

    group.finish();
}

// ============================================================================
// 顶点流发布
// ============================================================================

fn bench_stream_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_publish");

    for count in [100usize, 1000, 2500] {
        let quads: Vec<ParticleQuad> = (0..count)
            .map(|i| ParticleQuad {
                position: Vec3::new(i as f32, 0.0, 0.0),
                color: [255, 128, 64, 255],
                rotation: 0.0,
                scale: 1.0,
                direction: Vec3::Z,
                billboard: [0; 4],
            })
            .collect();
        let mut renderer = HeadlessRenderer::new();
        let mut publisher = StreamPublisher::new(StreamConfig::default());

        group.bench_with_input(BenchmarkId::from_parameter(count), &quads, |bencher, quads| {
            bencher.iter(|| black_box(publisher.publish(&mut renderer, quads)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulation_tick, bench_preset_frame, bench_stream_publish);
criterion_main!(benches);
