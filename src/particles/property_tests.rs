//! 粒子系统属性测试
//!
//! 使用proptest验证生成调度、粒子池、曲线和顶点流轮转的不变量

#[cfg(test)]
mod tests {
    use crate::config::{ParticleEngineConfig, StreamConfig};
    use crate::particles::curve::{evaluate_or_lerp, Curve};
    use crate::particles::emitter::{EmitterController, StaticHost};
    use crate::particles::emitter_config::EmitterConfig;
    use crate::particles::particle::Particle;
    use crate::particles::pool::ParticlePool;
    use crate::particles::stream::StreamPublisher;
    use crate::render::{quad_indices, HeadlessRenderer, ParticleQuad, RenderCollaborator};
    use glam::Vec3;
    use proptest::prelude::*;

    fn seeded_settings(seed: u64) -> ParticleEngineConfig {
        let mut settings = ParticleEngineConfig::default();
        settings.simulation.seed = Some(seed);
        settings
    }

    fn emitted_over(config: EmitterConfig, dt: f32, ticks: usize, seed: u64) -> u32 {
        let mut emitter =
            EmitterController::with_settings(config, HeadlessRenderer::new(), &seeded_settings(seed));
        let host = StaticHost::default();
        emitter.enable(true);
        for _ in 0..ticks {
            emitter.tick(dt, &host);
        }
        emitter.emitted_count()
    }

    fn quad() -> ParticleQuad {
        ParticleQuad {
            position: Vec3::ZERO,
            color: [255; 4],
            rotation: 0.0,
            scale: 1.0,
            direction: Vec3::Z,
            billboard: [0; 4],
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn fixed_rate_matches_elapsed_time(
            rate in 1.0f32..100.0,
            dt in 0.005f32..0.1,
            seed in any::<u64>()
        ) {
            // 与帧长无关：发射数 ≈ 经过时间 × 速率（首帧在 t=0 额外生成一个）
            let ticks = (5.0 / dt) as usize;
            let elapsed = ticks as f32 * dt;
            let config = EmitterConfig::default().with_spawn_rate(rate, rate);
            let emitted = emitted_over(config, dt, ticks, seed) as f32;
            let expected = elapsed * rate + 1.0;
            prop_assert!((emitted - expected).abs() <= 2.0, "emitted {} expected {}", emitted, expected);
        }

        #[test]
        fn ranged_rate_stays_within_bounds(
            min_rate in 1.0f32..50.0,
            extra in 0.0f32..50.0,
            dt in 0.01f32..0.1,
            seed in any::<u64>()
        ) {
            let max_rate = min_rate + extra;
            let ticks = (5.0 / dt) as usize;
            let elapsed = ticks as f32 * dt;
            let config = EmitterConfig::default().with_spawn_rate(min_rate, max_rate);
            let emitted = emitted_over(config, dt, ticks, seed) as f32;
            prop_assert!(emitted >= elapsed * min_rate - 1.0);
            prop_assert!(emitted <= elapsed * max_rate + 2.0);
        }

        #[test]
        fn swap_remove_never_skips(
            lives in prop::collection::vec(0.0f32..2.0, 0..64),
            dt in 0.01f32..1.0
        ) {
            let mut pool = ParticlePool::new();
            for &life in &lives {
                pool.push(Particle { life_left: life, total_life: 2.0, ..Default::default() });
            }

            let expected_removed = lives.iter().filter(|&&life| life - dt <= 0.0).count();
            let mut hooks = 0;
            let removed = pool.retain_alive(dt, |_| hooks += 1);

            prop_assert_eq!(removed, expected_removed);
            prop_assert_eq!(hooks, expected_removed);
            prop_assert_eq!(pool.len(), lives.len() - expected_removed);
            prop_assert!(pool.iter().all(|p| p.life_left > 0.0));
        }

        #[test]
        fn empty_curve_is_lerp(
            t in -0.5f32..1.5,
            start in -100.0f32..100.0,
            end in -100.0f32..100.0
        ) {
            let curve = Curve::<f32>::new();
            prop_assert_eq!(evaluate_or_lerp(&curve, t, start, end), start + (end - start) * t);

            let curve = Curve::<Vec3>::default();
            let a = Vec3::splat(start);
            let b = Vec3::new(end, start, end);
            prop_assert_eq!(evaluate_or_lerp(&curve, t, a, b), a.lerp(b, t));
        }

        #[test]
        fn curve_stays_within_key_range(
            points in prop::collection::vec((0.0f32..1.0, -10.0f32..10.0), 1..8),
            t in -1.0f32..2.0
        ) {
            let curve = Curve::from_points(&points);
            let value = curve.evaluate(t).unwrap();
            let min = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
            let max = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
            prop_assert!(value >= min - 1e-4 && value <= max + 1e-4);
        }

        #[test]
        fn rotation_never_exposes_fill_slot(
            buffer_count in 2usize..6,
            frames in prop::collection::vec(0usize..6, 2..24)
        ) {
            let config = StreamConfig { buffer_count, max_quads: 8 };
            let mut renderer = HeadlessRenderer::new();
            let mut publisher = StreamPublisher::new(config);

            for (k, &count) in frames.iter().enumerate() {
                let quads = vec![quad(); count];
                let published = publisher.publish(&mut renderer, &quads).unwrap();
                if k == 0 {
                    prop_assert!(published.is_none());
                    continue;
                }
                let published = published.unwrap();
                prop_assert_ne!(Some(published.slot), publisher.fill_slot());
                prop_assert!(!renderer.is_vertex_mapped(published.slot));
                prop_assert_eq!(published.quad_count as usize, count);
            }

            let pattern = quad_indices(8);
            for &slot in publisher.slots() {
                let data = renderer.slot(slot).unwrap();
                prop_assert_eq!(&data.indices, &pattern);
                prop_assert_eq!(data.index_map_count, 1);
            }
        }
    }
}
