//! ECS 集成
//!
//! 一个实体上的所有发射器放在同一个 [`ParticleEffect`] 组件中（兄弟发射器）。
//! 每帧先运行 [`simulate_particle_effects`]，再运行 [`publish_particle_effects`]。
//!
//! ## 使用示例
//!
//! ```ignore
//! let renderer = shared(HeadlessRenderer::new());
//! world.insert_resource(Time::default());
//! world.spawn((
//!     Transform::default(),
//!     ParticleEffect::from_configs([ParticlePreset::Fire.to_config()], &renderer, &settings),
//! ));
//!
//! let mut schedule = particle_schedule();
//! schedule.run(&mut world);
//! ```

use super::emitter::EmitterController;
use super::emitter_config::EmitterConfig;
use crate::config::ParticleEngineConfig;
use crate::ecs::{Time, Transform};
use crate::render::SharedRenderer;
use bevy_ecs::prelude::*;
use std::sync::Arc;

/// 共享渲染器上的发射器
pub type SharedEmitter = EmitterController<SharedRenderer>;

/// 实体上的粒子效果
#[derive(Component, Default)]
pub struct ParticleEffect {
    emitters: Vec<SharedEmitter>,
}

impl ParticleEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为每个配置创建一个已启用的发射器
    pub fn from_configs<I>(configs: I, renderer: &SharedRenderer, settings: &ParticleEngineConfig) -> Self
    where
        I: IntoIterator<Item = EmitterConfig>,
    {
        let mut effect = Self::new();
        for config in configs {
            let mut emitter = EmitterController::with_settings(config, Arc::clone(renderer), settings);
            emitter.enable(true);
            effect.push(emitter);
        }
        effect
    }

    pub fn push(&mut self, emitter: SharedEmitter) {
        self.emitters.push(emitter);
    }

    pub fn emitters(&self) -> &[SharedEmitter] {
        &self.emitters
    }

    pub fn emitters_mut(&mut self) -> &mut [SharedEmitter] {
        &mut self.emitters
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// 所有发射器的存活粒子总数
    pub fn particle_count(&self) -> usize {
        self.emitters.iter().map(|e| e.particle_count()).sum()
    }

    pub fn enable_all(&mut self, enabled: bool) {
        for emitter in &mut self.emitters {
            emitter.enable(enabled);
        }
    }

    pub fn tick(&mut self, delta_time: f32, transform: &Transform) {
        for emitter in &mut self.emitters {
            emitter.tick(delta_time, transform);
        }
    }

    /// 返回本帧发布了顶点流的发射器数量
    pub fn render_tick(&mut self, transform: &Transform) -> usize {
        self.emitters
            .iter_mut()
            .filter_map(|emitter| emitter.render_tick(transform))
            .count()
    }

    /// 编辑器属性变更通知
    ///
    /// `DebugPlayEntity` 切换所有兄弟发射器的启用状态，其余属性转发给 `index` 处的发射器。
    pub fn editor_change(&mut self, index: usize, property: &str) -> bool {
        match property {
            "DebugPlayEntity" => {
                for emitter in &mut self.emitters {
                    let enabled = emitter.is_enabled();
                    emitter.enable(!enabled);
                }
                tracing::debug!(target: "particles", emitters = self.emitters.len(), "Toggled debug playback");
                true
            }
            _ => self
                .emitters
                .get_mut(index)
                .is_some_and(|emitter| emitter.editor_change(property)),
        }
    }
}

/// 模拟阶段
pub fn simulate_particle_effects(time: Res<Time>, mut query: Query<(&Transform, &mut ParticleEffect)>) {
    for (transform, mut effect) in query.iter_mut() {
        effect.tick(time.delta_seconds, transform);
    }
}

/// 发布阶段
pub fn publish_particle_effects(mut query: Query<(&Transform, &mut ParticleEffect)>) {
    for (transform, mut effect) in query.iter_mut() {
        effect.render_tick(transform);
    }
}

/// 先模拟后发布的调度
pub fn particle_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((simulate_particle_effects, publish_particle_effects).chain());
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::presets::ParticlePreset;
    use crate::render::{shared, HeadlessRenderer};

    fn settings() -> ParticleEngineConfig {
        let mut settings = ParticleEngineConfig::default();
        settings.simulation.seed = Some(5);
        settings
    }

    #[test]
    fn test_debug_play_toggles_siblings() {
        let renderer = shared(HeadlessRenderer::new());
        let mut effect = ParticleEffect::from_configs(
            [ParticlePreset::Fire.to_config(), ParticlePreset::Smoke.to_config()],
            &renderer,
            &settings(),
        );
        assert!(effect.emitters().iter().all(|e| e.is_enabled()));

        assert!(effect.editor_change(0, "DebugPlayEntity"));
        assert!(effect.emitters().iter().all(|e| !e.is_enabled()));

        assert!(effect.editor_change(1, "DebugPlayEntity"));
        assert!(effect.emitters().iter().all(|e| e.is_enabled()));
    }

    #[test]
    fn test_editor_change_out_of_range() {
        let mut effect = ParticleEffect::new();
        assert!(!effect.editor_change(3, "Materials"));
    }

    #[test]
    fn test_tick_and_render() {
        let renderer = shared(HeadlessRenderer::new());
        let mut effect =
            ParticleEffect::from_configs([ParticlePreset::Fire.to_config()], &renderer, &settings());
        let transform = Transform::default();

        effect.tick(0.1, &transform);
        assert!(effect.particle_count() > 0);
        assert_eq!(effect.render_tick(&transform), 0);
        effect.tick(0.1, &transform);
        assert_eq!(effect.render_tick(&transform), 1);
    }
}
