//! 生成调度
//!
//! 每帧的生成预算为 `delta_time - leftover_time`。按速率生成时每个粒子消耗一个
//! 随机间隔，爆发生成不消耗时间。循环结束后未用完的间隔作为负余量带到下一帧，
//! 使长期平均速率与帧率无关。

use super::emitter_config::{EmissionMode, EmitterConfig, ModelTemplate};
use super::particle::Particle;
use super::pool::ParticlePool;
use super::random::ParticleRng;
use super::state::EmitterRuntimeState;
use crate::render::{ModelInstanceId, RenderCollaborator, ShaderOverride};
use glam::{Quat, Vec3, Vec4};

const DEGENERATE_EPSILON: f32 = 1e-8;

/// 单帧生成调度
pub struct SpawnScheduler<'a> {
    pub config: &'a EmitterConfig,
    /// 发射器世界位置
    pub origin: Vec3,
    /// 宿主朝向，用于旋转初始/结束速度
    pub orientation: Quat,
    pub mode: EmissionMode<'a>,
}

impl<'a> SpawnScheduler<'a> {
    pub fn new(config: &'a EmitterConfig, origin: Vec3, orientation: Quat) -> Self {
        Self {
            config,
            origin,
            orientation,
            mode: EmissionMode::select(config),
        }
    }

    /// 没有爆发且速率/寿命配置退化时整帧跳过
    pub fn is_degenerate(config: &EmitterConfig) -> bool {
        config.max_burst_count <= 0
            && (config.max_spawn_rate <= DEGENERATE_EPSILON
                || config.min_spawn_rate < DEGENERATE_EPSILON
                || config.max_spawn_rate < config.min_spawn_rate
                || config.min_duration <= DEGENERATE_EPSILON)
    }

    /// 执行本帧生成，返回生成数量
    pub fn run<R: RenderCollaborator + ?Sized>(
        &self,
        delta_time: f32,
        state: &mut EmitterRuntimeState,
        pool: &mut ParticlePool,
        rng: &mut ParticleRng,
        renderer: &mut R,
    ) -> usize {
        let config = self.config;
        let inv_min_rate = inverse_rate(config.min_spawn_rate);
        let inv_max_rate = inverse_rate(config.max_spawn_rate);
        let has_offset =
            config.min_start_offset != Vec3::ZERO || config.max_start_offset != Vec3::ZERO;

        let mut time_left = delta_time - state.leftover_time;
        let mut next_spawn = 0.0;
        let mut spawned = 0;

        while state.spawning
            && ((config.max_spawn_rate > 0.0 && time_left >= next_spawn) || state.burst_count > 0)
            && state.below_emit_cap(config.max_particles_to_emit)
        {
            let mut origin = self.origin;
            if has_offset {
                origin += rng.vec3_between(config.min_start_offset, config.max_start_offset);
            }

            let mut particle = self.sample_particle(rng);
            // 按帧内剩余时间回溯生成位置，使生成在时间上均匀分布
            particle.position = origin + particle.start_velocity * time_left;

            if let EmissionMode::Model(template) = self.mode {
                particle.model = Some(self.spawn_model(template, particle.position, rng, renderer));
            }

            if state.burst_count > 0 {
                state.burst_count -= 1;
            } else {
                time_left -= next_spawn;
                next_spawn = inv_max_rate + rng.frand() * (inv_min_rate - inv_max_rate);
            }

            state.emitted += 1;
            pool.push(particle);
            spawned += 1;
        }

        state.leftover_time = next_spawn - time_left;
        spawned
    }

    fn sample_particle(&self, rng: &mut ParticleRng) -> Particle {
        let config = self.config;
        let start_velocity = self.orientation
            * rng.vec3_between(config.min_start_velocity, config.max_start_velocity);
        let end_velocity =
            self.orientation * rng.vec3_between(config.min_end_velocity, config.max_end_velocity);

        let life = config.min_duration + rng.frand() * (config.max_duration - config.min_duration);
        let start_size = rng.vec3_between(config.min_start_size, config.max_start_size);
        let end_size = rng.vec3_between(config.min_end_size, config.max_end_size);
        let randoms = [rng.frand(), rng.frand(), rng.frand()];

        let start_rotation_rate =
            rng.range(config.min_start_rotation_rate, config.max_start_rotation_rate);
        let end_rotation_rate =
            rng.range(config.min_end_rotation_rate, config.max_end_rotation_rate);
        let rotation = if start_rotation_rate != 0.0 || end_rotation_rate != 0.0 {
            rng.frand() * std::f32::consts::PI
        } else {
            0.0
        };

        Particle {
            position: Vec3::ZERO,
            rotation,
            start_size,
            end_size,
            life_left: life,
            total_life: life,
            start_velocity,
            end_velocity,
            start_rotation_rate,
            end_rotation_rate,
            randoms,
            model: None,
        }
    }

    fn spawn_model<R: RenderCollaborator + ?Sized>(
        &self,
        template: &ModelTemplate,
        position: Vec3,
        rng: &mut ParticleRng,
        renderer: &mut R,
    ) -> ModelInstanceId {
        let instance = renderer.add_model_instance(template.model);
        if let Some(params) = template.shader_params().first() {
            for (name, value) in &params.params {
                if let ShaderOverride::Vec4(value) = value {
                    renderer.set_model_param(instance, name, *value);
                }
            }
        }
        renderer.set_model_param(instance, "time", Vec4::ZERO);
        renderer.set_model_position(instance, position);
        let orientation = rng.orientation_between(
            self.config.min_start_rotation_3d,
            self.config.max_start_rotation_3d,
        );
        renderer.set_model_orientation(instance, orientation);
        instance
    }
}

fn inverse_rate(rate: f32) -> f32 {
    if rate > 0.0 {
        1.0 / rate
    } else {
        0.0
    }
}
