//! 生命周期积分
//!
//! 先老化并删除到期粒子，再为幸存粒子推导本帧的速度、位置、旋转、尺寸与颜色。
//! 公告板模式下结果写入四边形列表，模型发射器模式下直接作用于模型实例。

use super::curve::{evaluate_or_lerp, CurveValue};
use super::emitter_config::{BillboardType, EmissionMode, EmitterConfig};
use super::particle::Particle;
use super::pool::ParticlePool;
use crate::render::{ParticleQuad, RenderCollaborator};
use glam::{Quat, Vec3, Vec4};

/// 速度平方低于该值时沿速度对齐退化为世界向上
const MIN_ALIGN_SPEED_SQ: f32 = 0.01;

/// 单个粒子本帧的派生属性
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedAttributes {
    pub normalized_time: f32,
    pub velocity: Vec3,
    pub rotation_rate: f32,
    pub size: Vec3,
    pub color: [u8; 4],
}

/// 单帧生命周期积分
pub struct LifecycleIntegrator<'a> {
    pub config: &'a EmitterConfig,
    /// 宿主缩放
    pub scale: Vec3,
    /// 发射器前向轴
    pub forward: Vec3,
    pub mode: EmissionMode<'a>,
}

impl<'a> LifecycleIntegrator<'a> {
    pub fn new(config: &'a EmitterConfig, scale: Vec3, orientation: Quat) -> Self {
        Self {
            config,
            scale,
            forward: orientation * Vec3::Z,
            mode: EmissionMode::select(config),
        }
    }

    /// 老化并删除到期粒子，对每个删除的粒子调用销毁钩子
    pub fn kill_expired<R: RenderCollaborator + ?Sized>(
        &self,
        pool: &mut ParticlePool,
        delta_time: f32,
        renderer: &mut R,
    ) -> usize {
        pool.retain_alive(delta_time, |particle| particle.shut_down(renderer))
    }

    /// 积分幸存粒子；公告板模式下将四边形追加到 `quads`
    pub fn integrate<R: RenderCollaborator + ?Sized>(
        &self,
        pool: &mut ParticlePool,
        delta_time: f32,
        renderer: &mut R,
        quads: &mut Vec<ParticleQuad>,
    ) {
        let billboard_code = self.config.billboard_type.code();

        for particle in pool.iter_mut() {
            let attributes = self.derive(particle);
            particle.position += attributes.velocity * delta_time;
            particle.rotation += attributes.rotation_rate * delta_time;

            match self.mode {
                EmissionMode::Model(_) => {
                    if let Some(instance) = particle.model {
                        renderer.set_model_position(instance, particle.position);
                        renderer.set_model_param(
                            instance,
                            "time",
                            Vec4::new(attributes.normalized_time, 0.0, 0.0, 0.0),
                        );
                    }
                }
                EmissionMode::Sprite => {
                    let [r0, r1, r2] = particle.randoms;
                    quads.push(ParticleQuad {
                        position: particle.position,
                        color: attributes.color,
                        rotation: particle.rotation,
                        scale: attributes.size.x.abs(),
                        direction: self.direction(attributes.velocity),
                        billboard: [billboard_code, unit_to_byte(r0), unit_to_byte(r1), unit_to_byte(r2)],
                    });
                }
            }
        }
    }

    /// 推导粒子当前属性
    pub fn derive(&self, particle: &Particle) -> DerivedAttributes {
        let config = self.config;
        let t = particle.normalized_time();

        let mut velocity = match config.velocity_curve.evaluate(t) {
            Some(factor) => particle.start_velocity * factor,
            None => particle.start_velocity.lerp(particle.end_velocity, t),
        };
        velocity += config.gravity * particle.age();

        let rotation_rate = match config.rotation_curve.evaluate(t) {
            Some(factor) => particle.start_rotation_rate * factor,
            None => CurveValue::lerp(particle.start_rotation_rate, particle.end_rotation_rate, t),
        };

        let size = match config.size_curve.evaluate(t) {
            Some(factor) => factor * particle.start_size * self.scale,
            None => (particle.start_size * self.scale).lerp(particle.end_size * self.scale, t),
        };

        let mut color = evaluate_or_lerp(&config.color_curve, t, config.start_color, config.end_color);
        color.w = evaluate_or_lerp(&config.alpha_curve, t, config.start_color.w, config.end_color.w);

        DerivedAttributes {
            normalized_time: t,
            velocity,
            rotation_rate,
            size,
            color: quantize_color(color),
        }
    }

    fn direction(&self, velocity: Vec3) -> Vec3 {
        match self.config.billboard_type {
            BillboardType::AlignAlongVelocity => {
                if velocity.length_squared() > MIN_ALIGN_SPEED_SQ {
                    velocity.normalize()
                } else {
                    Vec3::Y
                }
            }
            _ => self.forward,
        }
    }
}

fn unit_to_byte(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// 颜色量化到 8 位并钳制到 `[0,255]`
pub fn quantize_color(color: Vec4) -> [u8; 4] {
    color.to_array().map(unit_to_byte)
}
