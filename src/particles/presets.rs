use super::curve::Curve;
use super::emitter_config::{BillboardType, EmitterConfig};
use glam::{Vec3, Vec4};

/// 发射器预设
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePreset {
    Fire,
    Smoke,
    Sparks,
    Burst,
}

impl ParticlePreset {
    pub const ALL: [ParticlePreset; 4] = [
        ParticlePreset::Fire,
        ParticlePreset::Smoke,
        ParticlePreset::Sparks,
        ParticlePreset::Burst,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParticlePreset::Fire => "Fire",
            ParticlePreset::Smoke => "Smoke",
            ParticlePreset::Sparks => "Sparks",
            ParticlePreset::Burst => "Burst",
        }
    }

    /// 按名称查找（大小写不敏感）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    pub fn to_config(&self) -> EmitterConfig {
        match self {
            ParticlePreset::Fire => EmitterConfig {
                min_spawn_rate: 40.0,
                max_spawn_rate: 60.0,
                min_start_velocity: Vec3::new(-0.3, 1.5, -0.3),
                max_start_velocity: Vec3::new(0.3, 2.5, 0.3),
                min_end_velocity: Vec3::new(0.0, 0.5, 0.0),
                max_end_velocity: Vec3::new(0.0, 1.0, 0.0),
                min_start_offset: Vec3::new(-0.2, 0.0, -0.2),
                max_start_offset: Vec3::new(0.2, 0.0, 0.2),
                min_start_size: Vec3::splat(0.4),
                max_start_size: Vec3::splat(0.6),
                min_end_size: Vec3::splat(0.05),
                max_end_size: Vec3::splat(0.1),
                min_duration: 0.7,
                max_duration: 1.3,
                start_color: Vec4::new(1.0, 0.5, 0.0, 1.0),
                end_color: Vec4::new(1.0, 0.0, 0.0, 0.0),
                min_start_rotation_rate: -1.0,
                max_start_rotation_rate: 1.0,
                ..Default::default()
            },
            ParticlePreset::Smoke => EmitterConfig {
                min_spawn_rate: 15.0,
                max_spawn_rate: 25.0,
                min_start_velocity: Vec3::new(-0.3, 0.8, -0.3),
                max_start_velocity: Vec3::new(0.3, 1.2, 0.3),
                min_end_velocity: Vec3::new(-0.1, 0.3, -0.1),
                max_end_velocity: Vec3::new(0.1, 0.5, 0.1),
                min_start_size: Vec3::splat(0.5),
                max_start_size: Vec3::splat(0.7),
                min_end_size: Vec3::splat(2.0),
                max_end_size: Vec3::splat(2.5),
                min_duration: 2.5,
                max_duration: 3.5,
                start_color: Vec4::new(0.5, 0.5, 0.5, 0.8),
                end_color: Vec4::new(0.3, 0.3, 0.3, 0.0),
                alpha_curve: Curve::from_points(&[(0.0, 0.0), (0.2, 0.8), (1.0, 0.0)]),
                render_order_bias: -1.0,
                ..Default::default()
            },
            ParticlePreset::Sparks => EmitterConfig {
                min_spawn_rate: 80.0,
                max_spawn_rate: 120.0,
                min_start_velocity: Vec3::new(-3.0, 4.0, -3.0),
                max_start_velocity: Vec3::new(3.0, 7.0, 3.0),
                min_end_velocity: Vec3::new(-3.0, 4.0, -3.0),
                max_end_velocity: Vec3::new(3.0, 7.0, 3.0),
                min_start_size: Vec3::new(0.05, 0.3, 0.05),
                max_start_size: Vec3::new(0.08, 0.4, 0.08),
                min_end_size: Vec3::splat(0.02),
                max_end_size: Vec3::splat(0.04),
                min_duration: 0.4,
                max_duration: 0.8,
                start_color: Vec4::new(1.0, 0.9, 0.5, 1.0),
                end_color: Vec4::new(1.0, 0.3, 0.0, 0.0),
                gravity: Vec3::new(0.0, -9.8, 0.0),
                billboard_type: BillboardType::AlignAlongVelocity,
                ..Default::default()
            },
            ParticlePreset::Burst => EmitterConfig {
                total_duration: 0.5,
                min_spawn_rate: 0.0,
                max_spawn_rate: 0.0,
                min_burst_count: 60,
                max_burst_count: 100,
                min_start_velocity: Vec3::splat(-5.0),
                max_start_velocity: Vec3::splat(5.0),
                min_start_size: Vec3::splat(1.0),
                max_start_size: Vec3::splat(1.5),
                min_end_size: Vec3::ZERO,
                max_end_size: Vec3::ZERO,
                min_duration: 0.3,
                max_duration: 0.7,
                start_color: Vec4::new(1.0, 0.8, 0.0, 1.0),
                end_color: Vec4::new(0.5, 0.0, 0.0, 0.0),
                gravity: Vec3::new(0.0, -5.0, 0.0),
                ..Default::default()
            },
        }
    }
}
