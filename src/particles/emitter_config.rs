//! 发射器配置
//!
//! 所有字段都可在属性编辑器中编辑。配置不做校验：
//! 退化的速率/寿命只会让发射器不产生粒子。

use super::curve::Curve;
use crate::config::{ConfigError, ConfigResult};
use crate::render::{resolve_materials, Material, ModelId, ShaderParamOverrides};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 公告板类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BillboardType {
    /// 始终面向相机
    #[default]
    FaceCamera,
    /// 绕轴旋转
    Axial,
    /// 沿速度方向对齐
    AlignAlongVelocity,
}

impl BillboardType {
    /// 写入顶点的类型编码（沿速度对齐与轴向共用着色器路径）
    pub fn code(self) -> u8 {
        match self {
            BillboardType::FaceCamera => 0,
            BillboardType::Axial | BillboardType::AlignAlongVelocity => 1,
        }
    }
}

/// 模型发射器模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTemplate {
    pub model: ModelId,
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl ModelTemplate {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            materials: Vec::new(),
        }
    }

    /// 解析模板材质
    pub fn shader_params(&self) -> Vec<ShaderParamOverrides> {
        resolve_materials(&self.materials)
    }
}

/// 发射模式，每帧根据配置选择一次
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmissionMode<'a> {
    /// 公告板四边形写入顶点流
    Sprite,
    /// 每个粒子拥有一个模型实例
    Model(&'a ModelTemplate),
}

impl<'a> EmissionMode<'a> {
    pub fn select(config: &'a EmitterConfig) -> Self {
        match config.model_templates.first() {
            Some(template) => EmissionMode::Model(template),
            None => EmissionMode::Sprite,
        }
    }

    pub fn is_model(&self) -> bool {
        matches!(self, EmissionMode::Model(_))
    }
}

/// 发射器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub materials: Vec<Material>,
    /// 总持续时间（<= 0 表示无限）
    pub total_duration: f32,
    /// 最多发射的粒子数（<= 0 表示无限）
    pub max_particles_to_emit: i32,
    /// 启动延迟
    pub start_delay: f32,

    /// 每秒发射数量下限
    pub min_spawn_rate: f32,
    /// 每秒发射数量上限
    pub max_spawn_rate: f32,

    pub min_start_velocity: Vec3,
    pub max_start_velocity: Vec3,
    /// 速度倍率曲线（作用于初始速度）
    pub velocity_curve: Curve<f32>,
    pub min_end_velocity: Vec3,
    pub max_end_velocity: Vec3,

    pub min_start_rotation_rate: f32,
    pub max_start_rotation_rate: f32,
    pub min_end_rotation_rate: f32,
    pub max_end_rotation_rate: f32,
    /// 旋转速率倍率曲线（作用于初始旋转速率）
    pub rotation_curve: Curve<f32>,

    /// 模型发射器的初始三维朝向范围
    pub min_start_rotation_3d: Vec3,
    pub max_start_rotation_3d: Vec3,

    /// 生成位置随机偏移范围
    pub min_start_offset: Vec3,
    pub max_start_offset: Vec3,

    pub min_start_size: Vec3,
    pub max_start_size: Vec3,
    pub min_end_size: Vec3,
    pub max_end_size: Vec3,
    /// 尺寸倍率曲线（逐分量作用于初始尺寸）
    pub size_curve: Curve<Vec3>,

    /// 粒子寿命范围
    pub min_duration: f32,
    pub max_duration: f32,

    pub start_color: Vec4,
    pub end_color: Vec4,
    pub color_curve: Curve<Vec4>,
    pub alpha_curve: Curve<f32>,

    pub gravity: Vec3,

    pub min_burst_count: i32,
    pub max_burst_count: i32,

    pub billboard_type: BillboardType,
    /// 非空时进入模型发射器模式（使用第一个模板）
    pub model_templates: Vec<ModelTemplate>,
    pub render_order_bias: f32,
    /// 编辑器调试播放开关
    pub debug_play_entity: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            materials: Vec::new(),
            total_duration: -1.0,
            max_particles_to_emit: -1,
            start_delay: 0.0,
            min_spawn_rate: 1.0,
            max_spawn_rate: 2.0,
            min_start_velocity: Vec3::new(-2.0, 5.0, -2.0),
            max_start_velocity: Vec3::new(2.0, 5.0, 2.0),
            velocity_curve: Curve::default(),
            min_end_velocity: Vec3::ZERO,
            max_end_velocity: Vec3::ZERO,
            min_start_rotation_rate: 0.0,
            max_start_rotation_rate: 0.0,
            min_end_rotation_rate: 0.0,
            max_end_rotation_rate: 0.0,
            rotation_curve: Curve::default(),
            min_start_rotation_3d: Vec3::ZERO,
            max_start_rotation_3d: Vec3::ZERO,
            min_start_offset: Vec3::ZERO,
            max_start_offset: Vec3::ZERO,
            min_start_size: Vec3::splat(3.0),
            max_start_size: Vec3::splat(3.0),
            min_end_size: Vec3::splat(3.0),
            max_end_size: Vec3::splat(3.0),
            size_curve: Curve::default(),
            min_duration: 3.0,
            max_duration: 3.0,
            start_color: Vec4::ONE,
            end_color: Vec4::ONE,
            color_curve: Curve::default(),
            alpha_curve: Curve::default(),
            gravity: Vec3::ZERO,
            min_burst_count: 0,
            max_burst_count: 0,
            billboard_type: BillboardType::FaceCamera,
            model_templates: Vec::new(),
            render_order_bias: 0.0,
            debug_play_entity: false,
        }
    }
}

impl EmitterConfig {
    /// 从TOML文件加载
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 设置发射速率范围
    pub fn with_spawn_rate(mut self, min: f32, max: f32) -> Self {
        self.min_spawn_rate = min;
        self.max_spawn_rate = max;
        self
    }

    /// 设置爆发数量范围
    pub fn with_burst(mut self, min: i32, max: i32) -> Self {
        self.min_burst_count = min;
        self.max_burst_count = max;
        self
    }

    /// 设置粒子寿命范围
    pub fn with_lifetime(mut self, min: f32, max: f32) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    /// 设置总持续时间
    pub fn with_total_duration(mut self, duration: f32) -> Self {
        self.total_duration = duration;
        self
    }

    /// 设置初始速度范围
    pub fn with_start_velocity(mut self, min: Vec3, max: Vec3) -> Self {
        self.min_start_velocity = min;
        self.max_start_velocity = max;
        self
    }

    /// 设置颜色
    pub fn with_colors(mut self, start: Vec4, end: Vec4) -> Self {
        self.start_color = start;
        self.end_color = end;
        self
    }

    /// 设置重力
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// 总持续时间是否已耗尽
    pub fn duration_elapsed(&self, time_alive: f32) -> bool {
        self.total_duration > 0.0 && time_alive > self.total_duration
    }
}
