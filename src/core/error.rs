//! 统一错误处理模块
//!
//! 粒子模拟核心本身不返回错误：退化配置、空曲线、未初始化的缓冲槽都在当前帧内
//! 静默跳过。这里的错误类型只用于基础设施层：
//!
//! - **渲染协作者错误** (`DeviceError`): 缓冲槽创建、映射、写入失败
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析、验证失败
//!
//! `ParticleError` 可以同时承载这两类错误。

use crate::config::ConfigError;
use crate::render::SlotHandle;
use thiserror::Error;

/// 粒子引擎错误类型
#[derive(Error, Debug)]
pub enum ParticleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

/// 渲染协作者错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Unknown stream slot: {0:?}")]
    UnknownSlot(SlotHandle),

    #[error("Stream slot {0:?} is not mapped for writing")]
    NotMapped(SlotHandle),

    #[error("Write of {len} elements at {offset} exceeds slot capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("Failed to allocate stream slot: {0}")]
    Allocation(String),
}

/// 结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type DeviceResult<T> = Result<T, DeviceError>;
