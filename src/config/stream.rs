use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 单个缓冲槽可寻址的最大顶点数（u16 索引）
pub const MAX_ADDRESSABLE_VERTICES: u32 = 1 << 16;

/// 顶点流配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// 轮转缓冲槽数量
    pub buffer_count: usize,

    /// 每个缓冲槽可容纳的最大粒子四边形数
    pub max_quads: u32,
}

impl_default!(StreamConfig {
    buffer_count: 3,
    max_quads: 2500,
});

impl StreamConfig {
    /// 每个缓冲槽的顶点容量
    pub fn vertex_capacity(&self) -> u32 {
        self.max_quads * 4
    }

    /// 每个缓冲槽的索引容量
    pub fn index_capacity(&self) -> u32 {
        self.max_quads * 6
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.buffer_count < 2 {
            return Err(ConfigError::ValidationError(
                "Stream needs at least two buffers".to_string(),
            ));
        }
        if self.max_quads == 0 {
            return Err(ConfigError::ValidationError(
                "Stream max_quads must be positive".to_string(),
            ));
        }
        if u64::from(self.max_quads) * 4 > u64::from(MAX_ADDRESSABLE_VERTICES) {
            return Err(ConfigError::ValidationError(format!(
                "Stream max_quads {} exceeds u16 index range",
                self.max_quads
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacities() {
        let config = StreamConfig::default();
        assert_eq!(config.vertex_capacity(), 10_000);
        assert_eq!(config.index_capacity(), 15_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_single_buffer() {
        let config = StreamConfig {
            buffer_count: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_index_overflow() {
        let config = StreamConfig {
            max_quads: 16_385,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StreamConfig {
            max_quads: 16_384,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
