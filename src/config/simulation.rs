use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 模拟配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 随机种子（None = 使用系统熵）
    #[serde(default)]
    pub seed: Option<u64>,

    /// 编辑器行为：持续时间结束的发射器在渲染帧中立即重启，而不是保持停止
    #[serde(default)]
    pub restart_expired: bool,
}

impl_default!(SimulationConfig {
    seed: None,
    restart_expired: false,
});
