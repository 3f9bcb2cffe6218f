/// 发射器运行时状态（不可编辑）
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterRuntimeState {
    /// 自上次启动以来的时长
    pub time_alive: f32,
    /// 跨帧保留的生成间隔余量
    pub leftover_time: f32,
    /// 剩余爆发数量
    pub burst_count: i32,
    /// 自上次启动以来发射的粒子数
    pub emitted: u32,
    /// 是否允许生成新粒子
    pub spawning: bool,
    /// 启动延迟剩余时间
    pub delay_remaining: f32,
}

impl Default for EmitterRuntimeState {
    fn default() -> Self {
        Self {
            time_alive: 0.0,
            leftover_time: 0.0,
            burst_count: 0,
            emitted: 0,
            spawning: true,
            delay_remaining: 0.0,
        }
    }
}

impl EmitterRuntimeState {
    /// 是否还能继续发射（`max_particles_to_emit <= 0` 表示不限）
    pub fn below_emit_cap(&self, max_particles_to_emit: i32) -> bool {
        max_particles_to_emit <= 0 || i64::from(self.emitted) < i64::from(max_particles_to_emit)
    }
}
