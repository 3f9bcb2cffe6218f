//! 发射器控制器
//!
//! 每个发射器实例的状态机，驱动生命周期积分、生成调度和顶点流发布。
//!
//! ```text
//!            enable(true)                 延迟耗尽
//! Disabled ───────────────▶ DelayedStart ──────────▶ Spawning
//!     │        (无延迟)                                 │
//!     └───────────────────────────────────────────────▶│
//!                                                       │ enable(false) / 持续时间结束且无粒子
//!                                                       ▼
//!                                                    Stopped
//! ```
//!
//! 每帧分两个阶段调用：先对所有发射器 [`EmitterController::tick`]，
//! 再对所有发射器 [`EmitterController::render_tick`]。

use super::emitter_config::{EmissionMode, EmitterConfig};
use super::lifecycle::LifecycleIntegrator;
use super::pool::ParticlePool;
use super::random::ParticleRng;
use super::spawn::SpawnScheduler;
use super::state::EmitterRuntimeState;
use super::stream::{PublishedSlot, StreamPublisher};
use crate::config::ParticleEngineConfig;
use crate::render::{
    resolve_materials, ParticleQuad, RenderCollaborator, RenderObject, RenderObjectId,
    RenderPass, ShaderParamOverrides,
};
use glam::{Quat, Vec3};

/// 发射器宿主（所属实体）提供的能力
pub trait EmitterHost {
    fn position(&self) -> Vec3;
    fn scale(&self) -> Vec3;
    fn orientation(&self) -> Quat;
}

/// 固定变换的宿主
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticHost {
    pub position: Vec3,
    pub scale: Vec3,
    pub orientation: Quat,
}

impl Default for StaticHost {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            orientation: Quat::IDENTITY,
        }
    }
}

impl StaticHost {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

impl EmitterHost for StaticHost {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn orientation(&self) -> Quat {
        self.orientation
    }
}

/// 发射器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// 尚未启用
    Disabled,
    /// 启动延迟倒计时中
    DelayedStart,
    /// 正常运行
    Spawning,
    /// 已停止，资源已释放
    Stopped,
}

/// 发射器控制器
pub struct EmitterController<R: RenderCollaborator> {
    config: EmitterConfig,
    runtime: EmitterRuntimeState,
    state: EmitterState,
    pool: ParticlePool,
    publisher: StreamPublisher,
    renderer: R,
    rng: ParticleRng,
    /// 最近一次模拟得到的四边形，渲染帧时写入顶点流
    quads: Vec<ParticleQuad>,
    materials: Vec<ShaderParamOverrides>,
    render_object_id: RenderObjectId,
    registered: bool,
    restart_expired: bool,
}

impl<R: RenderCollaborator> EmitterController<R> {
    /// 使用默认引擎配置创建
    pub fn new(config: EmitterConfig, renderer: R) -> Self {
        Self::with_settings(config, renderer, &ParticleEngineConfig::default())
    }

    pub fn with_settings(config: EmitterConfig, renderer: R, settings: &ParticleEngineConfig) -> Self {
        let materials = resolve_materials(&config.materials);
        Self {
            config,
            runtime: EmitterRuntimeState::default(),
            state: EmitterState::Disabled,
            pool: ParticlePool::new(),
            publisher: StreamPublisher::new(settings.stream.clone()),
            renderer,
            rng: ParticleRng::new(settings.simulation.seed),
            quads: Vec::new(),
            materials,
            render_object_id: RenderObjectId::next(),
            registered: false,
            restart_expired: settings.simulation.restart_expired,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, EmitterState::DelayedStart | EmitterState::Spawning)
    }

    pub fn is_spawning(&self) -> bool {
        self.runtime.spawning
    }

    pub fn particle_count(&self) -> usize {
        self.pool.len()
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn emitted_count(&self) -> u32 {
        self.runtime.emitted
    }

    pub fn burst_count(&self) -> i32 {
        self.runtime.burst_count
    }

    pub fn time_alive(&self) -> f32 {
        self.runtime.time_alive
    }

    pub fn leftover_time(&self) -> f32 {
        self.runtime.leftover_time
    }

    pub fn runtime(&self) -> &EmitterRuntimeState {
        &self.runtime
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// 编辑配置；修改材质列表后需调用 `editor_change("Materials")`
    pub fn config_mut(&mut self) -> &mut EmitterConfig {
        &mut self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn publisher(&self) -> &StreamPublisher {
        &self.publisher
    }

    pub fn render_object_id(&self) -> RenderObjectId {
        self.render_object_id
    }

    pub fn materials(&self) -> &[ShaderParamOverrides] {
        &self.materials
    }

    /// 启用或禁用发射器
    ///
    /// 启用已启用的发射器不做任何事；禁用在任何状态下都可重复调用。
    pub fn enable(&mut self, enabled: bool) {
        if enabled {
            if self.is_enabled() {
                return;
            }
            self.runtime.spawning = true;
            self.runtime.emitted = 0;
            self.runtime.time_alive = 0.0;
            self.runtime.burst_count = 0;

            if self.config.start_delay > 0.0 {
                self.runtime.delay_remaining = self.config.start_delay;
                self.state = EmitterState::DelayedStart;
            } else {
                self.begin_spawning();
            }
            tracing::debug!(target: "particles", id = self.render_object_id.0, state = ?self.state, "Emitter enabled");
        } else {
            self.renderer.deregister(self.render_object_id);
            self.registered = false;
            self.publisher.release_mappings(&mut self.renderer);
            self.pool.drain_shutdown(&mut self.renderer);
            self.quads.clear();
            self.runtime.leftover_time = 0.0;
            if self.state != EmitterState::Stopped {
                tracing::debug!(target: "particles", id = self.render_object_id.0, "Emitter disabled");
            }
            self.state = EmitterState::Stopped;
        }
    }

    /// 暂停或恢复生成，不影响已存在的粒子
    pub fn enable_new_spawns(&mut self, enabled: bool) {
        if self.runtime.spawning == enabled {
            return;
        }
        self.runtime.spawning = enabled;
        self.runtime.leftover_time = 0.0;
    }

    fn begin_spawning(&mut self) {
        self.runtime.time_alive = 0.0;
        self.runtime.burst_count = if self.config.max_burst_count > 0 {
            self.rng
                .burst_count(self.config.min_burst_count, self.config.max_burst_count)
        } else {
            0
        };
        self.state = EmitterState::Spawning;
    }

    /// 模拟阶段：老化、积分并生成粒子
    pub fn tick(&mut self, delta_time: f32, host: &dyn EmitterHost) {
        match self.state {
            EmitterState::Disabled | EmitterState::Stopped => return,
            EmitterState::DelayedStart => {
                self.runtime.delay_remaining -= delta_time;
                if self.runtime.delay_remaining > 0.0 {
                    return;
                }
                self.begin_spawning();
            }
            EmitterState::Spawning => {}
        }

        if SpawnScheduler::is_degenerate(&self.config) {
            tracing::trace!(target: "particles", id = self.render_object_id.0, "Degenerate emitter config, skipping tick");
            return;
        }

        let orientation = host.orientation();
        let integrator = LifecycleIntegrator::new(&self.config, host.scale(), orientation);
        integrator.kill_expired(&mut self.pool, delta_time, &mut self.renderer);
        self.quads.clear();
        integrator.integrate(&mut self.pool, delta_time, &mut self.renderer, &mut self.quads);

        self.runtime.time_alive += delta_time;
        if self.config.duration_elapsed(self.runtime.time_alive) && self.runtime.burst_count <= 0 {
            return;
        }

        let scheduler = SpawnScheduler::new(&self.config, host.position(), orientation);
        scheduler.run(
            delta_time,
            &mut self.runtime,
            &mut self.pool,
            &mut self.rng,
            &mut self.renderer,
        );
    }

    /// 渲染阶段：处理过期/禁用，写入顶点流并注册可渲染对象
    pub fn render_tick(&mut self, host: &dyn EmitterHost) -> Option<PublishedSlot> {
        // 延迟期间尚未开始计时，不参与过期判断
        let expired = self.state != EmitterState::DelayedStart
            && self.config.duration_elapsed(self.runtime.time_alive);

        if self.restart_expired && self.is_enabled() && expired && self.runtime.burst_count <= 0 {
            tracing::debug!(target: "particles", id = self.render_object_id.0, "Restarting expired emitter");
            self.stop_system();
            self.enable(false);
            self.enable(true);
            return None;
        }

        if !self.is_enabled() {
            if self.registered || self.publisher.fill_slot().is_some() {
                self.stop_system();
            }
            return None;
        }

        if expired && self.pool.is_empty() {
            tracing::debug!(target: "particles", id = self.render_object_id.0, "Emitter expired");
            self.stop_system();
            self.enable(false);
            return None;
        }

        if EmissionMode::select(&self.config).is_model() {
            return None;
        }

        let published = match self.publisher.publish(&mut self.renderer, &self.quads) {
            Ok(published) => published,
            Err(err) => {
                tracing::warn!(target: "particles", id = self.render_object_id.0, error = %err, "Failed to publish particle stream");
                return None;
            }
        };

        let object = RenderObject {
            id: self.render_object_id,
            pass: RenderPass::Translucent,
            position: host.position(),
            orientation: Quat::IDENTITY,
            render_order_bias: self.config.render_order_bias,
            materials: self.materials.clone(),
            slot: published.map(|p| p.slot),
            index_count: published.map_or(0, |p| p.index_count),
        };
        self.renderer.register(&object);
        self.registered = true;

        published
    }

    /// 停止系统：注销渲染对象、释放写映射、销毁所有粒子
    ///
    /// 调用方必须保证 GPU 不再引用旧缓冲区；否则记录错误后继续。
    pub fn stop_system(&mut self) {
        if !self.renderer.is_rendering_synced() {
            tracing::error!(
                target: "particles",
                id = self.render_object_id.0,
                "Stopping particle system while GPU work still references its buffers"
            );
        }

        self.renderer.deregister(self.render_object_id);
        self.registered = false;
        self.publisher.release_mappings(&mut self.renderer);
        self.pool.drain_shutdown(&mut self.renderer);
        self.quads.clear();
        self.runtime.leftover_time = 0.0;
    }

    /// 编辑器属性变更通知，返回是否处理
    pub fn editor_change(&mut self, property: &str) -> bool {
        match property {
            "Materials" => {
                self.materials = resolve_materials(&self.config.materials);
                true
            }
            _ => false,
        }
    }
}

impl<R: RenderCollaborator> Drop for EmitterController<R> {
    fn drop(&mut self) {
        self.stop_system();
        self.publisher.release_slots(&mut self.renderer);
    }
}
