//! CPU 粒子系统模块
//!
//! 每个发射器在 CPU 上模拟粒子，并通过多缓冲顶点流交给渲染器。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  EmitterController                       │
//! ├─────────────────────────────────────────────────────────┤
//! │  tick（模拟阶段）                                          │
//! │     1. LifecycleIntegrator::kill_expired  逆序老化/删除    │
//! │     2. LifecycleIntegrator::integrate     速度/尺寸/颜色   │
//! │     3. SpawnScheduler::run                速率/爆发生成    │
//! │                                                          │
//! │  render_tick（发布阶段）                                   │
//! │     4. StreamPublisher::publish           N 缓冲轮转       │
//! │     5. RenderCollaborator::register       注册可渲染对象    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! let mut emitter = EmitterController::new(ParticlePreset::Fire.to_config(), HeadlessRenderer::new());
//! emitter.enable(true);
//!
//! let host = StaticHost::default();
//! loop {
//!     emitter.tick(1.0 / 60.0, &host);
//!     if let Some(published) = emitter.render_tick(&host) {
//!         // 绘制 published.slot 中的 published.index_count 个索引
//!     }
//! }
//! ```

pub mod curve;
pub mod effect;
pub mod emitter;
pub mod emitter_config;
pub mod lifecycle;
pub mod particle;
pub mod pool;
pub mod presets;
mod property_tests;
pub mod random;
pub mod spawn;
pub mod state;
pub mod stream;

pub use curve::{evaluate_or_lerp, Curve, CurveKey, CurveValue};
pub use effect::{
    particle_schedule, publish_particle_effects, simulate_particle_effects, ParticleEffect,
    SharedEmitter,
};
pub use emitter::{EmitterController, EmitterHost, EmitterState, StaticHost};
pub use emitter_config::{BillboardType, EmissionMode, EmitterConfig, ModelTemplate};
pub use lifecycle::{quantize_color, DerivedAttributes, LifecycleIntegrator};
pub use particle::Particle;
pub use pool::ParticlePool;
pub use presets::ParticlePreset;
pub use random::ParticleRng;
pub use spawn::SpawnScheduler;
pub use state::EmitterRuntimeState;
pub use stream::{PublishedSlot, StreamPublisher};
