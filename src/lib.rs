//! # Particle Engine
//!
//! CPU particle emitters that stream their quads into multi-buffered
//! GPU-visible vertex buffers.
//!
//! ## Features
//!
//! - **Spawn Scheduling**: rate and burst emission with fractional time carry-over
//! - **Lifecycle Integration**: curve-driven or interpolated velocity, size, color and rotation
//! - **Vertex Streaming**: N-buffer rotation that never hands a slot being written to the renderer
//! - **Model Emitters**: each particle drives its own model instance
//! - **ECS Integration**: bevy_ecs component and systems for per-entity effects
//!
//! ## Architecture Design
//!
//! The simulation core never talks to a global renderer. Each
//! [`particles::EmitterController`] is constructed with a
//! [`render::RenderCollaborator`]; [`render::HeadlessRenderer`] makes the whole
//! pipeline testable without a graphics device, [`render::WgpuStreamDevice`]
//! backs the slots with wgpu buffers.
//!
//! ### Example
//!
//! ```ignore
//! use particle_engine::particles::{EmitterController, ParticlePreset, StaticHost};
//! use particle_engine::render::HeadlessRenderer;
//!
//! let mut emitter = EmitterController::new(ParticlePreset::Fire.to_config(), HeadlessRenderer::new());
//! emitter.enable(true);
//! emitter.tick(1.0 / 60.0, &StaticHost::default());
//! let published = emitter.render_tick(&StaticHost::default());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Errors, logging and shared macros
//! - [`config`]: Engine configuration
//! - [`render`]: Render collaborator interface and implementations
//! - [`particles`]: Emitters, scheduling, integration and streaming
//! - [`ecs`]: Transform and time types used by the particle systems

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Render collaborator interface, vertex layout and materials
pub mod render;
/// Particle simulation and vertex streaming
pub mod particles;
/// ECS types consumed by the particle systems
pub mod ecs;

pub use crate::core::{ParticleError, ParticleResult};
