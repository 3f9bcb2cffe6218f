//! 渲染协作层
//!
//! 粒子核心只通过 [`RenderCollaborator`] 与渲染器交互：
//!
//! - [`HeadlessRenderer`]: CPU 实现，测试与无头运行使用
//! - [`WgpuStreamDevice`]: wgpu 缓冲区实现

pub mod collaborator;
pub mod headless;
pub mod material;
pub mod vertex;
pub mod wgpu_device;

pub use collaborator::{
    shared, ModelInstanceId, RenderCollaborator, RenderObject, RenderObjectId, RenderPass,
    SharedRenderer, SlotHandle,
};
pub use headless::{HeadlessRenderer, HeadlessSlot, HeadlessStats, ModelInstanceState};
pub use material::{
    resolve_materials, Material, ModelId, ShaderId, ShaderOverride, ShaderParam,
    ShaderParamOverrides, ShaderParamValue, TextureId,
};
pub use vertex::{quad_indices, ParticleQuad, ParticleVertex, QUAD_INDEX_PATTERN, QUAD_UVS};
pub use wgpu_device::WgpuStreamDevice;
