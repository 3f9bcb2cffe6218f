//! 渲染协作者接口
//!
//! 发射器不直接依赖全局渲染器，而是在构造时注入一个实现了 [`RenderCollaborator`]
//! 的对象。它负责：
//!
//! - 注册/注销可渲染对象
//! - 顶点流缓冲槽的创建、写映射与释放
//! - 模型发射器模式下的模型实例
//! - 查询引用旧缓冲区的 GPU 工作是否已完成
//!
//! 多个发射器共享同一个渲染器时使用 `Arc<Mutex<T>>` 或 `Rc<RefCell<T>>`。

use super::material::{ModelId, ShaderParamOverrides};
use super::vertex::ParticleVertex;
use crate::core::DeviceResult;
use glam::{Quat, Vec3, Vec4};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// 顶点流缓冲槽句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle(pub u32);

/// 可渲染对象 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderObjectId(pub u64);

impl RenderObjectId {
    /// 分配一个进程内唯一的 ID
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// 模型实例 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelInstanceId(pub u64);

/// 渲染通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    Opaque,
    Translucent,
}

/// 发射器交给渲染器的每帧数据
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    pub id: RenderObjectId,
    pub pass: RenderPass,
    pub position: Vec3,
    pub orientation: Quat,
    pub render_order_bias: f32,
    pub materials: Vec<ShaderParamOverrides>,
    /// 可供消费的已写满缓冲槽
    pub slot: Option<SlotHandle>,
    /// 该缓冲槽的索引数
    pub index_count: u32,
}

/// 渲染协作者
pub trait RenderCollaborator {
    /// 注册（或更新）可渲染对象
    fn register(&mut self, object: &RenderObject);
    /// 注销可渲染对象
    fn deregister(&mut self, id: RenderObjectId);

    /// 创建顶点流缓冲槽
    fn create_stream_slot(
        &mut self,
        vertex_capacity: u32,
        index_capacity: u32,
    ) -> DeviceResult<SlotHandle>;
    /// 释放顶点流缓冲槽
    fn release_stream_slot(&mut self, slot: SlotHandle);

    fn map_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()>;
    fn unmap_vertices(&mut self, slot: SlotHandle);
    fn is_vertex_mapped(&self, slot: SlotHandle) -> bool;
    /// 从 `first` 开始写入顶点，缓冲槽必须处于写映射状态
    fn write_vertices(
        &mut self,
        slot: SlotHandle,
        first: usize,
        vertices: &[ParticleVertex],
    ) -> DeviceResult<()>;
    /// 清零整个顶点区域，缓冲槽必须处于写映射状态
    fn zero_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()>;

    fn map_indices(&mut self, slot: SlotHandle) -> DeviceResult<()>;
    fn unmap_indices(&mut self, slot: SlotHandle);
    fn is_index_mapped(&self, slot: SlotHandle) -> bool;
    fn write_indices(&mut self, slot: SlotHandle, first: usize, indices: &[u16])
        -> DeviceResult<()>;

    /// 创建并注册模型实例
    fn add_model_instance(&mut self, model: ModelId) -> ModelInstanceId;
    /// 注销模型实例
    fn remove_model_instance(&mut self, instance: ModelInstanceId);
    fn set_model_position(&mut self, instance: ModelInstanceId, position: Vec3);
    fn set_model_orientation(&mut self, instance: ModelInstanceId, orientation: Quat);
    fn set_model_param(&mut self, instance: ModelInstanceId, name: &str, value: Vec4);

    /// 引用旧缓冲区的 GPU 工作是否已全部完成
    fn is_rendering_synced(&self) -> bool;
}

macro_rules! forward_collaborator {
    ($ty:ty, |$this:ident| $write:expr, $read:expr) => {
        impl<T: RenderCollaborator + ?Sized> RenderCollaborator for $ty {
            fn register(&mut self, object: &RenderObject) {
                let $this = self;
                $write.register(object)
            }
            fn deregister(&mut self, id: RenderObjectId) {
                let $this = self;
                $write.deregister(id)
            }
            fn create_stream_slot(
                &mut self,
                vertex_capacity: u32,
                index_capacity: u32,
            ) -> DeviceResult<SlotHandle> {
                let $this = self;
                $write.create_stream_slot(vertex_capacity, index_capacity)
            }
            fn release_stream_slot(&mut self, slot: SlotHandle) {
                let $this = self;
                $write.release_stream_slot(slot)
            }
            fn map_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
                let $this = self;
                $write.map_vertices(slot)
            }
            fn unmap_vertices(&mut self, slot: SlotHandle) {
                let $this = self;
                $write.unmap_vertices(slot)
            }
            fn is_vertex_mapped(&self, slot: SlotHandle) -> bool {
                let $this = self;
                $read.is_vertex_mapped(slot)
            }
            fn write_vertices(
                &mut self,
                slot: SlotHandle,
                first: usize,
                vertices: &[ParticleVertex],
            ) -> DeviceResult<()> {
                let $this = self;
                $write.write_vertices(slot, first, vertices)
            }
            fn zero_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
                let $this = self;
                $write.zero_vertices(slot)
            }
            fn map_indices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
                let $this = self;
                $write.map_indices(slot)
            }
            fn unmap_indices(&mut self, slot: SlotHandle) {
                let $this = self;
                $write.unmap_indices(slot)
            }
            fn is_index_mapped(&self, slot: SlotHandle) -> bool {
                let $this = self;
                $read.is_index_mapped(slot)
            }
            fn write_indices(
                &mut self,
                slot: SlotHandle,
                first: usize,
                indices: &[u16],
            ) -> DeviceResult<()> {
                let $this = self;
                $write.write_indices(slot, first, indices)
            }
            fn add_model_instance(&mut self, model: ModelId) -> ModelInstanceId {
                let $this = self;
                $write.add_model_instance(model)
            }
            fn remove_model_instance(&mut self, instance: ModelInstanceId) {
                let $this = self;
                $write.remove_model_instance(instance)
            }
            fn set_model_position(&mut self, instance: ModelInstanceId, position: Vec3) {
                let $this = self;
                $write.set_model_position(instance, position)
            }
            fn set_model_orientation(&mut self, instance: ModelInstanceId, orientation: Quat) {
                let $this = self;
                $write.set_model_orientation(instance, orientation)
            }
            fn set_model_param(&mut self, instance: ModelInstanceId, name: &str, value: Vec4) {
                let $this = self;
                $write.set_model_param(instance, name, value)
            }
            fn is_rendering_synced(&self) -> bool {
                let $this = self;
                $read.is_rendering_synced()
            }
        }
    };
}

// 锁中毒时继续使用内部数据：协作者状态只是缓冲区簿记
forward_collaborator!(
    Arc<Mutex<T>>,
    |this| this.lock().unwrap_or_else(PoisonError::into_inner),
    this.lock().unwrap_or_else(PoisonError::into_inner)
);

forward_collaborator!(Rc<RefCell<T>>, |this| this.borrow_mut(), this.borrow());

/// 多线程共享的渲染协作者（ECS 资源使用）
pub type SharedRenderer = Arc<Mutex<dyn RenderCollaborator + Send>>;

/// 包装为 [`SharedRenderer`]
pub fn shared<R: RenderCollaborator + Send + 'static>(renderer: R) -> SharedRenderer {
    Arc::new(Mutex::new(renderer))
}
