//! 基于 wgpu 的渲染协作者
//!
//! 每个缓冲槽对应一对 wgpu 顶点/索引缓冲区和一份 CPU 影子数据。
//! 写映射期间只修改影子数据，取消映射时通过 `Queue::write_buffer` 整体上传。
//! GPU 完成情况通过 `Queue::on_submitted_work_done` 计数跟踪。

use super::collaborator::{
    ModelInstanceId, RenderCollaborator, RenderObject, RenderObjectId, SlotHandle,
};
use super::headless::ModelInstanceState;
use super::material::ModelId;
use super::vertex::ParticleVertex;
use crate::core::{DeviceError, DeviceResult};
use glam::{Quat, Vec3, Vec4};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// GPU 缓冲槽
struct GpuSlot {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_shadow: Vec<ParticleVertex>,
    index_shadow: Vec<u16>,
    vertex_mapped: bool,
    index_mapped: bool,
}

/// wgpu 顶点流设备
pub struct WgpuStreamDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    slots: HashMap<SlotHandle, GpuSlot>,
    next_slot: u32,
    registered: HashMap<RenderObjectId, RenderObject>,
    models: HashMap<ModelInstanceId, ModelInstanceState>,
    next_model: u64,
    /// 已提交的帧数
    submitted: u64,
    /// GPU 已完成的帧数
    completed: Arc<AtomicU64>,
}

impl WgpuStreamDevice {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            slots: HashMap::new(),
            next_slot: 0,
            registered: HashMap::new(),
            models: HashMap::new(),
            next_model: 1,
            submitted: 0,
            completed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// 宿主提交引用粒子缓冲区的命令后调用
    pub fn notify_submitted(&mut self) {
        self.submitted += 1;
        let completed = Arc::clone(&self.completed);
        self.queue.on_submitted_work_done(move || {
            completed.fetch_add(1, Ordering::AcqRel);
        });
    }

    /// 推进设备回调
    pub fn poll(&self) {
        let _ = self.device.poll(wgpu::Maintain::Poll);
    }

    /// 缓冲槽的顶点缓冲区
    pub fn vertex_buffer(&self, slot: SlotHandle) -> Option<&wgpu::Buffer> {
        self.slots.get(&slot).map(|s| &s.vertex_buffer)
    }

    /// 缓冲槽的索引缓冲区
    pub fn index_buffer(&self, slot: SlotHandle) -> Option<&wgpu::Buffer> {
        self.slots.get(&slot).map(|s| &s.index_buffer)
    }

    /// 当前注册的可渲染对象
    pub fn render_objects(&self) -> impl Iterator<Item = &RenderObject> {
        self.registered.values()
    }

    pub fn model_instance(&self, id: ModelInstanceId) -> Option<&ModelInstanceState> {
        self.models.get(&id)
    }

    fn slot_mut(&mut self, slot: SlotHandle) -> DeviceResult<&mut GpuSlot> {
        self.slots.get_mut(&slot).ok_or(DeviceError::UnknownSlot(slot))
    }

    fn create_buffer(&self, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }
}

fn write_shadow<T: Copy>(dst: &mut [T], first: usize, data: &[T]) -> DeviceResult<()> {
    match first.checked_add(data.len()) {
        Some(end) if end <= dst.len() => {
            dst[first..end].copy_from_slice(data);
            Ok(())
        }
        _ => Err(DeviceError::OutOfBounds {
            offset: first,
            len: data.len(),
            capacity: dst.len(),
        }),
    }
}

impl RenderCollaborator for WgpuStreamDevice {
    fn register(&mut self, object: &RenderObject) {
        self.registered.insert(object.id, object.clone());
    }

    fn deregister(&mut self, id: RenderObjectId) {
        self.registered.remove(&id);
    }

    fn create_stream_slot(
        &mut self,
        vertex_capacity: u32,
        index_capacity: u32,
    ) -> DeviceResult<SlotHandle> {
        if vertex_capacity == 0 || index_capacity == 0 {
            return Err(DeviceError::Allocation(format!(
                "Empty stream slot ({} vertices, {} indices)",
                vertex_capacity, index_capacity
            )));
        }

        let vertex_bytes =
            u64::from(vertex_capacity) * std::mem::size_of::<ParticleVertex>() as u64;
        // write_buffer 要求 4 字节对齐
        let index_bytes = (u64::from(index_capacity) * 2 + 3) & !3;
        let limit = self.device.limits().max_buffer_size;
        if vertex_bytes > limit || index_bytes > limit {
            return Err(DeviceError::Allocation(format!(
                "Stream slot of {} bytes exceeds device limit {}",
                vertex_bytes.max(index_bytes),
                limit
            )));
        }

        let handle = SlotHandle(self.next_slot);
        self.next_slot += 1;

        let vertex_buffer = self.create_buffer(
            &format!("Particle Vertex Stream {}", handle.0),
            vertex_bytes,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        let index_buffer = self.create_buffer(
            &format!("Particle Index Stream {}", handle.0),
            index_bytes,
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        );

        self.slots.insert(
            handle,
            GpuSlot {
                vertex_buffer,
                index_buffer,
                vertex_shadow: vec![ParticleVertex::default(); vertex_capacity as usize],
                // 补齐到 4 字节
                index_shadow: vec![0; (index_bytes / 2) as usize],
                vertex_mapped: false,
                index_mapped: false,
            },
        );
        tracing::debug!(target: "particles", slot = handle.0, vertex_bytes, index_bytes, "Created stream slot");
        Ok(handle)
    }

    fn release_stream_slot(&mut self, slot: SlotHandle) {
        if let Some(gpu) = self.slots.remove(&slot) {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
        }
    }

    fn map_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        self.slot_mut(slot)?.vertex_mapped = true;
        Ok(())
    }

    fn unmap_vertices(&mut self, slot: SlotHandle) {
        let Some(gpu) = self.slots.get_mut(&slot) else {
            return;
        };
        if gpu.vertex_mapped {
            gpu.vertex_mapped = false;
            self.queue.write_buffer(
                &gpu.vertex_buffer,
                0,
                bytemuck::cast_slice(&gpu.vertex_shadow),
            );
        }
    }

    fn is_vertex_mapped(&self, slot: SlotHandle) -> bool {
        self.slots.get(&slot).is_some_and(|s| s.vertex_mapped)
    }

    fn write_vertices(
        &mut self,
        slot: SlotHandle,
        first: usize,
        vertices: &[ParticleVertex],
    ) -> DeviceResult<()> {
        let gpu = self.slot_mut(slot)?;
        if !gpu.vertex_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        write_shadow(&mut gpu.vertex_shadow, first, vertices)
    }

    fn zero_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        let gpu = self.slot_mut(slot)?;
        if !gpu.vertex_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        gpu.vertex_shadow.fill(ParticleVertex::default());
        Ok(())
    }

    fn map_indices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        self.slot_mut(slot)?.index_mapped = true;
        Ok(())
    }

    fn unmap_indices(&mut self, slot: SlotHandle) {
        let Some(gpu) = self.slots.get_mut(&slot) else {
            return;
        };
        if gpu.index_mapped {
            gpu.index_mapped = false;
            self.queue
                .write_buffer(&gpu.index_buffer, 0, bytemuck::cast_slice(&gpu.index_shadow));
        }
    }

    fn is_index_mapped(&self, slot: SlotHandle) -> bool {
        self.slots.get(&slot).is_some_and(|s| s.index_mapped)
    }

    fn write_indices(
        &mut self,
        slot: SlotHandle,
        first: usize,
        indices: &[u16],
    ) -> DeviceResult<()> {
        let gpu = self.slot_mut(slot)?;
        if !gpu.index_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        write_shadow(&mut gpu.index_shadow, first, indices)
    }

    fn add_model_instance(&mut self, model: ModelId) -> ModelInstanceId {
        let id = ModelInstanceId(self.next_model);
        self.next_model += 1;
        self.models.insert(id, ModelInstanceState::new(model));
        id
    }

    fn remove_model_instance(&mut self, instance: ModelInstanceId) {
        self.models.remove(&instance);
    }

    fn set_model_position(&mut self, instance: ModelInstanceId, position: Vec3) {
        if let Some(state) = self.models.get_mut(&instance) {
            state.position = position;
        }
    }

    fn set_model_orientation(&mut self, instance: ModelInstanceId, orientation: Quat) {
        if let Some(state) = self.models.get_mut(&instance) {
            state.orientation = orientation;
        }
    }

    fn set_model_param(&mut self, instance: ModelInstanceId, name: &str, value: Vec4) {
        if let Some(state) = self.models.get_mut(&instance) {
            state.set_param(name, value);
        }
    }

    fn is_rendering_synced(&self) -> bool {
        self.completed.load(Ordering::Acquire) >= self.submitted
    }
}

impl Drop for WgpuStreamDevice {
    fn drop(&mut self) {
        for (_, gpu) in self.slots.drain() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
        }
    }
}
