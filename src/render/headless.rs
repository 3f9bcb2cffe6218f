//! 无 GPU 的渲染协作者
//!
//! 所有缓冲槽都是 CPU 内存，映射状态与注册表完整记录，
//! 供测试、基准和无头演示程序使用。

use super::collaborator::{
    ModelInstanceId, RenderCollaborator, RenderObject, RenderObjectId, SlotHandle,
};
use super::material::ModelId;
use super::vertex::ParticleVertex;
use crate::core::{DeviceError, DeviceResult};
use glam::{Quat, Vec3, Vec4};
use std::collections::HashMap;

/// CPU 缓冲槽
#[derive(Debug, Clone)]
pub struct HeadlessSlot {
    pub vertices: Vec<ParticleVertex>,
    pub indices: Vec<u16>,
    pub vertex_mapped: bool,
    pub index_mapped: bool,
    /// 顶点区域被映射的次数
    pub vertex_map_count: u32,
    /// 索引区域被映射的次数
    pub index_map_count: u32,
}

/// 模型实例状态
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInstanceState {
    pub model: ModelId,
    pub position: Vec3,
    pub orientation: Quat,
    pub params: Vec<(String, Vec4)>,
}

impl ModelInstanceState {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            params: Vec::new(),
        }
    }

    /// 设置参数（同名覆盖）
    pub fn set_param(&mut self, name: &str, value: Vec4) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
    }

    pub fn param(&self, name: &str) -> Option<Vec4> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }
}

/// 操作统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessStats {
    pub registrations: u64,
    pub deregistrations: u64,
    pub slots_created: u64,
    pub slots_released: u64,
    pub models_added: u64,
    pub models_removed: u64,
}

/// 无头渲染器
#[derive(Debug)]
pub struct HeadlessRenderer {
    slots: HashMap<SlotHandle, HeadlessSlot>,
    next_slot: u32,
    registered: HashMap<RenderObjectId, RenderObject>,
    models: HashMap<ModelInstanceId, ModelInstanceState>,
    next_model: u64,
    synced: bool,
    stats: HeadlessStats,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next_slot: 0,
            registered: HashMap::new(),
            models: HashMap::new(),
            next_model: 1,
            synced: true,
            stats: HeadlessStats::default(),
        }
    }

    /// 模拟 GPU 仍在使用旧缓冲区
    pub fn set_rendering_synced(&mut self, synced: bool) {
        self.synced = synced;
    }

    pub fn slot(&self, slot: SlotHandle) -> Option<&HeadlessSlot> {
        self.slots.get(&slot)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn registered(&self, id: RenderObjectId) -> Option<&RenderObject> {
        self.registered.get(&id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    pub fn model_instance(&self, id: ModelInstanceId) -> Option<&ModelInstanceState> {
        self.models.get(&id)
    }

    pub fn model_instance_count(&self) -> usize {
        self.models.len()
    }

    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }

    fn slot_mut(&mut self, slot: SlotHandle) -> DeviceResult<&mut HeadlessSlot> {
        self.slots.get_mut(&slot).ok_or(DeviceError::UnknownSlot(slot))
    }
}

/// 将 `data` 写入 `dst[first..]`
fn write_region<T: Copy>(dst: &mut [T], first: usize, data: &[T]) -> DeviceResult<()> {
    let end = first.checked_add(data.len()).filter(|end| *end <= dst.len());
    match end {
        Some(end) => {
            dst[first..end].copy_from_slice(data);
            Ok(())
        }
        None => Err(DeviceError::OutOfBounds {
            offset: first,
            len: data.len(),
            capacity: dst.len(),
        }),
    }
}

impl RenderCollaborator for HeadlessRenderer {
    fn register(&mut self, object: &RenderObject) {
        self.stats.registrations += 1;
        self.registered.insert(object.id, object.clone());
    }

    fn deregister(&mut self, id: RenderObjectId) {
        if self.registered.remove(&id).is_some() {
            self.stats.deregistrations += 1;
        }
    }

    fn create_stream_slot(
        &mut self,
        vertex_capacity: u32,
        index_capacity: u32,
    ) -> DeviceResult<SlotHandle> {
        let handle = SlotHandle(self.next_slot);
        self.next_slot += 1;
        self.slots.insert(
            handle,
            HeadlessSlot {
                vertices: vec![ParticleVertex::default(); vertex_capacity as usize],
                indices: vec![0; index_capacity as usize],
                vertex_mapped: false,
                index_mapped: false,
                vertex_map_count: 0,
                index_map_count: 0,
            },
        );
        self.stats.slots_created += 1;
        Ok(handle)
    }

    fn release_stream_slot(&mut self, slot: SlotHandle) {
        if self.slots.remove(&slot).is_some() {
            self.stats.slots_released += 1;
        }
    }

    fn map_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        let slot = self.slot_mut(slot)?;
        slot.vertex_mapped = true;
        slot.vertex_map_count += 1;
        Ok(())
    }

    fn unmap_vertices(&mut self, slot: SlotHandle) {
        if let Some(slot) = self.slots.get_mut(&slot) {
            slot.vertex_mapped = false;
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
        let target = self.slot_mut(slot)?;
        if !target.vertex_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        write_region(&mut target.vertices, first, vertices)
    }

    fn zero_vertices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        let target = self.slot_mut(slot)?;
        if !target.vertex_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        target.vertices.fill(ParticleVertex::default());
        Ok(())
    }

    fn map_indices(&mut self, slot: SlotHandle) -> DeviceResult<()> {
        let slot = self.slot_mut(slot)?;
        slot.index_mapped = true;
        slot.index_map_count += 1;
        Ok(())
    }

    fn unmap_indices(&mut self, slot: SlotHandle) {
        if let Some(slot) = self.slots.get_mut(&slot) {
            slot.index_mapped = false;
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
        let target = self.slot_mut(slot)?;
        if !target.index_mapped {
            return Err(DeviceError::NotMapped(slot));
        }
        write_region(&mut target.indices, first, indices)
    }

    fn add_model_instance(&mut self, model: ModelId) -> ModelInstanceId {
        let id = ModelInstanceId(self.next_model);
        self.next_model += 1;
        self.models.insert(id, ModelInstanceState::new(model));
        self.stats.models_added += 1;
        id
    }

    fn remove_model_instance(&mut self, instance: ModelInstanceId) {
        if self.models.remove(&instance).is_some() {
            self.stats.models_removed += 1;
        }
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
        self.synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_mapping() {
        let mut renderer = HeadlessRenderer::new();
        let slot = renderer.create_stream_slot(8, 12).unwrap();

        let vertex = ParticleVertex::default();
        assert_eq!(
            renderer.write_vertices(slot, 0, &[vertex]),
            Err(DeviceError::NotMapped(slot))
        );

        renderer.map_vertices(slot).unwrap();
        assert!(renderer.write_vertices(slot, 7, &[vertex]).is_ok());
        assert!(matches!(
            renderer.write_vertices(slot, 7, &[vertex, vertex]),
            Err(DeviceError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_unknown_slot() {
        let mut renderer = HeadlessRenderer::new();
        assert_eq!(
            renderer.map_indices(SlotHandle(42)),
            Err(DeviceError::UnknownSlot(SlotHandle(42)))
        );
        assert!(!renderer.is_index_mapped(SlotHandle(42)));
    }

    #[test]
    fn test_model_instances() {
        let mut renderer = HeadlessRenderer::new();
        let id = renderer.add_model_instance(ModelId(3));
        renderer.set_model_position(id, Vec3::X);
        renderer.set_model_param(id, "time", Vec4::new(0.5, 0.0, 0.0, 0.0));

        let state = renderer.model_instance(id).unwrap();
        assert_eq!(state.position, Vec3::X);
        assert_eq!(state.param("time"), Some(Vec4::new(0.5, 0.0, 0.0, 0.0)));

        renderer.remove_model_instance(id);
        assert_eq!(renderer.model_instance_count(), 0);
        assert_eq!(renderer.stats().models_removed, 1);
    }
}
