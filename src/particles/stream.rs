//! 顶点流发布
//!
//! N 个缓冲槽轮转使用：
//!
//! ```text
//!   fill   ── 当前帧写入的槽（保持写映射）
//!   render ── 上一次写满并已取消映射、交给渲染器消费的槽
//! ```
//!
//! 每次发布先把四边形写入 fill 槽，然后 render = fill，fill 前进到下一个槽并重新映射、清零。
//! 因此交给渲染器的槽永远不会同时处于写映射状态。
//! 索引缓冲在槽初始化时一次性写入，之后不再修改。

use crate::config::StreamConfig;
use crate::core::DeviceResult;
use crate::render::{
    quad_indices, ParticleQuad, ParticleVertex, RenderCollaborator, SlotHandle, QUAD_UVS,
};

/// 本帧可供消费的缓冲槽
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedSlot {
    pub slot: SlotHandle,
    /// 在轮转环中的下标
    pub index: usize,
    pub quad_count: u32,
    pub index_count: u32,
}

/// 多缓冲顶点流发布器
#[derive(Debug)]
pub struct StreamPublisher {
    config: StreamConfig,
    slots: Vec<SlotHandle>,
    /// 每个槽最近写入的四边形数
    slot_quads: Vec<u32>,
    fill: Option<usize>,
    render: Option<usize>,
    /// 复用的顶点暂存
    staging: Vec<ParticleVertex>,
}

impl StreamPublisher {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            slot_quads: Vec::new(),
            fill: None,
            render: None,
            staging: Vec::new(),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SlotHandle] {
        &self.slots
    }

    /// 当前写入中的槽
    pub fn fill_slot(&self) -> Option<SlotHandle> {
        self.fill.map(|i| self.slots[i])
    }

    /// 最近写满、交给渲染器的槽
    pub fn render_slot(&self) -> Option<SlotHandle> {
        self.render.map(|i| self.slots[i])
    }

    /// 首次使用时创建并初始化所有缓冲槽
    fn ensure_slots<R: RenderCollaborator + ?Sized>(&mut self, renderer: &mut R) -> DeviceResult<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let vertex_capacity = self.config.vertex_capacity();
        let index_capacity = self.config.index_capacity();
        let initial_vertices: Vec<ParticleVertex> = (0..vertex_capacity as usize)
            .map(|i| ParticleVertex {
                uv: QUAD_UVS[i % 4],
                ..Default::default()
            })
            .collect();
        let indices = quad_indices(self.config.max_quads);

        let mut created = Vec::with_capacity(self.config.buffer_count);
        for _ in 0..self.config.buffer_count {
            let result = renderer
                .create_stream_slot(vertex_capacity, index_capacity)
                .and_then(|slot| {
                    created.push(slot);
                    init_slot(renderer, slot, &initial_vertices, &indices)
                });
            if let Err(err) = result {
                for slot in created {
                    renderer.unmap_vertices(slot);
                    renderer.unmap_indices(slot);
                    renderer.release_stream_slot(slot);
                }
                return Err(err);
            }
        }

        tracing::debug!(
            target: "particles",
            slots = created.len(),
            vertex_capacity,
            index_capacity,
            "Initialized particle stream slots"
        );
        self.slot_quads = vec![0; created.len()];
        self.slots = created;
        Ok(())
    }

    /// 写入本帧四边形并轮转缓冲槽
    ///
    /// 返回本帧交给渲染器的槽；第一次发布时还没有写满的槽，返回 `None`。
    /// 超出单槽容量的四边形被丢弃。
    pub fn publish<R: RenderCollaborator + ?Sized>(
        &mut self,
        renderer: &mut R,
        quads: &[ParticleQuad],
    ) -> DeviceResult<Option<PublishedSlot>> {
        self.ensure_slots(renderer)?;

        if let Some(fill) = self.fill {
            let max_quads = self.config.max_quads as usize;
            if quads.len() > max_quads {
                tracing::debug!(
                    target: "particles",
                    quads = quads.len(),
                    max_quads,
                    "Particle stream slot full, dropping quads"
                );
            }
            let visible = &quads[..quads.len().min(max_quads)];

            self.staging.clear();
            self.staging.extend(visible.iter().flat_map(|quad| quad.vertices()));
            renderer.write_vertices(self.slots[fill], 0, &self.staging)?;
            self.slot_quads[fill] = visible.len() as u32;
        }

        self.render = self.fill;
        let next = match self.fill {
            None => 0,
            Some(fill) => {
                renderer.unmap_vertices(self.slots[fill]);
                fill
            }
        };
        let next = (next + 1) % self.slots.len();
        self.fill = Some(next);

        let fill_slot = self.slots[next];
        renderer.map_vertices(fill_slot)?;
        renderer.zero_vertices(fill_slot)?;

        Ok(self.render.map(|index| {
            let quad_count = self.slot_quads[index];
            PublishedSlot {
                slot: self.slots[index],
                index,
                quad_count,
                index_count: quad_count * 6,
            }
        }))
    }

    /// 释放所有写映射并重置轮转状态，缓冲槽本身保留
    pub fn release_mappings<R: RenderCollaborator + ?Sized>(&mut self, renderer: &mut R) {
        for &slot in &self.slots {
            if renderer.is_vertex_mapped(slot) {
                renderer.unmap_vertices(slot);
            }
            if renderer.is_index_mapped(slot) {
                renderer.unmap_indices(slot);
            }
        }
        self.fill = None;
        self.render = None;
        self.slot_quads.iter_mut().for_each(|count| *count = 0);
    }

    /// 释放映射并销毁所有缓冲槽
    pub fn release_slots<R: RenderCollaborator + ?Sized>(&mut self, renderer: &mut R) {
        self.release_mappings(renderer);
        for slot in self.slots.drain(..) {
            renderer.release_stream_slot(slot);
        }
        self.slot_quads.clear();
    }
}

fn init_slot<R: RenderCollaborator + ?Sized>(
    renderer: &mut R,
    slot: SlotHandle,
    vertices: &[ParticleVertex],
    indices: &[u16],
) -> DeviceResult<()> {
    renderer.map_vertices(slot)?;
    renderer.write_vertices(slot, 0, vertices)?;
    renderer.unmap_vertices(slot);

    renderer.map_indices(slot)?;
    renderer.write_indices(slot, 0, indices)?;
    renderer.unmap_indices(slot);
    Ok(())
}
