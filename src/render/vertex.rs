//! 粒子顶点格式
//!
//! 每个粒子四边形由四个属性相同、仅 UV 角不同的顶点组成。

/// 四边形四个角的 UV
pub const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// 每个四边形的索引模式（相对于四边形的首顶点）
pub const QUAD_INDEX_PATTERN: [u16; 6] = [2, 1, 0, 3, 2, 0];

/// 粒子顶点
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleVertex {
    /// 世界空间位置
    pub position: [f32; 3],
    /// 四边形角 UV
    pub uv: [f32; 2],
    /// RGBA8 颜色
    pub color: [u8; 4],
    /// 旋转角度（弧度）
    pub rotation: f32,
    /// 尺寸
    pub scale: f32,
    /// 朝向（沿速度对齐或发射器前向）
    pub direction: [f32; 3],
    /// [billboard 类型, 随机数0, 随机数1, 随机数2]
    pub billboard: [u8; 4],
}

impl Default for ParticleVertex {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl ParticleVertex {
    /// 获取顶点缓冲区布局
    pub fn vertex_buffer_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 7] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x2,
            2 => Unorm8x4,
            3 => Float32,
            4 => Float32,
            5 => Float32x3,
            6 => Uint8x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// 单个粒子在当前帧的可见属性
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleQuad {
    pub position: glam::Vec3,
    pub color: [u8; 4],
    pub rotation: f32,
    pub scale: f32,
    pub direction: glam::Vec3,
    pub billboard: [u8; 4],
}

impl ParticleQuad {
    /// 展开为四个顶点
    pub fn vertices(&self) -> [ParticleVertex; 4] {
        QUAD_UVS.map(|uv| ParticleVertex {
            position: self.position.to_array(),
            uv,
            color: self.color,
            rotation: self.rotation,
            scale: self.scale,
            direction: self.direction.to_array(),
            billboard: self.billboard,
        })
    }
}

/// 生成 `quad_count` 个四边形的索引
pub fn quad_indices(quad_count: u32) -> Vec<u16> {
    let mut indices = Vec::with_capacity(quad_count as usize * 6);
    for quad in 0..quad_count {
        let base = (quad * 4) as u16;
        indices.extend(QUAD_INDEX_PATTERN.iter().map(|offset| base + offset));
    }
    indices
}
