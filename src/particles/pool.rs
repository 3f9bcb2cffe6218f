//! 粒子池
//!
//! 粒子无序存放在连续数组中，删除使用 swap-remove（O(1)，不保序）。
//!
//! 删除过程必须逆序遍历：swap-remove 会把末尾元素换到当前下标，
//! 正序遍历时这个被换来的元素会被跳过。逆序遍历时换来的元素都已处理过。

use super::particle::Particle;
use crate::render::RenderCollaborator;

/// 单个发射器拥有的粒子集合
#[derive(Debug, Default, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// 推进寿命并删除到期粒子，返回删除数量
    ///
    /// 负寿命的粒子不参与老化。寿命恰好减到 0 的粒子在本次调用中删除，
    /// `on_expire` 对每个被删除的粒子恰好调用一次。
    pub fn retain_alive<F>(&mut self, delta_time: f32, mut on_expire: F) -> usize
    where
        F: FnMut(&mut Particle),
    {
        let mut removed = 0;
        for index in (0..self.particles.len()).rev() {
            let particle = &mut self.particles[index];
            if particle.life_left < 0.0 {
                continue;
            }

            particle.life_left -= delta_time;
            if particle.life_left <= 0.0 {
                on_expire(particle);
                self.particles.swap_remove(index);
                removed += 1;
            }
        }
        removed
    }

    /// 对所有粒子调用销毁钩子并清空
    pub fn drain_shutdown<R: RenderCollaborator + ?Sized>(&mut self, renderer: &mut R) {
        for mut particle in self.particles.drain(..) {
            particle.shut_down(renderer);
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
