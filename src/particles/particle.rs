use crate::render::{ModelInstanceId, RenderCollaborator};
use glam::Vec3;

/// 单个粒子
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// 当前旋转角度（弧度）
    pub rotation: f32,
    pub start_size: Vec3,
    pub end_size: Vec3,
    /// 剩余寿命
    pub life_left: f32,
    pub total_life: f32,
    pub start_velocity: Vec3,
    pub end_velocity: Vec3,
    pub start_rotation_rate: f32,
    pub end_rotation_rate: f32,
    /// 生成时采样的随机数，供着色器做逐粒子变化
    pub randoms: [f32; 3],
    /// 模型发射器模式下拥有的模型实例
    pub model: Option<ModelInstanceId>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            start_size: Vec3::ONE,
            end_size: Vec3::ONE,
            life_left: 0.0,
            total_life: 1.0,
            start_velocity: Vec3::ZERO,
            end_velocity: Vec3::ZERO,
            start_rotation_rate: 0.0,
            end_rotation_rate: 0.0,
            randoms: [0.0; 3],
            model: None,
        }
    }
}

impl Particle {
    /// 已度过的生命比例
    pub fn normalized_time(&self) -> f32 {
        if self.total_life > 0.0 {
            (self.total_life - self.life_left) / self.total_life
        } else {
            1.0
        }
    }

    /// 已存活时长
    pub fn age(&self) -> f32 {
        self.total_life - self.life_left
    }

    /// 销毁钩子：释放拥有的模型实例
    pub fn shut_down<R: RenderCollaborator + ?Sized>(&mut self, renderer: &mut R) {
        if let Some(model) = self.model.take() {
            renderer.remove_model_instance(model);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessRenderer, ModelId};

    #[test]
    fn test_normalized_time() {
        let particle = Particle {
            life_left: 1.0,
            total_life: 4.0,
            ..Default::default()
        };
        assert_eq!(particle.normalized_time(), 0.75);
        assert_eq!(particle.age(), 3.0);
    }

    #[test]
    fn test_shut_down_releases_model_once() {
        let mut renderer = HeadlessRenderer::new();
        let model = renderer.add_model_instance(ModelId(1));
        let mut particle = Particle {
            model: Some(model),
            ..Default::default()
        };

        particle.shut_down(&mut renderer);
        particle.shut_down(&mut renderer);
        assert_eq!(renderer.model_instance_count(), 0);
        assert_eq!(renderer.stats().models_removed, 1);
        assert!(particle.model.is_none());
    }
}
