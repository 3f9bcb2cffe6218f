use crate::particles::EmitterHost;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub pos: Vec3,
    pub rot: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            rot: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(pos: Vec3) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }
}

impl EmitterHost for Transform {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn orientation(&self) -> Quat {
        self.rot
    }
}

/// 帧时间
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
    pub frame_count: u64,
}

impl Time {
    /// 推进一帧
    pub fn advance(&mut self, delta_seconds: f32) {
        self.delta_seconds = delta_seconds;
        self.elapsed_seconds += f64::from(delta_seconds);
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_as_host() {
        let transform = Transform {
            pos: Vec3::new(1.0, 2.0, 3.0),
            rot: Quat::from_rotation_z(1.0),
            scale: Vec3::splat(2.0),
        };
        let host: &dyn EmitterHost = &transform;
        assert_eq!(host.position(), transform.pos);
        assert_eq!(host.orientation(), transform.rot);
        assert_eq!(host.scale(), Vec3::splat(2.0));
    }

    #[test]
    fn test_time_advance() {
        let mut time = Time::default();
        time.advance(0.5);
        time.advance(0.25);
        assert_eq!(time.delta_seconds, 0.25);
        assert_eq!(time.elapsed_seconds, 0.75);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn test_entity_with_transform() {
        let mut world = World::new();
        let entity = world.spawn(Transform::from_position(Vec3::X)).id();
        assert_eq!(world.get::<Transform>(entity).map(|t| t.pos), Some(Vec3::X));
    }
}
