use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 发射器随机数源
///
/// 指定种子时结果可复现，否则使用系统熵。
#[derive(Debug, Clone)]
pub struct ParticleRng {
    rng: StdRng,
}

impl ParticleRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// `[0, 1)` 内的均匀随机数
    pub fn frand(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// `min + rand * (max - min)`，`min > max` 时同样有效
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.frand() * (max - min)
    }

    /// 各分量独立采样
    pub fn vec3_between(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.range(min.x, max.x),
            self.range(min.y, max.y),
            self.range(min.z, max.z),
        )
    }

    /// 在 `[min, max]` 内均匀选取爆发数量，`max <= min` 时返回 `min`
    pub fn burst_count(&mut self, min: i32, max: i32) -> i32 {
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min
        }
    }

    /// 以 `(x, y, z, 1)` 采样并归一化的四元数，退化时返回单位四元数
    pub fn orientation_between(&mut self, min: Vec3, max: Vec3) -> Quat {
        let xyz = self.vec3_between(min, max);
        let raw = Quat::from_xyzw(xyz.x, xyz.y, xyz.z, 1.0);
        let length = raw.length();
        if length.is_finite() && length > f32::EPSILON {
            raw / length
        } else {
            Quat::IDENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = ParticleRng::new(Some(42));
        let mut b = ParticleRng::new(Some(42));
        for _ in 0..16 {
            assert_eq!(a.frand(), b.frand());
        }
    }

    #[test]
    fn test_burst_count_inclusive() {
        let mut rng = ParticleRng::new(Some(1));
        let mut seen_max = false;
        for _ in 0..500 {
            let count = rng.burst_count(2, 4);
            assert!((2..=4).contains(&count));
            seen_max |= count == 4;
        }
        assert!(seen_max);
        assert_eq!(rng.burst_count(5, 5), 5);
        assert_eq!(rng.burst_count(5, 3), 5);
    }

    #[test]
    fn test_orientation_identity_by_default() {
        let mut rng = ParticleRng::new(Some(3));
        assert_eq!(rng.orientation_between(Vec3::ZERO, Vec3::ZERO), Quat::IDENTITY);
        let q = rng.orientation_between(Vec3::splat(-1.0), Vec3::ONE);
        assert!((q.length() - 1.0).abs() < 1e-5);
    }
}
