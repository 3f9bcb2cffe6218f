//! 生命周期曲线
//!
//! 以归一化生命周期 `t ∈ [0,1]` 为键的动画曲线。空曲线不是错误，
//! 调用方回退到起止值之间的线性插值（见 [`evaluate_or_lerp`]）。

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// 可插值的曲线值
pub trait CurveValue: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl CurveValue for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl CurveValue for Vec3 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec3::lerp(self, other, t)
    }
}

impl CurveValue for Vec4 {
    fn lerp(self, other: Self, t: f32) -> Self {
        Vec4::lerp(self, other, t)
    }
}

/// 曲线关键帧
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey<T> {
    /// 归一化时间
    pub time: f32,
    pub value: T,
}

/// 按时间排序的关键帧曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey<T>>", into = "Vec<CurveKey<T>>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Curve<T> {
    keys: Vec<CurveKey<T>>,
}

impl<T> Default for Curve<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> From<Vec<CurveKey<T>>> for Curve<T> {
    fn from(mut keys: Vec<CurveKey<T>>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }
}

impl<T> From<Curve<T>> for Vec<CurveKey<T>> {
    fn from(curve: Curve<T>) -> Self {
        curve.keys
    }
}

impl<T: CurveValue> Curve<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 `(time, value)` 对构建
    pub fn from_points(points: &[(f32, T)]) -> Self {
        points
            .iter()
            .map(|&(time, value)| CurveKey { time, value })
            .collect::<Vec<_>>()
            .into()
    }

    /// 插入关键帧，保持时间有序
    pub fn add_key(mut self, time: f32, value: T) -> Self {
        let index = self.keys.partition_point(|k| k.time <= time);
        self.keys.insert(index, CurveKey { time, value });
        self
    }

    pub fn keys(&self) -> &[CurveKey<T>] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 在 `t` 处求值，`t` 被钳制到 `[0,1]`；空曲线返回 `None`
    pub fn evaluate(&self, t: f32) -> Option<T> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        let t = t.clamp(0.0, 1.0);

        if t <= first.time {
            return Some(first.value);
        }
        if t >= last.time {
            return Some(last.value);
        }

        // first.time < t < last.time，因此 1 <= index < len
        let index = self.keys.partition_point(|k| k.time <= t);
        let a = &self.keys[index - 1];
        let b = &self.keys[index];
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return Some(b.value);
        }
        Some(a.value.lerp(b.value, (t - a.time) / span))
    }
}

/// 曲线求值，空曲线时在 `start` 与 `end` 之间线性插值
pub fn evaluate_or_lerp<T: CurveValue>(curve: &Curve<T>, t: f32, start: T, end: T) -> T {
    curve.evaluate(t).unwrap_or_else(|| start.lerp(end, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve() {
        let curve = Curve::<f32>::new();
        assert_eq!(curve.evaluate(0.5), None);
        assert_eq!(evaluate_or_lerp(&curve, 0.25, 0.0, 4.0), 1.0);
    }

    #[test]
    fn test_interpolates_between_keys() {
        let curve = Curve::new().add_key(1.0, 0.0).add_key(0.0, 2.0).add_key(0.5, 1.0);
        assert_eq!(curve.keys()[0].time, 0.0);
        assert!((curve.evaluate(0.25).unwrap() - 1.5).abs() < 1e-6);
        assert!((curve.evaluate(0.75).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = Curve::from_points(&[(0.2, 1.0), (0.8, 3.0)]);
        assert_eq!(curve.evaluate(-1.0), Some(1.0));
        assert_eq!(curve.evaluate(0.1), Some(1.0));
        assert_eq!(curve.evaluate(1.5), Some(3.0));
    }

    #[test]
    fn test_single_key() {
        let curve = Curve::from_points(&[(0.5, Vec4::ONE)]);
        assert_eq!(curve.evaluate(0.0), Some(Vec4::ONE));
        assert_eq!(curve.evaluate(1.0), Some(Vec4::ONE));
    }

    #[test]
    fn test_deserialize_sorts_keys() {
        let json = r#"[{"time":1.0,"value":[0.0,0.0,0.0]},{"time":0.0,"value":[1.0,1.0,1.0]}]"#;
        let curve: Curve<Vec3> = serde_json::from_str(json).unwrap();
        assert_eq!(curve.keys()[0].value, Vec3::ONE);
        assert_eq!(curve.evaluate(0.5), Some(Vec3::splat(0.5)));
    }
}
