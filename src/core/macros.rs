//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// struct StreamSettings {
///     buffer_count: usize,
///     max_quads: u32,
/// }
///
/// particle_engine::impl_default!(StreamSettings {
///     buffer_count: 3,
///     max_quads: 2500,
/// });
///
/// assert_eq!(StreamSettings::default().buffer_count, 3);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
