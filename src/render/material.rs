//! 材质与着色器参数覆盖
//!
//! 发射器在编辑器中配置材质列表，渲染时解析为渲染器可直接使用的参数覆盖。

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// 着色器句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShaderId(pub u32);

/// 纹理句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// 模型资源句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u32);

/// 编辑器中配置的着色器参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShaderParamValue {
    /// 普通纹理
    Texture(TextureId),
    /// 渲染目标纹理
    RenderTexture(TextureId),
    /// 向量
    Vector(Vec4),
}

/// 着色器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderParam {
    pub name: String,
    pub value: ShaderParamValue,
}

/// 材质组件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shader: ShaderId,
    #[serde(default)]
    pub params: Vec<ShaderParam>,
}

/// 解析后的参数覆盖值
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderOverride {
    Texture(TextureId),
    Vec4(Vec4),
}

/// 解析后的着色器参数覆盖
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderParamOverrides {
    pub shader: ShaderId,
    pub params: Vec<(String, ShaderOverride)>,
}

impl ShaderParamOverrides {
    /// 设置纹理覆盖
    pub fn set_texture(&mut self, name: &str, texture: TextureId) {
        self.set(name, ShaderOverride::Texture(texture));
    }

    /// 设置向量覆盖
    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set(name, ShaderOverride::Vec4(value));
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Option<&ShaderOverride> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn set(&mut self, name: &str, value: ShaderOverride) {
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
    }
}

impl Material {
    /// 解析为着色器参数覆盖
    pub fn resolve(&self) -> ShaderParamOverrides {
        let mut overrides = ShaderParamOverrides {
            shader: self.shader,
            params: Vec::with_capacity(self.params.len()),
        };
        for param in &self.params {
            match &param.value {
                ShaderParamValue::Texture(texture) | ShaderParamValue::RenderTexture(texture) => {
                    overrides.set_texture(&param.name, *texture)
                }
                ShaderParamValue::Vector(value) => overrides.set_vec4(&param.name, *value),
            }
        }
        overrides
    }
}

/// 解析整个材质列表
pub fn resolve_materials(materials: &[Material]) -> Vec<ShaderParamOverrides> {
    materials.iter().map(Material::resolve).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_material() {
        let material = Material {
            shader: ShaderId(4),
            params: vec![
                ShaderParam {
                    name: "albedo".to_string(),
                    value: ShaderParamValue::Texture(TextureId(1)),
                },
                ShaderParam {
                    name: "scene".to_string(),
                    value: ShaderParamValue::RenderTexture(TextureId(9)),
                },
                ShaderParam {
                    name: "tint".to_string(),
                    value: ShaderParamValue::Vector(Vec4::new(1.0, 0.5, 0.0, 1.0)),
                },
            ],
        };

        let resolved = material.resolve();
        assert_eq!(resolved.shader, ShaderId(4));
        assert_eq!(resolved.get("albedo"), Some(&ShaderOverride::Texture(TextureId(1))));
        assert_eq!(resolved.get("scene"), Some(&ShaderOverride::Texture(TextureId(9))));
        assert_eq!(
            resolved.get("tint"),
            Some(&ShaderOverride::Vec4(Vec4::new(1.0, 0.5, 0.0, 1.0)))
        );
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut overrides = ShaderParamOverrides::default();
        overrides.set_vec4("time", Vec4::ZERO);
        overrides.set_vec4("time", Vec4::ONE);
        assert_eq!(overrides.params.len(), 1);
        assert_eq!(overrides.get("time"), Some(&ShaderOverride::Vec4(Vec4::ONE)));
    }
}
