// crates/ts_dynamics/src/specs.rs

//! 顶点模型参数
//!
//! 面参数 (收缩性、体积弹性、目标高度/面积/体积)、半边参数 (线张力)
//! 与两个归一化因子。可从 JSON 读取，缺省字段取默认值：
//!
//! ```json
//! { "face": { "contractility": 0.04 }, "edge": { "line_tension": 0.12 } }
//! ```
//!
//! [`ModelSpecs::dimensionalize`] 把无量纲的 γ、λ 换算为有量纲参数，
//! 只在建模时调用一次。

use serde::{Deserialize, Serialize};

use crate::error::{DynamicsError, DynamicsResult};
use ts_foundation::TsError;
use ts_mesh::Sheet;

/// 模型参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelSpecs {
    /// 面参数
    #[serde(default)]
    pub face: FaceSpecs,

    /// 半边参数
    #[serde(default)]
    pub edge: EdgeSpecs,

    /// 归一化因子
    #[serde(default)]
    pub settings: NormSpecs,
}

/// 面参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSpecs {
    /// 周长收缩性 Γ
    #[serde(default = "default_contractility")]
    pub contractility: f64,

    /// 体积弹性 K
    #[serde(default = "default_vol_elasticity")]
    pub vol_elasticity: f64,

    /// 目标高度 h0
    #[serde(default = "default_prefered_height")]
    pub prefered_height: f64,

    /// 目标面积 A0
    #[serde(default = "default_prefered_area")]
    pub prefered_area: f64,

    /// 目标体积 V0
    #[serde(default)]
    pub prefered_vol: f64,
}

fn default_contractility() -> f64 { 0.04 }
fn default_vol_elasticity() -> f64 { 1.0 }
fn default_prefered_height() -> f64 { 10.0 }
fn default_prefered_area() -> f64 { 24.0 }

impl Default for FaceSpecs {
    fn default() -> Self {
        Self {
            contractility: default_contractility(),
            vol_elasticity: default_vol_elasticity(),
            prefered_height: default_prefered_height(),
            prefered_area: default_prefered_area(),
            prefered_vol: 0.0,
        }
    }
}

/// 半边参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpecs {
    /// 线张力 Λ
    #[serde(default = "default_line_tension")]
    pub line_tension: f64,
}

fn default_line_tension() -> f64 { 0.12 }

impl Default for EdgeSpecs {
    fn default() -> Self {
        Self {
            line_tension: default_line_tension(),
        }
    }
}

/// 归一化因子
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormSpecs {
    /// 能量归一化因子
    #[serde(default = "default_norm_factor")]
    pub nrj_norm_factor: f64,

    /// 梯度归一化因子
    #[serde(default = "default_norm_factor")]
    pub grad_norm_factor: f64,
}

fn default_norm_factor() -> f64 { 1.0 }

impl Default for NormSpecs {
    fn default() -> Self {
        Self {
            nrj_norm_factor: default_norm_factor(),
            grad_norm_factor: default_norm_factor(),
        }
    }
}

impl ModelSpecs {
    /// 从 JSON 字符串解析并校验
    pub fn from_json(json: &str) -> DynamicsResult<Self> {
        let specs: Self =
            serde_json::from_str(json).map_err(|e| TsError::serialization(e.to_string()))?;
        specs.validate()?;
        Ok(specs)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> DynamicsResult<String> {
        Ok(serde_json::to_string_pretty(self).map_err(|e| TsError::serialization(e.to_string()))?)
    }

    /// 校验参数
    pub fn validate(&self) -> DynamicsResult<()> {
        let finite = [
            ("contractility", self.face.contractility),
            ("vol_elasticity", self.face.vol_elasticity),
            ("prefered_height", self.face.prefered_height),
            ("prefered_area", self.face.prefered_area),
            ("prefered_vol", self.face.prefered_vol),
            ("line_tension", self.edge.line_tension),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(DynamicsError::InvalidParameter { name, value });
            }
        }
        for (name, value) in [
            ("nrj_norm_factor", self.settings.nrj_norm_factor),
            ("grad_norm_factor", self.settings.grad_norm_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DynamicsError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// 由目标高度 h0、目标面积 A0、体积弹性 K 换算有量纲参数
    ///
    /// - contractility ← γ·K·A0·h0²
    /// - prefered_vol ← A0·h0
    /// - line_tension ← λ·K·A0^1.5·h0²
    /// - grad_norm_factor ← K·A0^1.5·h0²
    /// - nrj_norm_factor ← K·(A0·h0)²
    pub fn dimensionalize(&self) -> Self {
        let kv = self.face.vol_elasticity;
        let a0 = self.face.prefered_area;
        let h0 = self.face.prefered_height;
        let force_scale = kv * a0.powf(1.5) * h0 * h0;

        let mut dim = self.clone();
        dim.face.contractility = self.face.contractility * kv * a0 * h0 * h0;
        dim.face.prefered_vol = a0 * h0;
        dim.edge.line_tension = self.edge.line_tension * force_scale;
        dim.settings.grad_norm_factor = force_scale;
        dim.settings.nrj_norm_factor = kv * (a0 * h0).powi(2);
        dim
    }

    /// 把参数写入网格的面列、半边列和归一化因子
    pub fn apply(&self, sheet: &mut Sheet) {
        let face = sheet.face_mut();
        face.contractility.fill(self.face.contractility);
        face.vol_elasticity.fill(self.face.vol_elasticity);
        face.prefered_height.fill(self.face.prefered_height);
        face.prefered_area.fill(self.face.prefered_area);
        face.prefered_vol.fill(self.face.prefered_vol);
        if let Some(tension) = sheet.edge_param_mut("line_tension") {
            tension.fill(self.edge.line_tension);
        }
        sheet.set_norm_factors(self.settings.nrj_norm_factor, self.settings.grad_norm_factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let specs = ModelSpecs::default();
        assert_eq!(specs.face.contractility, 0.04);
        assert_eq!(specs.face.prefered_area, 24.0);
        assert_eq!(specs.edge.line_tension, 0.12);
        assert_eq!(specs.settings.grad_norm_factor, 1.0);
    }

    #[test]
    fn test_partial_json() {
        let specs = ModelSpecs::from_json(r#"{ "face": { "vol_elasticity": 2.0 } }"#).unwrap();
        assert_eq!(specs.face.vol_elasticity, 2.0);
        assert_eq!(specs.face.prefered_height, 10.0);
        assert!(ModelSpecs::from_json(r#"{ "settings": { "nrj_norm_factor": 0.0 } }"#).is_err());
    }

    #[test]
    fn test_dimensionalize() {
        let dim = ModelSpecs::default().dimensionalize();
        let (kv, a0, h0) = (1.0, 24.0_f64, 10.0);
        assert!((dim.face.contractility - 0.04 * kv * a0 * h0 * h0).abs() < 1e-9);
        assert!((dim.face.prefered_vol - 240.0).abs() < 1e-12);
        let g = kv * a0.powf(1.5) * h0 * h0;
        assert!((dim.edge.line_tension - 0.12 * g).abs() < 1e-9);
        assert!((dim.settings.grad_norm_factor - g).abs() < 1e-9);
        assert!((dim.settings.nrj_norm_factor - 240.0 * 240.0).abs() < 1e-6);
    }
}
