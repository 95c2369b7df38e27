// crates/ts_mesh/src/settings.rs

//! 上皮层配置
//!
//! 定义几何模式、高度轴和全局归一化因子。几何模式在配置阶段校验，
//! 未知模式直接报错，运行期只做一次枚举分派。

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ts_foundation::{TsError, TsResult};

/// 顶点高度的度量方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeometryMode {
    /// 平面: 高度轴坐标即 rho
    #[default]
    Flat,
    /// 圆柱: 到高度轴的平面距离
    Cylindrical,
    /// 球面: 到原点的欧氏距离
    Spherical,
    /// 杆状: 两焦点之间用到轴距离，尖端用到最近焦点的距离
    Rod,
}

impl GeometryMode {
    /// 所有合法的模式名
    pub const NAMES: [&'static str; 4] = ["flat", "cylindrical", "spherical", "rod"];

    /// 模式名
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Cylindrical => "cylindrical",
            Self::Spherical => "spherical",
            Self::Rod => "rod",
        }
    }
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryMode {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "cylindrical" => Ok(Self::Cylindrical),
            "spherical" => Ok(Self::Spherical),
            "rod" => Ok(Self::Rod),
            _ => Err(TsError::invalid_config(
                "geometry",
                s,
                format!("未知几何模式, 支持: {:?}", Self::NAMES),
            )),
        }
    }
}

/// 坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x 轴
    X,
    /// y 轴
    Y,
    /// z 轴
    #[default]
    Z,
}

impl Axis {
    /// 轴在坐标向量中的下标
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// 该轴方向的单位向量
    #[inline]
    pub fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }

    /// 取向量在该轴上的分量
    #[inline]
    pub fn component(self, v: DVec3) -> f64 {
        v[self.index()]
    }

    /// 去掉该轴分量，得到垂直于轴的部分
    #[inline]
    pub fn planar(self, v: DVec3) -> DVec3 {
        v - self.unit() * self.component(v)
    }
}

impl FromStr for Axis {
    type Err = TsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(TsError::invalid_config("height_axis", s, "高度轴必须是 x/y/z")),
        }
    }
}

/// 上皮层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSettings {
    /// 几何模式
    #[serde(default)]
    pub geometry: GeometryMode,

    /// 高度轴
    #[serde(default)]
    pub height_axis: Axis,

    /// 杆状几何的 (a, b) 参数，由 reset_scaffold 维护
    #[serde(default)]
    pub ab: Option<[f64; 2]>,

    /// 能量归一化因子
    #[serde(default = "default_norm_factor")]
    pub nrj_norm_factor: f64,

    /// 梯度归一化因子
    #[serde(default = "default_norm_factor")]
    pub grad_norm_factor: f64,
}

fn default_norm_factor() -> f64 { 1.0 }

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            geometry: GeometryMode::default(),
            height_axis: Axis::default(),
            ab: None,
            nrj_norm_factor: default_norm_factor(),
            grad_norm_factor: default_norm_factor(),
        }
    }
}

impl SheetSettings {
    /// 指定几何模式的配置
    pub fn with_geometry(geometry: GeometryMode) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// 校验配置
    pub fn validate(&self) -> TsResult<()> {
        for (key, value) in [
            ("nrj_norm_factor", self.nrj_norm_factor),
            ("grad_norm_factor", self.grad_norm_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TsError::invalid_config(key, value.to_string(), "归一化因子必须为正"));
            }
        }
        if let Some([a, b]) = self.ab {
            if !(a.is_finite() && b.is_finite()) {
                return Err(TsError::invalid_config("ab", format!("{a}, {b}"), "必须为有限值"));
            }
        }
        Ok(())
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(json: &str) -> TsResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| TsError::serialization(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> TsResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TsError::serialization(e.to_string()))
    }
}
