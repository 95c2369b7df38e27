// crates/ts_geometry/src/height.rs

//! 顶点高度 (rho) 及其空间梯度
//!
//! 几何模式只在这里分派一次。设高度轴为 `w`，其余两轴为 `u`、`v`：
//!
//! | 模式 | rho | ∇rho |
//! |------|-----|------|
//! | flat | `w` | 高度轴单位向量 |
//! | cylindrical | `hypot(u, v)` | 平面分量 / rho |
//! | spherical | `‖p‖` | `p / rho` |
//! | rod | 内部顶点同 cylindrical；端部顶点到焦点的距离 | `(p − focus) / rho` |
//!
//! 杆状几何的焦点位于高度轴上 `∓(b − a)` 处，左端用负焦点，右端用正焦点。

use glam::DVec3;
use rayon::prelude::*;

use crate::error::{GeometryError, GeometryResult};
use ts_mesh::{Axis, GeometryMode, Sheet};

/// 单个顶点所处的高度模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightModel {
    /// 沿轴坐标
    Axial(Axis),
    /// 到轴的平面距离
    Planar(Axis),
    /// 到原点距离
    Radial,
    /// 到焦点距离
    Focal(DVec3),
}

impl HeightModel {
    /// rho 值
    #[inline]
    pub fn rho(self, p: DVec3) -> f64 {
        match self {
            Self::Axial(axis) => axis.component(p),
            Self::Planar(axis) => axis.planar(p).length(),
            Self::Radial => p.length(),
            Self::Focal(focus) => (p - focus).length(),
        }
    }

    /// rho 对顶点位置的梯度；距离为零时返回零向量
    #[inline]
    pub fn gradient(self, p: DVec3) -> DVec3 {
        match self {
            Self::Axial(axis) => axis.unit(),
            Self::Planar(axis) => axis.planar(p).normalize_or_zero(),
            Self::Radial => p.normalize_or_zero(),
            Self::Focal(focus) => (p - focus).normalize_or_zero(),
        }
    }
}

/// 为每个顶点选择高度模型
///
/// # 错误
/// 杆状几何未设置 `ab` 时返回 [`GeometryError::MissingRodParameters`]
pub fn height_models(sheet: &Sheet) -> GeometryResult<Vec<HeightModel>> {
    let settings = sheet.settings();
    let axis = settings.height_axis;
    let nv = sheet.vert().len();
    let models = match settings.geometry {
        GeometryMode::Flat => vec![HeightModel::Axial(axis); nv],
        GeometryMode::Cylindrical => vec![HeightModel::Planar(axis); nv],
        GeometryMode::Spherical => vec![HeightModel::Radial; nv],
        GeometryMode::Rod => {
            let [a, b] = settings.ab.ok_or(GeometryError::MissingRodParameters)?;
            let focus = (b - a) * axis.unit();
            let vert = sheet.vert();
            (0..nv)
                .map(|i| {
                    if vert.left_tip[i] {
                        HeightModel::Focal(-focus)
                    } else if vert.right_tip[i] {
                        HeightModel::Focal(focus)
                    } else {
                        HeightModel::Planar(axis)
                    }
                })
                .collect()
        }
    };
    Ok(models)
}

/// 计算全部顶点的 rho
pub fn compute_rho(sheet: &Sheet) -> GeometryResult<Vec<f64>> {
    let models = height_models(sheet)?;
    Ok(sheet
        .vert()
        .pos
        .par_iter()
        .zip(models.par_iter())
        .map(|(&p, m)| m.rho(p))
        .collect())
}

/// 计算全部顶点的高度梯度 ∇height = ∇rho
pub fn height_gradient(sheet: &Sheet) -> GeometryResult<Vec<DVec3>> {
    let models = height_models(sheet)?;
    Ok(sheet
        .vert()
        .pos
        .par_iter()
        .zip(models.par_iter())
        .map(|(&p, m)| m.gradient(p))
        .collect())
}
