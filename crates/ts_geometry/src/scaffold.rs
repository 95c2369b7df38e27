// crates/ts_geometry/src/scaffold.rs

//! 网格居中与杆状几何骨架
//!
//! 居中：所有活动顶点减去其平均位置。
//! 杆状几何另外估计半径 `a` 与半长 `b`（活动顶点平面距离与轴向坐标绝对值的
//! 95 百分位数），并把轴向坐标越过 `±(b − a)` 的顶点标记为左/右端部。

use glam::DVec3;

use crate::error::GeometryResult;
use ts_foundation::float::percentile;
use ts_mesh::{GeometryMode, Sheet};

/// 端部判定使用的百分位
pub const SCAFFOLD_PERCENTILE: f64 = 95.0;

/// 居中网格并刷新端部标记；几何列保持过期
pub fn reset_scaffold(sheet: &mut Sheet) -> GeometryResult<()> {
    let active: Vec<usize> = (0..sheet.vert().len())
        .filter(|&i| sheet.vert().is_active[i])
        .collect();
    if active.is_empty() {
        return Ok(());
    }

    let mean = active.iter().map(|&i| sheet.vert().pos[i]).sum::<DVec3>() / active.len() as f64;
    let axis = sheet.settings().height_axis;
    let is_rod = sheet.settings().geometry == GeometryMode::Rod;

    let vert = sheet.vert_mut();
    for &i in &active {
        vert.pos[i] -= mean;
    }
    vert.left_tip.fill(false);
    vert.right_tip.fill(false);

    if !is_rod {
        return Ok(());
    }

    let planar: Vec<f64> = active.iter().map(|&i| axis.planar(vert.pos[i]).length()).collect();
    let axial: Vec<f64> = active.iter().map(|&i| axis.component(vert.pos[i]).abs()).collect();
    // active 非空时百分位必然存在
    let a = percentile(&planar, SCAFFOLD_PERCENTILE).unwrap_or_default();
    let b = percentile(&axial, SCAFFOLD_PERCENTILE).unwrap_or_default();
    let w0 = b - a;

    let mut n_left = 0;
    let mut n_right = 0;
    for &i in &active {
        let w = axis.component(vert.pos[i]);
        if w < -w0 {
            vert.left_tip[i] = true;
            n_left += 1;
        } else if w > w0 {
            vert.right_tip[i] = true;
            n_right += 1;
        }
    }
    sheet.settings_mut().ab = Some([a, b]);
    log::debug!("reset_scaffold: a = {a:.4}, b = {b:.4}, 左端 {n_left} 个, 右端 {n_right} 个顶点");
    Ok(())
}
