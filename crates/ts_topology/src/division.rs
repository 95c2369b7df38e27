// crates/ts_topology/src/division.rs

//! 细胞分裂
//!
//! 把母细胞投影到其主成分平面并绕法向旋转 `angle`，以投影坐标 `x = 0`
//! 为分裂线：`x < 0` 的顶点在负侧，`x ≥ 0` 的顶点在非负侧。
//! 分裂线必须恰好穿过两条边（凹多边形可能被穿过四次或更多，此时拒绝分裂）。
//! 两条边各插入一个中点顶点，两个新顶点之间加一对半边，负侧的部分成为子细胞。

use rand::Rng;
use std::f64::consts::PI;

use crate::error::{TopologyError, TopologyResult};
use crate::transaction::with_rollback;
use crate::vertex::add_vert;
use ts_foundation::FaceId;
use ts_geometry::Geometry;
use ts_mesh::Sheet;

/// 分裂母细胞，返回子细胞
///
/// `angle` 为 `None` 时在 `[0, π)` 内随机取角度。
/// 结束时拓扑已重建且几何已刷新。
///
/// # 错误
/// 母细胞不存在或已死亡、面退化、分裂线未恰好穿过两条边时记录警告并返回错误；
/// 写入阶段失败时网格恢复为调用前的状态。
pub fn cell_division<G: Geometry + ?Sized>(
    sheet: &mut Sheet,
    mother: FaceId,
    geometry: &G,
    angle: Option<f64>,
) -> TopologyResult<FaceId> {
    let angle = angle.unwrap_or_else(|| rand::thread_rng().gen::<f64>() * PI);
    divide(sheet, mother, geometry, angle)
}

/// 使用给定随机数发生器选取分裂角度的 [`cell_division`]
pub fn cell_division_with_rng<G: Geometry + ?Sized, R: Rng>(
    sheet: &mut Sheet,
    mother: FaceId,
    geometry: &G,
    rng: &mut R,
) -> TopologyResult<FaceId> {
    let angle = rng.gen::<f64>() * PI;
    divide(sheet, mother, geometry, angle)
}

fn divide<G: Geometry + ?Sized>(
    sheet: &mut Sheet,
    mother: FaceId,
    geometry: &G,
    angle: f64,
) -> TopologyResult<FaceId> {
    if mother.is_invalid() || mother.as_usize() >= sheet.nf() {
        return Err(TopologyError::UnknownFace { face: mother }.warn());
    }
    if !sheet.face().is_alive[mother.as_usize()] {
        return Err(TopologyError::DeadFace { face: mother }.warn());
    }

    let ring = sheet.face_edges(mother).to_vec();
    let projected = geometry
        .face_projected_pos(sheet, mother, angle)
        .map_err(|e| TopologyError::from(e).warn())?;
    let negative: Vec<bool> = projected.iter().map(|p| p.x < 0.0).collect();
    let n = ring.len();

    // 第 k 条半边的起点为第 k 个顶点，终点为第 k+1 个
    let crosses = |k: usize| negative[k] != negative[(k + 1) % n];
    if (0..n).filter(|&k| crosses(k)).count() != 2 {
        return Err(TopologyError::NoDivisionPlane { face: mother }.warn());
    }
    let crossing = |from_negative: bool| {
        (0..n)
            .find(|&k| negative[k] == from_negative && crosses(k))
            .map(|k| ring[k])
    };
    let (edge_a, edge_b) = match (crossing(true), crossing(false)) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(TopologyError::NoDivisionPlane { face: mother }.warn()),
    };
    let daughter_edges: Vec<_> = (0..n).filter(|&k| negative[k]).map(|k| ring[k]).collect();

    with_rollback(sheet, |sheet| {
        let (vert_a, _, _) = add_vert(sheet, edge_a)?;
        let (vert_b, new_edge_b, _) = add_vert(sheet, edge_b)?;

        let daughter = sheet.append_face_copy(mother);
        let mother_side = sheet.append_edge_copy(new_edge_b);
        sheet.set_edge(mother_side, vert_b, vert_a, mother);
        let daughter_side = sheet.append_edge_copy(new_edge_b);
        sheet.set_edge(daughter_side, vert_a, vert_b, daughter);

        for &e in daughter_edges.iter().chain(std::iter::once(&new_edge_b)) {
            sheet.set_edge_face(e, daughter);
        }

        sheet.reset_topo().map_err(|e| TopologyError::from(e).warn())?;
        geometry.update_all(sheet).map_err(|e| TopologyError::from(e).warn())?;
        log::debug!(
            "cell_division: 面 {mother} 分裂出 {daughter}, 角度 {angle:.3}, 新顶点 {vert_a}/{vert_b}"
        );
        Ok(daughter)
    })
}
