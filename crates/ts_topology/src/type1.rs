// crates/ts_topology/src/type1.rs

//! T1 转变 (邻居交换)
//!
//! 记待交换的半边为 `v0 → v1`（属于面 b），其对边 `v1 → v0` 属于面 d。
//! 沿面 d 从 v0 再走一步到 v5，其对边所在面为 a；沿面 b 从 v1 再走一步到 v3，
//! 其对边所在面为 c。
//!
//! 交换后 b、d 各少一条边，a、c 各多一条边，`v0 − v1` 变为 a 与 c 的公共边。

use glam::DVec3;

use crate::error::{TopologyError, TopologyResult};
use crate::transaction::with_rollback;
use ts_foundation::{EdgeId, FaceId, VertexId};
use ts_mesh::Sheet;

/// 面 b、d 在交换前的最少边数
const MIN_SIDES_BEFORE: usize = 4;

/// 一次 T1 转变涉及的全部元素
#[derive(Debug, Clone, Copy)]
struct Neighborhood {
    v0: VertexId,
    v1: VertexId,
    v3: VertexId,
    v5: VertexId,
    cell_a: FaceId,
    cell_b: FaceId,
    cell_c: FaceId,
    cell_d: FaceId,
    e01: EdgeId,
    e10: EdgeId,
    e05: EdgeId,
    e50: EdgeId,
    e13: EdgeId,
    e31: EdgeId,
}

fn reject(edge: EdgeId, reason: &'static str) -> TopologyError {
    TopologyError::InvalidNeighborhood { edge, reason }.warn()
}

/// 在任何写操作之前收集并检查邻域
fn neighborhood(sheet: &Sheet, e01: EdgeId) -> TopologyResult<Neighborhood> {
    let edge = sheet.edge();
    if e01.is_invalid() || e01.as_usize() >= edge.len() || !edge.is_active[e01.as_usize()] {
        return Err(TopologyError::InactiveEdge { edge: e01 }.warn());
    }
    sheet.ensure_fresh("type1_transition").map_err(|e| TopologyError::from(e).warn())?;

    let srce = |e: EdgeId| edge.srce[e.as_usize()];
    let trgt = |e: EdgeId| edge.trgt[e.as_usize()];
    let face = |e: EdgeId| edge.face[e.as_usize()];

    let e10 = sheet
        .opposite(e01)
        .ok_or_else(|| TopologyError::BoundaryEdge { edge: e01 }.warn())?;
    let (v0, v1, cell_b, cell_d) = (srce(e01), trgt(e01), face(e01), face(e10));

    let e05 = sheet
        .next_in_face(e10)
        .ok_or_else(|| reject(e01, "面 d 的环序缺失"))?;
    let e13 = sheet
        .next_in_face(e01)
        .ok_or_else(|| reject(e01, "面 b 的环序缺失"))?;
    let (v5, v3) = (trgt(e05), trgt(e13));

    let e50 = sheet
        .opposite(e05)
        .ok_or_else(|| reject(e01, "v0 − v5 位于边界"))?;
    let e31 = sheet
        .opposite(e13)
        .ok_or_else(|| reject(e01, "v1 − v3 位于边界"))?;
    let (cell_a, cell_c) = (face(e50), face(e31));

    let cells = [cell_a, cell_b, cell_c, cell_d];
    for i in 0..4 {
        for j in i + 1..4 {
            if cells[i] == cells[j] {
                return Err(reject(e01, "四个相邻面不互异"));
            }
        }
    }

    let sides = &sheet.face().num_sides;
    if sides[cell_b.as_usize()] < MIN_SIDES_BEFORE || sides[cell_d.as_usize()] < MIN_SIDES_BEFORE {
        return Err(reject(e01, "面 b 或 d 少于 4 条边"));
    }

    for (s, t) in [(v0, v3), (v3, v0), (v1, v5), (v5, v1)] {
        if sheet.find_edge(s, t).is_some() {
            return Err(reject(e01, "重连后的有向边已存在"));
        }
    }

    Ok(Neighborhood {
        v0,
        v1,
        v3,
        v5,
        cell_a,
        cell_b,
        cell_c,
        cell_d,
        e01,
        e10,
        e05,
        e50,
        e13,
        e31,
    })
}

/// 对半边 `edge` 执行 T1 转变
///
/// `epsilon` 控制交换后两个顶点离开原中点的距离：
/// `v0 = m − (m − c_b)·ε`，`v1 = m − (m − c_d)·ε`。
///
/// 成功后拓扑已重建，几何列过期，由调用方刷新。
///
/// # 错误
/// 半边停用、位于边界、邻域不满足条件或几何过期时记录警告并返回错误，网格不变
pub fn type1_transition(sheet: &mut Sheet, edge: EdgeId, epsilon: f64) -> TopologyResult<()> {
    let n = neighborhood(sheet, edge)?;

    let p0 = sheet.vert().pos[n.v0.as_usize()];
    let p1 = sheet.vert().pos[n.v1.as_usize()];
    let mid: DVec3 = 0.5 * (p0 + p1);
    let c_b = sheet.face().centroid[n.cell_b.as_usize()];
    let c_d = sheet.face().centroid[n.cell_d.as_usize()];

    with_rollback(sheet, |sheet| {
        sheet.set_edge_face(n.e01, n.cell_c);
        sheet.set_edge_face(n.e10, n.cell_a);
        sheet.set_edge(n.e13, n.v0, n.v3, n.cell_b);
        sheet.set_edge(n.e31, n.v3, n.v0, n.cell_c);
        sheet.set_edge(n.e50, n.v5, n.v1, n.cell_a);
        sheet.set_edge(n.e05, n.v1, n.v5, n.cell_d);
        sheet.reset_topo().map_err(|e| TopologyError::from(e).warn())
    })?;

    sheet.set_position(n.v0, mid - (mid - c_b) * epsilon);
    sheet.set_position(n.v1, mid - (mid - c_d) * epsilon);

    log::debug!(
        "T1: 半边 {} ({} -> {}), 面 {}/{} 失去一条边, 面 {}/{} 获得一条边",
        n.e01,
        n.v0,
        n.v1,
        n.cell_b,
        n.cell_d,
        n.cell_a,
        n.cell_c
    );
    Ok(())
}
