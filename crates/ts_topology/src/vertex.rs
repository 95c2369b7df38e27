// crates/ts_topology/src/vertex.rs

//! 顶点插入与移除
//!
//! [`add_vert`] 在半边中点插入顶点，[`remove_vert`] 把二价顶点合并回一条边。
//! 两者互为逆操作（半边标识符不一定复原）。

use crate::error::{TopologyError, TopologyResult};
use ts_foundation::{EdgeId, VertexId};
use ts_mesh::Sheet;

/// 在半边 `edge` 的中点插入顶点
///
/// 原半边改为指向新顶点，新增的半边（复制原半边属性）从新顶点继续到原终点。
/// 存在对边时对称地分裂对边；边界半边只分裂一侧。
///
/// 新顶点复制起点的属性，`basal_shift` 取两端平均，端部标记只在两端都有时保留。
///
/// 返回 `(新顶点, 新半边, 新对边)`。拓扑已重建，几何列过期。
pub fn add_vert(
    sheet: &mut Sheet,
    edge: EdgeId,
) -> TopologyResult<(VertexId, EdgeId, Option<EdgeId>)> {
    let i = edge.as_usize();
    if edge.is_invalid() || i >= sheet.edge().len() || !sheet.edge().is_active[i] {
        return Err(TopologyError::InactiveEdge { edge }.warn());
    }
    let (srce, trgt, face) = (
        sheet.edge().srce[i],
        sheet.edge().trgt[i],
        sheet.edge().face[i],
    );
    let opposite = sheet.opposite(edge);

    let vert = sheet.vert();
    let (s, t) = (srce.as_usize(), trgt.as_usize());
    let mid = 0.5 * (vert.pos[s] + vert.pos[t]);
    let basal_shift = 0.5 * (vert.basal_shift[s] + vert.basal_shift[t]);
    let left_tip = vert.left_tip[s] && vert.left_tip[t];
    let right_tip = vert.right_tip[s] && vert.right_tip[t];

    let new_vert = sheet.append_vert_copy(srce, mid);
    {
        let vert = sheet.vert_mut();
        let k = new_vert.as_usize();
        vert.basal_shift[k] = basal_shift;
        vert.left_tip[k] = left_tip;
        vert.right_tip[k] = right_tip;
    }

    sheet.set_edge(edge, srce, new_vert, face);
    let new_edge = sheet.append_edge_copy(edge);
    sheet.set_edge(new_edge, new_vert, trgt, face);

    let new_opposite = opposite.map(|opp| {
        let opp_face = sheet.edge().face[opp.as_usize()];
        sheet.set_edge(opp, new_vert, srce, opp_face);
        let copy = sheet.append_edge_copy(opp);
        sheet.set_edge(copy, trgt, new_vert, opp_face);
        copy
    });

    sheet.reset_topo()?;
    log::debug!("add_vert: 半边 {edge} ({srce} -> {trgt}) 插入顶点 {new_vert}");
    Ok((new_vert, new_edge, new_opposite))
}

/// 移除二价顶点，把经过它的两段边合并为一条
///
/// 对每条指向该顶点的半边 `u → v`，取同一面内紧随其后的 `v → w`，
/// 把前者改为 `u → w` 并停用后者，最后停用顶点。
///
/// # 错误
/// 顶点不是二价、合并后出现重复有向边或少于 3 条边的面时记录警告并返回错误，网格不变
pub fn remove_vert(sheet: &mut Sheet, vertex: VertexId) -> TopologyResult<()> {
    let incoming = sheet.incoming(vertex);
    let outgoing = sheet.outgoing(vertex);

    let mut neighbours: Vec<VertexId> = incoming
        .iter()
        .map(|e| sheet.edge().srce[e.as_usize()])
        .chain(outgoing.iter().map(|e| sheet.edge().trgt[e.as_usize()]))
        .collect();
    neighbours.sort();
    neighbours.dedup();
    if neighbours.len() != 2 || incoming.len() != outgoing.len() {
        return Err(TopologyError::NotTwoValent {
            vertex,
            neighbours: neighbours.len(),
        }
        .warn());
    }

    let reject = |reason| TopologyError::InvalidRemoval { vertex, reason }.warn();

    let mut merges = Vec::with_capacity(incoming.len());
    for &e_in in &incoming {
        let e_out = sheet
            .next_in_face(e_in)
            .ok_or_else(|| reject("缺少面内后继半边"))?;
        let u = sheet.edge().srce[e_in.as_usize()];
        let w = sheet.edge().trgt[e_out.as_usize()];
        if u == w {
            return Err(reject("两侧邻居相同"));
        }
        let face = sheet.edge().face[e_in.as_usize()];
        if sheet.face().num_sides[face.as_usize()] <= 3 {
            return Err(reject("合并后面少于 3 条边"));
        }
        if sheet.find_edge(u, w).is_some() {
            return Err(reject("合并后的有向边已存在"));
        }
        merges.push((e_in, e_out, u, w, face));
    }

    for &(e_in, e_out, u, w, face) in &merges {
        sheet.set_edge(e_in, u, w, face);
        sheet.deactivate_edge(e_out);
    }
    sheet.deactivate_vert(vertex);
    sheet.reset_topo()?;
    log::debug!("remove_vert: 移除顶点 {vertex}");
    Ok(())
}
