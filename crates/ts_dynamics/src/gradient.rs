// crates/ts_dynamics/src/gradient.rs

//! 顶点模型能量的解析梯度
//!
//! 先构造逐半边的梯度表，再按起点/终点分组求和得到逐顶点梯度：
//!
//! ```text
//! ∇_i E = [ (Σ_srce t − Σ_trgt t)/2 + Σ_srce c − Σ_trgt c
//!           + Σ_srce v_s + Σ_trgt v_t ] / grad_norm_factor
//! ```
//!
//! 子面积依赖面质心，质心又是面内全部顶点的平均。体积表中加入了这部分
//! 贡献，因此非平面的面上梯度也与能量严格一致。

use glam::DVec3;
use rayon::prelude::*;

use crate::error::DynamicsResult;
use ts_foundation::float::safe_div;
use ts_geometry::height_gradient;
use ts_mesh::Sheet;

/// 逐半边梯度表（未归一化，行号与半边表一致）
#[derive(Debug, Clone, Default)]
pub struct GradientComponents {
    /// 线张力 Λ·live·∇l（对起点）
    pub tension: Vec<DVec3>,
    /// 周长收缩 Γ·P·live·∇l（对起点）
    pub contraction: Vec<DVec3>,
    /// 体积项中归属起点的部分
    pub volume_srce: Vec<DVec3>,
    /// 体积项中归属终点的部分
    pub volume_trgt: Vec<DVec3>,
}

/// 半边长度对起点的梯度 `−dx / l`，零长度半边为零
pub fn length_grad(sheet: &Sheet) -> Vec<DVec3> {
    let edge = sheet.edge();
    edge.dx
        .par_iter()
        .zip(edge.length.par_iter())
        .map(|(&dx, &l)| -dx * safe_div(1.0, l, 0.0))
        .collect()
}

/// 子面积对起点、终点的显式梯度（不含质心依赖）
pub fn area_grad(sheet: &Sheet) -> (Vec<DVec3>, Vec<DVec3>) {
    let edge = sheet.edge();
    let pos = &sheet.vert().pos;
    let centroid = &sheet.face().centroid;
    (0..edge.len())
        .into_par_iter()
        .map(|i| {
            let scale = safe_div(0.25, edge.sub_area[i], 0.0);
            let c = centroid[edge.face[i].as_usize()];
            let n = edge.normal[i];
            let rs = pos[edge.srce[i].as_usize()] - c;
            let rt = pos[edge.trgt[i].as_usize()] - c;
            (rt.cross(n) * scale, n.cross(rs) * scale)
        })
        .unzip()
}

/// 四张逐半边梯度表
///
/// # 错误
/// 几何列过期或高度模型缺少参数时返回错误
pub fn compute_gradient_components(sheet: &Sheet) -> DynamicsResult<GradientComponents> {
    sheet.ensure_fresh("compute_gradient")?;
    let edge = sheet.edge();
    let face = sheet.face();
    let vert = sheet.vert();

    let live: Vec<f64> = face
        .is_alive
        .iter()
        .map(|&alive| if alive { 1.0 } else { 0.0 })
        .collect();
    let gamma: Vec<f64> = (0..face.len())
        .map(|f| face.contractility[f] * face.perimeter[f] * live[f])
        .collect();
    let kv: Vec<f64> = (0..face.len())
        .map(|f| face.vol_elasticity[f] * (face.vol[f] - face.prefered_vol[f]) * live[f])
        .collect();

    let live_e = sheet.upcast_face(&live);
    let gamma_e = sheet.upcast_face(&gamma);
    let kv_e = sheet.upcast_face(&kv);
    let h_srce = sheet.upcast_srce(&vert.height);
    let grad_h_srce = sheet.upcast_srce(&height_gradient(sheet)?);

    let grad_l = length_grad(sheet);
    let (grad_a_srce, grad_a_trgt) = area_grad(sheet);

    let tension = (0..edge.len())
        .map(|i| grad_l[i] * (edge.line_tension[i] * live_e[i]))
        .collect();
    let contraction = (0..edge.len()).map(|i| grad_l[i] * gamma_e[i]).collect();

    let mut volume_srce: Vec<DVec3> = (0..edge.len())
        .map(|i| kv_e[i] * (h_srce[i] * grad_a_srce[i] + edge.sub_area[i] * grad_h_srce[i]))
        .collect();
    let volume_trgt = (0..edge.len())
        .map(|i| kv_e[i] * h_srce[i] * grad_a_trgt[i])
        .collect();

    // 质心依赖：∂A/∂c = −(∇_s A + ∇_t A)，由面内各顶点平分
    let centroid_term: Vec<DVec3> = (0..edge.len())
        .map(|i| -kv_e[i] * h_srce[i] * (grad_a_srce[i] + grad_a_trgt[i]))
        .collect();
    let per_vertex = sheet.mean_face(&centroid_term);
    for e in sheet.active_edges() {
        let i = e.as_usize();
        volume_srce[i] += per_vertex[edge.face[i].as_usize()];
    }

    Ok(GradientComponents {
        tension,
        contraction,
        volume_srce,
        volume_trgt,
    })
}

/// 逐顶点梯度（行号与顶点表一致，停用顶点为零）
pub fn compute_gradient(sheet: &Sheet) -> DynamicsResult<Vec<DVec3>> {
    let parts = compute_gradient_components(sheet)?;
    let norm = sheet.settings().grad_norm_factor;

    let t_srce = sheet.sum_srce(&parts.tension);
    let t_trgt = sheet.sum_trgt(&parts.tension);
    let c_srce = sheet.sum_srce(&parts.contraction);
    let c_trgt = sheet.sum_trgt(&parts.contraction);
    let v_srce = sheet.sum_srce(&parts.volume_srce);
    let v_trgt = sheet.sum_trgt(&parts.volume_trgt);

    Ok((0..sheet.vert().len())
        .map(|i| {
            ((t_srce[i] - t_trgt[i]) / 2.0 + c_srce[i] - c_trgt[i] + v_srce[i] + v_trgt[i]) / norm
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_geometry::{Geometry, SheetGeometry};
    use ts_mesh::generation::single_hexagon;
    use ts_mesh::SheetSettings;

    #[test]
    fn test_collapsed_edge_has_zero_gradient() {
        let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
        let e = sheet.face_edges(ts_foundation::FaceId::from_usize(0))[0].as_usize();
        let (s, t) = (sheet.edge().srce[e], sheet.edge().trgt[e]);
        let p = sheet.vert().pos[s.as_usize()];
        sheet.set_position(t, p);
        SheetGeometry.update_all(&mut sheet).unwrap();
        assert_eq!(sheet.edge().length[e], 0.0);

        let grad_l = length_grad(&sheet);
        assert_eq!(grad_l[e], DVec3::ZERO);
        assert!(grad_l.iter().all(|g| g.is_finite()));

        let (grad_s, grad_t) = area_grad(&sheet);
        assert_eq!(grad_s[e], DVec3::ZERO);
        assert_eq!(grad_t[e], DVec3::ZERO);
        assert!(grad_s.iter().chain(&grad_t).all(|g| g.is_finite()));
    }
}
