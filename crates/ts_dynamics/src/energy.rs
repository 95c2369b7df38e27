// crates/ts_dynamics/src/energy.rs

//! 顶点模型能量
//!
//! ```text
//! E = [ Σ_e Λ·l/2 + Σ_f ( Γ·P²/2 + K·(V − V0)²/2 ) ] / nrj_norm_factor
//! ```
//!
//! 只统计活的面及其半边。

use crate::error::DynamicsResult;
use ts_mesh::Sheet;

/// 归一化后的能量分量
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyComponents {
    /// 线张力项
    pub tension: f64,
    /// 周长收缩项
    pub contraction: f64,
    /// 体积弹性项
    pub volume: f64,
}

impl EnergyComponents {
    /// 三项之和
    pub fn total(&self) -> f64 {
        self.tension + self.contraction + self.volume
    }
}

/// 总能量
///
/// # 错误
/// 几何列过期时返回 `StaleGeometry`
pub fn compute_energy(sheet: &Sheet) -> DynamicsResult<f64> {
    Ok(compute_energy_components(sheet)?.total())
}

/// 能量分量
pub fn compute_energy_components(sheet: &Sheet) -> DynamicsResult<EnergyComponents> {
    sheet.ensure_fresh("compute_energy")?;
    let edge = sheet.edge();
    let face = sheet.face();
    let norm = sheet.settings().nrj_norm_factor;

    let tension: f64 = sheet
        .active_edges()
        .map(|e| e.as_usize())
        .filter(|&i| face.is_alive[edge.face[i].as_usize()])
        .map(|i| edge.line_tension[i] * edge.length[i] / 2.0)
        .sum();

    let (contraction, volume) = (0..face.len())
        .filter(|&f| face.is_alive[f])
        .fold((0.0, 0.0), |(c, v), f| {
            let dv = face.vol[f] - face.prefered_vol[f];
            (
                c + 0.5 * face.contractility[f] * face.perimeter[f].powi(2),
                v + 0.5 * face.vol_elasticity[f] * dv * dv,
            )
        });

    let components = EnergyComponents {
        tension: tension / norm,
        contraction: contraction / norm,
        volume: volume / norm,
    };
    log::trace!(
        "能量: 线张力 {:.6e}, 收缩 {:.6e}, 体积 {:.6e}",
        components.tension,
        components.contraction,
        components.volume
    );
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_geometry::{Geometry, SheetGeometry};
    use ts_mesh::generation::single_hexagon;
    use ts_mesh::SheetSettings;

    #[test]
    fn test_hexagon_energy_by_hand() {
        let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
        SheetGeometry.update_all(&mut sheet).unwrap();
        sheet.edge_param_mut("line_tension").unwrap().fill(0.5);
        sheet.face_mut().contractility[0] = 0.1;
        sheet.face_mut().vol_elasticity[0] = 2.0;
        sheet.face_mut().prefered_vol[0] = 1.0;

        let vol = 1.5 * 3f64.sqrt();
        let parts = compute_energy_components(&sheet).unwrap();
        assert!((parts.tension - 0.5 * 6.0 / 2.0).abs() < 1e-12);
        assert!((parts.contraction - 0.5 * 0.1 * 36.0).abs() < 1e-12);
        assert!((parts.volume - (vol - 1.0).powi(2)).abs() < 1e-12);
        assert!((compute_energy(&sheet).unwrap() - parts.total()).abs() < 1e-15);
    }

    #[test]
    fn test_dead_face_has_no_energy() {
        let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
        SheetGeometry.update_all(&mut sheet).unwrap();
        sheet.face_mut().is_alive[0] = false;
        assert_eq!(compute_energy(&sheet).unwrap(), 0.0);
    }

    #[test]
    fn test_stale_geometry_refused() {
        let sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
        assert!(compute_energy(&sheet).is_err());
    }
}
