// crates/ts_geometry/src/sheet_geometry.rs

//! 上皮层几何引擎
//!
//! [`Geometry`] 是拓扑层与驱动程序依赖的接口，[`SheetGeometry`] 是默认实现。
//!
//! # 更新顺序
//!
//! `update_all` 严格按依赖顺序重算全部派生列：
//!
//! 1. 半边位移 `dx` 与长度
//! 2. 面质心（面内各半边起点的平均）
//! 3. 顶点 rho 与高度
//! 4. 半边法向 `(r_s − c) × dx` 与子面积
//! 5. 面积、周长、子体积与体积
//! 6. 面 rho/高度（起点平均）
//!
//! 逐半边的计算使用 rayon 并行，结果按行号收集，重复调用得到逐位相同的结果。

use glam::{DMat3, DQuat, DVec3};
use rayon::prelude::*;

use crate::error::{GeometryError, GeometryResult};
use crate::height::compute_rho;
use crate::projection;
use crate::scaffold;
use ts_foundation::FaceId;
use ts_mesh::Sheet;

/// 几何引擎接口
pub trait Geometry: Send + Sync {
    /// 重算全部派生几何列并清除过期标记
    fn update_all(&self, sheet: &mut Sheet) -> GeometryResult<()>;

    /// 把面平均法向旋转到 +z，再绕 z 旋转 `psi`
    fn face_rotation(&self, sheet: &Sheet, face: FaceId, psi: f64) -> GeometryResult<DMat3>;

    /// 面顶点在主成分坐标系中的位置（环序）
    fn face_projected_pos(
        &self,
        sheet: &Sheet,
        face: FaceId,
        psi: f64,
    ) -> GeometryResult<Vec<DVec3>>;

    /// 重新居中网格并刷新杆状几何的端部标记与 (a, b)
    fn reset_scaffold(&self, sheet: &mut Sheet) -> GeometryResult<()>;
}

/// 默认几何引擎
#[derive(Debug, Clone, Copy, Default)]
pub struct SheetGeometry;

/// 一次更新的全部派生列
struct Derived {
    dx: Vec<DVec3>,
    length: Vec<f64>,
    normal: Vec<DVec3>,
    sub_area: Vec<f64>,
    sub_vol: Vec<f64>,
    rho: Vec<f64>,
    height: Vec<f64>,
    centroid: Vec<DVec3>,
    area: Vec<f64>,
    perimeter: Vec<f64>,
    vol: Vec<f64>,
    face_height: Vec<f64>,
    face_rho: Vec<f64>,
}

impl SheetGeometry {
    /// 只读地计算全部派生列
    fn derive(sheet: &Sheet) -> GeometryResult<Derived> {
        let vert = sheet.vert();
        let edge = sheet.edge();
        let pos = &vert.pos;

        let (dx, length): (Vec<DVec3>, Vec<f64>) = (0..edge.len())
            .into_par_iter()
            .map(|i| {
                let d = pos[edge.trgt[i].as_usize()] - pos[edge.srce[i].as_usize()];
                (d, d.length())
            })
            .unzip();

        let srce_pos = sheet.upcast_srce(pos);
        let centroid = sheet.mean_face(&srce_pos);

        let rho = compute_rho(sheet)?;
        let height: Vec<f64> = rho
            .par_iter()
            .zip(vert.basal_shift.par_iter())
            .map(|(r, b)| r - b)
            .collect();

        let (normal, sub_area): (Vec<DVec3>, Vec<f64>) = (0..edge.len())
            .into_par_iter()
            .map(|i| {
                let c = centroid[edge.face[i].as_usize()];
                let n = (srce_pos[i] - c).cross(dx[i]);
                (n, 0.5 * n.length())
            })
            .unzip();

        let srce_height = sheet.upcast_srce(&height);
        let sub_vol: Vec<f64> = srce_height
            .par_iter()
            .zip(sub_area.par_iter())
            .map(|(h, a)| h * a)
            .collect();

        let area = sheet.sum_face(&sub_area);
        let perimeter = sheet.sum_face(&length);
        let vol = sheet.sum_face(&sub_vol);
        let face_height = sheet.mean_face(&srce_height);
        let face_rho = sheet.mean_face(&sheet.upcast_srce(&rho));

        Ok(Derived {
            dx,
            length,
            normal,
            sub_area,
            sub_vol,
            rho,
            height,
            centroid,
            area,
            perimeter,
            vol,
            face_height,
            face_rho,
        })
    }
}

impl Geometry for SheetGeometry {
    fn update_all(&self, sheet: &mut Sheet) -> GeometryResult<()> {
        let d = Self::derive(sheet)?;

        let (vert, edge, face) = sheet.tables_mut();
        edge.dx = d.dx;
        edge.length = d.length;
        edge.normal = d.normal;
        edge.sub_area = d.sub_area;
        edge.sub_vol = d.sub_vol;
        vert.rho = d.rho;
        vert.height = d.height;
        face.centroid = d.centroid;
        face.area = d.area;
        face.perimeter = d.perimeter;
        face.vol = d.vol;
        face.height = d.face_height;
        face.rho = d.face_rho;

        sheet.mark_geometry_fresh();
        Ok(())
    }

    fn face_rotation(&self, sheet: &Sheet, face: FaceId, psi: f64) -> GeometryResult<DMat3> {
        sheet.ensure_fresh("face_rotation")?;
        let normal: DVec3 = sheet
            .face_edges(face)
            .iter()
            .map(|e| sheet.edge().normal[e.as_usize()])
            .sum();
        let n = normal
            .try_normalize()
            .ok_or_else(|| GeometryError::degenerate_face(face.as_usize(), "法向为零"))?;
        let to_z = DMat3::from_quat(DQuat::from_rotation_arc(n, DVec3::Z));
        Ok(DMat3::from_rotation_z(psi) * to_z)
    }

    fn face_projected_pos(
        &self,
        sheet: &Sheet,
        face: FaceId,
        psi: f64,
    ) -> GeometryResult<Vec<DVec3>> {
        projection::face_projected_pos(sheet, face, psi)
    }

    fn reset_scaffold(&self, sheet: &mut Sheet) -> GeometryResult<()> {
        scaffold::reset_scaffold(sheet)?;
        self.update_all(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_foundation::index::face;
    use ts_mesh::generation::single_hexagon;
    use ts_mesh::SheetSettings;

    #[test]
    fn test_regular_hexagon_quantities() {
        let mut sheet = single_hexagon(1.0, 2.0, SheetSettings::default()).unwrap();
        SheetGeometry.update_all(&mut sheet).unwrap();

        let area = 1.5 * 3f64.sqrt();
        assert!((sheet.face().area[0] - area).abs() < 1e-12);
        assert!((sheet.face().perimeter[0] - 6.0).abs() < 1e-12);
        assert!((sheet.face().height[0] - 2.0).abs() < 1e-12);
        assert!((sheet.face().vol[0] - 2.0 * area).abs() < 1e-12);
        assert!((sheet.face().centroid[0] - DVec3::new(0.0, 0.0, 2.0)).length() < 1e-12);
        assert!(!sheet.is_geometry_stale());
    }

    #[test]
    fn test_face_rotation_maps_normal_to_z() {
        let mut sheet = single_hexagon(1.0, 0.0, SheetSettings::default()).unwrap();
        // 把六边形放到 yz 平面
        for p in sheet.vert_mut().pos.iter_mut() {
            *p = DVec3::new(0.0, p.x, p.y);
        }
        SheetGeometry.update_all(&mut sheet).unwrap();
        let rot = SheetGeometry.face_rotation(&sheet, face(0), 0.0).unwrap();
        let normal: DVec3 = sheet.edge().normal.iter().copied().sum();
        let mapped = rot * normal.normalize();
        assert!((mapped - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_face_rotation_requires_fresh_geometry() {
        let sheet = single_hexagon(1.0, 0.0, SheetSettings::default()).unwrap();
        assert!(SheetGeometry.face_rotation(&sheet, face(0), 0.0).is_err());
    }
}
