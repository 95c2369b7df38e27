// crates/ts_geometry/src/projection.rs

//! 面的主成分投影
//!
//! 对面顶点相对质心的坐标做 SVD，按奇异值降序取右奇异向量作为新坐标轴：
//! 第一轴为分布最广的方向，第三轴近似为面法向。

use glam::{DMat3, DVec3};
use nalgebra::DMatrix;

use crate::error::{GeometryError, GeometryResult};
use ts_foundation::FaceId;
use ts_mesh::Sheet;

/// 面的主成分旋转矩阵
///
/// 行向量为按奇异值降序排列的右奇异向量，保证为正常旋转 (det = +1)，
/// 随后绕第三轴旋转 `psi`。
pub fn face_svd_rotation(sheet: &Sheet, face: FaceId, psi: f64) -> GeometryResult<DMat3> {
    let rel = relative_positions(sheet, face)?;
    principal_rotation(&rel, face, psi)
}

/// 面顶点在主成分坐标系中的位置（环序）
///
/// # 错误
/// 面少于 3 个顶点或顶点共线时返回 [`GeometryError::DegenerateFace`]
pub fn face_projected_pos(sheet: &Sheet, face: FaceId, psi: f64) -> GeometryResult<Vec<DVec3>> {
    let rel = relative_positions(sheet, face)?;
    let rotation = principal_rotation(&rel, face, psi)?;
    Ok(rel.iter().map(|&p| rotation * p).collect())
}

/// 面顶点相对质心的坐标
fn relative_positions(sheet: &Sheet, face: FaceId) -> GeometryResult<Vec<DVec3>> {
    let pos: Vec<DVec3> = sheet
        .face_verts(face)
        .iter()
        .map(|v| sheet.vert().pos[v.as_usize()])
        .collect();
    if pos.len() < 3 {
        return Err(GeometryError::degenerate_face(face.as_usize(), "顶点少于 3 个"));
    }
    let centroid = pos.iter().copied().sum::<DVec3>() / pos.len() as f64;
    Ok(pos.iter().map(|&p| p - centroid).collect())
}

fn principal_rotation(rel: &[DVec3], face: FaceId, psi: f64) -> GeometryResult<DMat3> {
    let m = DMatrix::from_fn(rel.len(), 3, |i, j| rel[i][j]);
    let svd = m.svd(false, true);
    let v_t = svd
        .v_t
        .ok_or_else(|| GeometryError::degenerate_face(face.as_usize(), "SVD 未返回 Vᵀ"))?;

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| svd.singular_values[b].total_cmp(&svd.singular_values[a]));
    if svd.singular_values[order[1]] < 1e-12 {
        return Err(GeometryError::degenerate_face(face.as_usize(), "顶点共线"));
    }

    let row = |k: usize| DVec3::new(v_t[(k, 0)], v_t[(k, 1)], v_t[(k, 2)]);
    let (r0, r1) = (row(order[0]), row(order[1]));
    // 第三轴由前两轴叉乘得到，保证右手系
    let r2 = r0.cross(r1);
    let rotation = DMat3::from_cols(r0, r1, r2).transpose();
    Ok(DMat3::from_rotation_z(psi) * rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_foundation::index::face;
    use ts_mesh::generation::single_hexagon;
    use ts_mesh::SheetSettings;

    #[test]
    fn test_projection_of_planar_face_is_flat() {
        let mut sheet = single_hexagon(1.0, 0.0, SheetSettings::default()).unwrap();
        // 倾斜到一般平面
        let tilt = DMat3::from_rotation_x(0.4) * DMat3::from_rotation_y(-0.7);
        for p in sheet.vert_mut().pos.iter_mut() {
            *p = tilt * *p + DVec3::new(1.0, 2.0, 3.0);
        }
        let projected = face_projected_pos(&sheet, face(0), 0.0).unwrap();
        assert_eq!(projected.len(), 6);
        for p in &projected {
            assert!(p.z.abs() < 1e-10);
            // 刚体变换保持到质心的距离
            assert!((p.length() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_psi_rotates_in_plane() {
        let sheet = single_hexagon(1.0, 0.0, SheetSettings::default()).unwrap();
        let base = face_projected_pos(&sheet, face(0), 0.0).unwrap();
        let turned = face_projected_pos(&sheet, face(0), 0.5).unwrap();
        let rz = DMat3::from_rotation_z(0.5);
        for (a, b) in base.iter().zip(&turned) {
            assert!((rz * *a - *b).length() < 1e-10);
        }
    }
}
