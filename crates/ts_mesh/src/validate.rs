// crates/ts_mesh/src/validate.rs

//! 网格一致性检查
//!
//! 编辑操作之后用来确认索引、环序与活性标记彼此一致。

use crate::sheet::Sheet;
use ts_foundation::{EdgeId, FaceId, VertexId};

/// 验证错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 活动半边引用了停用或不存在的顶点
    InactiveEndpoint {
        /// 半边
        edge: EdgeId,
    },
    /// 半边的面引用越界
    InvalidFaceRef {
        /// 半边
        edge: EdgeId,
    },
    /// 面环中相邻半边首尾不相接
    BrokenRing {
        /// 面
        face: FaceId,
    },
    /// 面环中混入了属于其他面或已停用的半边
    ForeignEdge {
        /// 面
        face: FaceId,
        /// 半边
        edge: EdgeId,
    },
    /// 边数列与环长度不符
    SideCountMismatch {
        /// 面
        face: FaceId,
    },
    /// 活的面少于 3 条边
    DegenerateFace {
        /// 面
        face: FaceId,
    },
}

/// 验证报告
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// 错误列表
    pub errors: Vec<ValidationError>,
    /// 孤立的活动顶点（没有任何活动半边）
    pub isolated_verts: Vec<VertexId>,
}

impl ValidationReport {
    /// 验证是否通过
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Sheet {
    /// 验证网格拓扑完整性
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let edge = self.edge();
        let vert = self.vert();
        let mut touched = vec![false; vert.len()];

        for e in self.active_edges() {
            let i = e.as_usize();
            for v in [edge.srce[i], edge.trgt[i]] {
                let k = v.as_usize();
                if v.is_valid() && k < vert.len() && vert.is_active[k] {
                    touched[k] = true;
                } else {
                    report.errors.push(ValidationError::InactiveEndpoint { edge: e });
                }
            }
            let f = edge.face[i];
            if f.is_invalid() || f.as_usize() >= self.nf() {
                report.errors.push(ValidationError::InvalidFaceRef { edge: e });
            }
        }

        for f in self.face_ids() {
            let ring = self.face_edges(f);
            if ring.len() != self.face().num_sides[f.as_usize()] {
                report.errors.push(ValidationError::SideCountMismatch { face: f });
            }
            if self.face().is_alive[f.as_usize()] && ring.len() < 3 {
                report.errors.push(ValidationError::DegenerateFace { face: f });
            }
            for (k, &e) in ring.iter().enumerate() {
                let i = e.as_usize();
                if !edge.is_active[i] || edge.face[i] != f {
                    report.errors.push(ValidationError::ForeignEdge { face: f, edge: e });
                }
                let next = ring[(k + 1) % ring.len()];
                if edge.trgt[i] != edge.srce[next.as_usize()] {
                    report.errors.push(ValidationError::BrokenRing { face: f });
                    break;
                }
            }
        }

        report.isolated_verts = touched
            .iter()
            .enumerate()
            .filter(|&(k, &t)| vert.is_active[k] && !t)
            .map(|(k, _)| VertexId::from_usize(k))
            .collect();

        report
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::SheetSettings;
    use crate::sheet::Sheet;
    use glam::DVec3;

    #[test]
    fn test_valid_triangle_pair() {
        let positions = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
        ];
        let polys = vec![vec![0, 1, 2], vec![1, 3, 2]];
        let sheet = Sheet::from_polygons("tri", &positions, &polys, SheetSettings::default()).unwrap();
        let report = sheet.validate();
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(report.isolated_verts.is_empty());
    }

    #[test]
    fn test_isolated_vertex_reported() {
        let positions = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        ];
        let mut sheet =
            Sheet::from_polygons("tri", &positions, &[vec![0, 1, 2]], SheetSettings::default())
                .unwrap();
        let v = sheet.append_vert(DVec3::splat(5.0));
        let report = sheet.validate();
        assert!(report.is_valid());
        assert_eq!(report.isolated_verts, vec![v]);
    }
}
