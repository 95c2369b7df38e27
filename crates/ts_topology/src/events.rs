// crates/ts_topology/src/events.rs

//! 基于阈值的单步事件
//!
//! - [`check_type1`]: 面内最短边短于临界长度时对其做 T1 转变
//! - [`division_event`]: 体积未达临界值时按比例增大目标体积与面积，否则分裂
//! - [`contraction_event`]: 提高面的收缩性，面积过小或收缩性已达上限时跳过
//! - [`tri_faces`]: 列出边数少于 4 的活细胞
//!
//! 事件调度与生长计划由外部驱动程序负责。

use serde::{Deserialize, Serialize};

use crate::division::cell_division;
use crate::error::{TopologyError, TopologyResult};
use crate::type1::type1_transition;
use ts_foundation::{EdgeId, FaceId};
use ts_geometry::Geometry;
use ts_mesh::Sheet;

/// T1 事件参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type1Spec {
    /// 临界边长
    #[serde(default = "default_critical_length")]
    pub critical_length: f64,

    /// 交换后顶点偏移系数
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_critical_length() -> f64 { 0.1 }
fn default_epsilon() -> f64 { 0.1 }

impl Default for Type1Spec {
    fn default() -> Self {
        Self {
            critical_length: default_critical_length(),
            epsilon: default_epsilon(),
        }
    }
}

/// 分裂事件参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionSpec {
    /// 临界体积，以模型目标体积 V0 为单位
    #[serde(default = "default_critical_vol")]
    pub critical_vol: f64,

    /// 每次未分裂时目标体积的相对增长率
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
}

fn default_critical_vol() -> f64 { 2.0 }
fn default_growth_rate() -> f64 { 0.1 }

impl Default for DivisionSpec {
    fn default() -> Self {
        Self {
            critical_vol: default_critical_vol(),
            growth_rate: default_growth_rate(),
        }
    }
}

/// 收缩事件参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionSpec {
    /// 收缩性增量（`multiple` 时为倍数）
    #[serde(default = "default_contractile_increase")]
    pub contractile_increase: f64,

    /// 面积低于该值时不再收缩
    #[serde(default = "default_critical_area")]
    pub critical_area: f64,

    /// 收缩性高于该值时不再收缩
    #[serde(default = "default_max_contractility")]
    pub max_contractility: f64,

    /// 按倍数而非增量提高收缩性
    #[serde(default)]
    pub multiple: bool,
}

fn default_contractile_increase() -> f64 { 1.0 }
fn default_critical_area() -> f64 { 1e-2 }
fn default_max_contractility() -> f64 { 10.0 }

impl Default for ContractionSpec {
    fn default() -> Self {
        Self {
            contractile_increase: default_contractile_increase(),
            critical_area: default_critical_area(),
            max_contractility: default_max_contractility(),
            multiple: false,
        }
    }
}

/// 分裂事件结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionOutcome {
    /// 未达临界体积，目标体积已增大
    Grew,
    /// 已分裂，附带子细胞
    Divided(FaceId),
}

fn require_face(sheet: &Sheet, face: FaceId) -> TopologyResult<()> {
    if face.is_invalid() || face.as_usize() >= sheet.nf() {
        return Err(TopologyError::UnknownFace { face }.warn());
    }
    Ok(())
}

fn require_live_face(sheet: &Sheet, face: FaceId) -> TopologyResult<()> {
    require_face(sheet, face)?;
    if !sheet.face().is_alive[face.as_usize()] {
        return Err(TopologyError::DeadFace { face }.warn());
    }
    Ok(())
}

/// 面内最短边短于临界长度时执行 T1 转变
///
/// 返回被交换的半边；没有足够短的边时返回 `None`。
pub fn check_type1(
    sheet: &mut Sheet,
    face: FaceId,
    critical_length: f64,
    epsilon: f64,
) -> TopologyResult<Option<EdgeId>> {
    require_face(sheet, face)?;
    sheet.ensure_fresh("check_type1").map_err(TopologyError::from)?;
    let length = &sheet.edge().length;
    let shortest = sheet
        .face_edges(face)
        .iter()
        .copied()
        .min_by(|a, b| length[a.as_usize()].total_cmp(&length[b.as_usize()]));

    match shortest {
        Some(e) if length[e.as_usize()] < critical_length => {
            type1_transition(sheet, e, epsilon)?;
            Ok(Some(e))
        }
        _ => Ok(None),
    }
}

/// 按 [`Type1Spec`] 检查 T1
pub fn type1_event(sheet: &mut Sheet, face: FaceId, spec: &Type1Spec) -> TopologyResult<Option<EdgeId>> {
    check_type1(sheet, face, spec.critical_length, spec.epsilon)
}

/// 生长或分裂
///
/// 临界体积为 `spec.critical_vol * prefered_vol`，其中 `prefered_vol` 是模型的
/// 目标体积 V0（不随单个细胞生长变化）。体积低于临界值时该面目标体积乘以
/// `1 + growth_rate`，目标面积乘以 `(1 + growth_rate)^(2/3)`；否则以随机角度分裂。
pub fn division_event<G: Geometry + ?Sized>(
    sheet: &mut Sheet,
    face: FaceId,
    spec: &DivisionSpec,
    prefered_vol: f64,
    geometry: &G,
) -> TopologyResult<DivisionOutcome> {
    require_live_face(sheet, face)?;
    sheet.ensure_fresh("division_event").map_err(TopologyError::from)?;
    let f = face.as_usize();
    if sheet.face().vol[f] < spec.critical_vol * prefered_vol {
        let factor = 1.0 + spec.growth_rate;
        let table = sheet.face_mut();
        table.prefered_vol[f] *= factor;
        table.prefered_area[f] *= factor.powf(2.0 / 3.0);
        return Ok(DivisionOutcome::Grew);
    }
    let daughter = cell_division(sheet, face, geometry, None)?;
    Ok(DivisionOutcome::Divided(daughter))
}

/// 提高面的收缩性
///
/// 面积低于 `critical_area` 或收缩性已超过 `max_contractility` 时不做改变并返回 `false`。
pub fn contraction_event(sheet: &mut Sheet, face: FaceId, spec: &ContractionSpec) -> TopologyResult<bool> {
    require_live_face(sheet, face)?;
    sheet.ensure_fresh("contraction_event").map_err(TopologyError::from)?;
    let f = face.as_usize();
    let table = sheet.face_mut();
    if table.area[f] < spec.critical_area || table.contractility[f] > spec.max_contractility {
        return Ok(false);
    }
    if spec.multiple {
        table.contractility[f] *= spec.contractile_increase;
    } else {
        table.contractility[f] += spec.contractile_increase;
    }
    Ok(true)
}

/// 边数少于 4 的活细胞，按标识排序
pub fn tri_faces(sheet: &Sheet) -> Vec<FaceId> {
    let face = sheet.face();
    sheet
        .face_ids()
        .filter(|f| face.is_alive[f.as_usize()] && face.num_sides[f.as_usize()] < 4)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ts_foundation::index::face;
    use ts_geometry::SheetGeometry;
    use ts_mesh::generation::{single_hexagon, HexaGridGenerator};
    use ts_mesh::SheetSettings;

    fn hexagon() -> Sheet {
        let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
        SheetGeometry.update_all(&mut sheet).unwrap();
        sheet
    }

    #[test]
    fn test_type1_spec_defaults_from_json() {
        let spec: Type1Spec = serde_json::from_str(r#"{"epsilon": 0.2}"#).unwrap();
        assert!((spec.critical_length - 0.1).abs() < 1e-12);
        assert!((spec.epsilon - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_type1_event_without_short_edge() {
        let mut sheet = hexagon();
        let ne = sheet.ne();

        let swapped = type1_event(&mut sheet, face(0), &Type1Spec::default()).unwrap();
        assert!(swapped.is_none());
        assert_eq!(sheet.ne(), ne);
    }

    #[test]
    fn test_unknown_face_is_error() {
        let mut sheet = hexagon();
        let missing = face(99);

        let err = check_type1(&mut sheet, missing, 0.5, 0.1).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownFace { .. }));
        let err = division_event(&mut sheet, missing, &DivisionSpec::default(), 1.0, &SheetGeometry)
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownFace { .. }));
        let err = contraction_event(&mut sheet, FaceId::INVALID, &ContractionSpec::default())
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownFace { .. }));
        assert_eq!((sheet.nv(), sheet.ne(), sheet.nf()), (6, 6, 1));
    }

    #[test]
    fn test_division_threshold_follows_reference_volume() {
        let mut sheet = hexagon();
        let vol = sheet.face().vol[0];
        let spec = DivisionSpec::default();

        // 临界体积 2·V0 = 2·vol
        let outcome = division_event(&mut sheet, face(0), &spec, vol, &SheetGeometry).unwrap();
        assert_eq!(outcome, DivisionOutcome::Grew);
        assert_eq!(sheet.nf(), 1);

        // 临界体积 2·V0 = vol / 2
        let outcome = division_event(&mut sheet, face(0), &spec, vol / 4.0, &SheetGeometry).unwrap();
        assert_eq!(outcome, DivisionOutcome::Divided(face(1)));
        assert_eq!(sheet.nf(), 2);
    }

    #[test]
    fn test_contraction_additive_then_capped() {
        let mut sheet = hexagon();
        sheet.face_mut().contractility[0] = 9.5;
        let spec = ContractionSpec::default();

        assert!(contraction_event(&mut sheet, face(0), &spec).unwrap());
        assert!((sheet.face().contractility[0] - 10.5).abs() < 1e-12);

        // 已超过上限
        assert!(!contraction_event(&mut sheet, face(0), &spec).unwrap());
        assert!((sheet.face().contractility[0] - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_contraction_multiple_and_small_area() {
        let mut sheet = hexagon();
        sheet.face_mut().contractility[0] = 2.0;
        let spec = ContractionSpec {
            contractile_increase: 1.5,
            multiple: true,
            ..ContractionSpec::default()
        };
        assert!(contraction_event(&mut sheet, face(0), &spec).unwrap());
        assert!((sheet.face().contractility[0] - 3.0).abs() < 1e-12);

        let tiny = ContractionSpec {
            critical_area: 1e3,
            ..spec
        };
        assert!(!contraction_event(&mut sheet, face(0), &tiny).unwrap());
        assert!((sheet.face().contractility[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_contraction_spec_defaults_from_json() {
        let spec: ContractionSpec = serde_json::from_str(r#"{"multiple": true}"#).unwrap();
        assert!(spec.multiple);
        assert!((spec.contractile_increase - 1.0).abs() < 1e-15);
        assert!((spec.critical_area - 1e-2).abs() < 1e-15);
        assert!((spec.max_contractility - 10.0).abs() < 1e-15);
    }

    #[test]
    fn test_tri_faces_lists_live_triangles() {
        let positions = [
            glam::DVec3::new(0.0, 0.0, 1.0),
            glam::DVec3::new(1.0, 0.0, 1.0),
            glam::DVec3::new(1.0, 1.0, 1.0),
            glam::DVec3::new(0.0, 1.0, 1.0),
            glam::DVec3::new(2.0, 0.5, 1.0),
            glam::DVec3::new(-1.0, 0.5, 1.0),
        ];
        let polygons = vec![vec![0, 1, 2, 3], vec![1, 4, 2], vec![0, 3, 5]];
        let mut sheet =
            Sheet::from_polygons("tri", &positions, &polygons, SheetSettings::default()).unwrap();
        assert_eq!(tri_faces(&sheet), vec![face(1), face(2)]);

        sheet.face_mut().is_alive[2] = false;
        assert_eq!(tri_faces(&sheet), vec![face(1)]);

        let grid = HexaGridGenerator::new(2, 2, 1.0).build(SheetSettings::default()).unwrap();
        assert!(tri_faces(&grid).is_empty());
    }
}
