// crates/ts_topology/tests/topology_ops.rs

//! 拓扑操作集成测试

use rand::rngs::StdRng;
use rand::SeedableRng;
use ts_dynamics::{compute_energy, ModelSpecs};
use ts_foundation::index::face;
use glam::DVec3;
use ts_foundation::{EdgeId, FaceId, VertexId};
use ts_geometry::{Geometry, SheetGeometry};
use ts_mesh::generation::{single_hexagon, HexaGridGenerator};
use ts_mesh::{Sheet, SheetSettings};
use ts_topology::{
    add_vert, cell_division, cell_division_with_rng, check_type1, division_event, remove_vert,
    type1_transition, DivisionOutcome, DivisionSpec, TopologyError,
};

/// 3x3 蜂窝网格，中心细胞 (面 4) 四周都有邻居
fn grid() -> Sheet {
    let mut sheet = HexaGridGenerator::new(3, 3, 1.0)
        .with_offset(1.0)
        .build(SheetSettings::default())
        .unwrap();
    ModelSpecs::default().apply(&mut sheet);
    SheetGeometry.update_all(&mut sheet).unwrap();
    sheet
}

fn total_sides(sheet: &Sheet) -> usize {
    sheet.face().num_sides.iter().sum()
}

/// 连接关系与顶点位置的完整快照
#[derive(Debug, PartialEq)]
struct Snapshot {
    srce: Vec<VertexId>,
    trgt: Vec<VertexId>,
    face: Vec<FaceId>,
    rings: Vec<Vec<EdgeId>>,
    pos: Vec<DVec3>,
    counts: (usize, usize, usize),
}

fn snapshot(sheet: &Sheet) -> Snapshot {
    Snapshot {
        srce: sheet.edge().srce.clone(),
        trgt: sheet.edge().trgt.clone(),
        face: sheet.edge().face.clone(),
        rings: sheet.face_ids().map(|f| sheet.face_edges(f).to_vec()).collect(),
        pos: sheet.vert().pos.clone(),
        counts: (sheet.nv(), sheet.ne(), sheet.nf()),
    }
}

/// U 形八边形，水平分裂线与边界相交四次
fn u_shaped_cell() -> Sheet {
    let corners = [
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 3.0),
        (5.0, 3.0),
        (5.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ];
    let positions: Vec<DVec3> = corners.iter().map(|&(x, y)| DVec3::new(x, y, 1.0)).collect();
    let mut sheet = Sheet::from_polygons(
        "u_shape",
        &positions,
        &[(0..8).collect::<Vec<usize>>()],
        SheetSettings::default(),
    )
    .unwrap();
    SheetGeometry.update_all(&mut sheet).unwrap();
    sheet
}

// ============================================================
// T1 转变
// ============================================================

#[test]
fn test_type1_on_interior_edge() {
    let mut sheet = grid();
    let (nv, ne, nf) = (sheet.nv(), sheet.ne(), sheet.nf());
    let sides = total_sides(&sheet);

    let e = sheet.face_edges(face(4))[0];
    let opp = sheet.opposite(e).unwrap();
    let cell_d = sheet.edge().face[opp.as_usize()];

    type1_transition(&mut sheet, e, 0.1).unwrap();
    assert!(sheet.is_geometry_stale());
    SheetGeometry.update_all(&mut sheet).unwrap();

    assert_eq!((sheet.nv(), sheet.ne(), sheet.nf()), (nv, ne, nf));
    assert_eq!(total_sides(&sheet), sides);
    assert_eq!(sheet.face().num_sides[4], 5);
    assert_eq!(sheet.face().num_sides[cell_d.as_usize()], 5);

    // 交换后的边不再属于原来的两个面
    let new_face = sheet.edge().face[e.as_usize()];
    assert_ne!(new_face, face(4));
    assert_ne!(new_face, cell_d);
    assert_eq!(sheet.face().num_sides[new_face.as_usize()], 7);
    assert_eq!(sheet.opposite(e), Some(opp));

    let report = sheet.validate();
    assert!(report.is_valid(), "{:?}", report.errors);
    assert!(compute_energy(&sheet).unwrap().is_finite());
}

#[test]
fn test_type1_boundary_edge_is_noop() {
    let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
    SheetGeometry.update_all(&mut sheet).unwrap();
    let pos = sheet.vert().pos.clone();
    let e = sheet.face_edges(face(0))[0];

    let err = type1_transition(&mut sheet, e, 0.1).unwrap_err();
    assert!(matches!(err, TopologyError::BoundaryEdge { .. }));
    assert_eq!(sheet.vert().pos, pos);
    assert_eq!(sheet.face().num_sides[0], 6);
    assert!(!sheet.is_geometry_stale());
}

#[test]
fn test_type1_requires_fresh_geometry() {
    let mut sheet = grid();
    sheet.vert_mut().pos[0].z += 0.01;
    let e = sheet.face_edges(face(4))[0];
    let err = type1_transition(&mut sheet, e, 0.1).unwrap_err();
    assert!(matches!(err, TopologyError::Mesh(_)));
    assert_eq!(sheet.face().num_sides[4], 6);
}

#[test]
fn test_refused_type1_leaves_sheet_untouched() {
    let mut sheet = grid();
    let before = snapshot(&sheet);
    let boundary = sheet
        .active_edges()
        .find(|&e| sheet.opposite(e).is_none())
        .unwrap();
    assert!(matches!(
        type1_transition(&mut sheet, boundary, 0.1).unwrap_err(),
        TopologyError::BoundaryEdge { .. }
    ));
    assert!(matches!(
        type1_transition(&mut sheet, EdgeId::from_usize(10_000), 0.1).unwrap_err(),
        TopologyError::InactiveEdge { .. }
    ));
    assert_eq!(snapshot(&sheet), before);
    assert!(!sheet.is_geometry_stale());
}

#[test]
fn test_check_type1_on_short_edge() {
    let mut sheet = grid();
    let e = sheet.face_edges(face(4))[2];
    let (s, t) = (sheet.edge().srce[e.as_usize()], sheet.edge().trgt[e.as_usize()]);
    let ps = sheet.vert().pos[s.as_usize()];
    let pt = sheet.vert().pos[t.as_usize()];
    sheet.set_position(t, ps + 0.05 * (pt - ps));
    SheetGeometry.update_all(&mut sheet).unwrap();

    assert_eq!(check_type1(&mut sheet, face(4), 0.01, 0.1).unwrap(), None);
    assert_eq!(check_type1(&mut sheet, face(4), 0.2, 0.1).unwrap(), Some(e));
    assert_eq!(sheet.face().num_sides[4], 5);
}

// ============================================================
// 顶点插入 / 移除
// ============================================================

#[test]
fn test_add_then_remove_vert_round_trip() {
    let mut sheet = grid();
    let (nv, ne) = (sheet.nv(), sheet.ne());
    let e = sheet.face_edges(face(4))[1];
    let (s, t) = (sheet.edge().srce[e.as_usize()], sheet.edge().trgt[e.as_usize()]);
    let length = sheet.edge().length[e.as_usize()];

    let (v, _, new_opp) = add_vert(&mut sheet, e).unwrap();
    assert!(new_opp.is_some());
    assert_eq!((sheet.nv(), sheet.ne()), (nv + 1, ne + 2));
    SheetGeometry.update_all(&mut sheet).unwrap();
    assert!((sheet.edge().length[e.as_usize()] - 0.5 * length).abs() < 1e-12);

    remove_vert(&mut sheet, v).unwrap();
    SheetGeometry.update_all(&mut sheet).unwrap();
    assert_eq!((sheet.nv(), sheet.ne()), (nv, ne));
    assert_eq!(sheet.edge().srce[e.as_usize()], s);
    assert_eq!(sheet.edge().trgt[e.as_usize()], t);
    assert!((sheet.edge().length[e.as_usize()] - length).abs() < 1e-12);
    assert!(sheet.find_edge(t, s).is_some());
    assert!(sheet.validate().is_valid());
}

// ============================================================
// 细胞分裂
// ============================================================

#[test]
fn test_divide_single_hexagon() {
    let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
    SheetGeometry.update_all(&mut sheet).unwrap();
    let area = sheet.face().area[0];

    let daughter = cell_division(&mut sheet, face(0), &SheetGeometry, Some(0.0)).unwrap();
    assert_eq!(daughter, face(1));
    assert_eq!(sheet.nf(), 2);
    assert_eq!(sheet.nv(), 8);
    assert_eq!(sheet.ne(), 10);
    assert!(!sheet.is_geometry_stale());

    let combined = sheet.face().area[0] + sheet.face().area[1];
    assert!((combined - area).abs() < 1e-10);
    assert!(sheet.face().is_alive[1]);
    assert_eq!(total_sides(&sheet), 10);
    assert!(sheet.validate().is_valid());
}

#[test]
fn test_divide_interior_cell() {
    let mut sheet = grid();
    let (nv, ne) = (sheet.nv(), sheet.ne());
    let area = sheet.face().area[4];

    let daughter = cell_division(&mut sheet, face(4), &SheetGeometry, Some(1.0)).unwrap();
    assert_eq!(sheet.nv(), nv + 2);
    assert_eq!(sheet.ne(), ne + 6);
    let combined = sheet.face().area[4] + sheet.face().area[daughter.as_usize()];
    assert!((combined - area).abs() < 1e-10);

    // 新顶点之间的一对半边分属母细胞与子细胞
    let shared = sheet
        .face_edges(daughter)
        .iter()
        .filter_map(|&e| sheet.opposite(e))
        .any(|o| sheet.edge().face[o.as_usize()] == face(4));
    assert!(shared);
    assert!(sheet.validate().is_valid());
}

#[test]
fn test_dead_mother_is_noop() {
    let mut sheet = grid();
    sheet.face_mut().is_alive[4] = false;
    let (nv, ne, nf) = (sheet.nv(), sheet.ne(), sheet.nf());
    let err = cell_division(&mut sheet, face(4), &SheetGeometry, Some(0.0)).unwrap_err();
    assert!(matches!(err, TopologyError::DeadFace { .. }));
    assert_eq!((sheet.nv(), sheet.ne(), sheet.nf()), (nv, ne, nf));
}

#[test]
fn test_concave_cell_with_four_crossings_is_refused() {
    let mut sheet = u_shaped_cell();
    let before = snapshot(&sheet);

    let err = cell_division(&mut sheet, face(0), &SheetGeometry, Some(std::f64::consts::FRAC_PI_2))
        .unwrap_err();
    assert!(matches!(err, TopologyError::NoDivisionPlane { .. }));
    assert_eq!(snapshot(&sheet), before);
    assert_eq!(sheet.vert().len(), 8);
    assert_eq!(sheet.edge().len(), 8);
    assert!(!sheet.is_geometry_stale());
    assert!(sheet.validate().is_valid());
}

#[test]
fn test_concave_cell_across_its_base() {
    let mut sheet = u_shaped_cell();

    // 分裂线垂直于长轴，只穿过底边与内侧底边
    let daughter = cell_division(&mut sheet, face(0), &SheetGeometry, Some(0.0)).unwrap();
    assert_eq!((sheet.nv(), sheet.ne(), sheet.nf()), (10, 12, 2));
    assert_eq!(sheet.face().num_sides[0], 6);
    assert_eq!(sheet.face().num_sides[daughter.as_usize()], 6);
    assert!(sheet.validate().is_valid());
}

#[test]
fn test_unknown_mother_is_noop() {
    let mut sheet = grid();
    let before = snapshot(&sheet);
    let err = cell_division(&mut sheet, face(99), &SheetGeometry, Some(0.0)).unwrap_err();
    assert!(matches!(err, TopologyError::UnknownFace { .. }));
    assert_eq!(snapshot(&sheet), before);
}

#[test]
fn test_seeded_division_is_reproducible() {
    let mut first = grid();
    let mut second = grid();
    let mut rng = StdRng::seed_from_u64(11);
    let a = cell_division_with_rng(&mut first, face(4), &SheetGeometry, &mut rng).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let b = cell_division_with_rng(&mut second, face(4), &SheetGeometry, &mut rng).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.vert().pos, second.vert().pos);
}

#[test]
fn test_division_event_grows_then_divides() {
    let mut sheet = grid();
    let vol = sheet.face().vol[4];
    let prefered = sheet.face().prefered_vol[4];
    let area = sheet.face().prefered_area[4];

    // V0 取当前体积：临界体积为 2·vol
    let grow = DivisionSpec {
        critical_vol: 2.0,
        growth_rate: 0.5,
    };
    assert_eq!(
        division_event(&mut sheet, face(4), &grow, vol, &SheetGeometry).unwrap(),
        DivisionOutcome::Grew
    );
    assert!((sheet.face().prefered_vol[4] - 1.5 * prefered).abs() < 1e-12);
    assert!((sheet.face().prefered_area[4] - 1.5f64.powf(2.0 / 3.0) * area).abs() < 1e-12);
    assert_eq!(sheet.nf(), 9);

    let divide = DivisionSpec {
        critical_vol: 0.5,
        growth_rate: 0.5,
    };
    let outcome = division_event(&mut sheet, face(4), &divide, vol, &SheetGeometry).unwrap();
    assert_eq!(outcome, DivisionOutcome::Divided(FaceId::from_usize(9)));
}

#[test]
fn test_division_spec_from_json() {
    let spec: DivisionSpec = serde_json::from_str(r#"{ "critical_vol": 3.0 }"#).unwrap();
    assert_eq!(spec.critical_vol, 3.0);
    assert!((spec.growth_rate - 0.1).abs() < 1e-15);
}
