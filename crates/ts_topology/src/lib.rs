// crates/ts_topology/src/lib.rs

//! TisSheet Topology Layer
//!
//! 改变网格连接关系的局部操作。所有操作先完成全部查找与检查再写入，
//! 前置条件不满足时记录警告、返回错误并保持网格不变；写入阶段的失败
//! 会把网格恢复为操作前的状态。
//!
//! # 模块概览
//!
//! - [`type1`]: T1 转变
//! - [`vertex`]: 顶点插入与移除
//! - [`division`]: 细胞分裂
//! - [`events`]: 基于阈值的 T1、分裂与收缩事件
//!
//! # 示例
//!
//! ```
//! use ts_geometry::{Geometry, SheetGeometry};
//! use ts_mesh::generation::single_hexagon;
//! use ts_mesh::SheetSettings;
//! use ts_topology::cell_division;
//!
//! let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
//! SheetGeometry.update_all(&mut sheet).unwrap();
//! let mother = ts_foundation::FaceId::from_usize(0);
//! let daughter = cell_division(&mut sheet, mother, &SheetGeometry, Some(0.3)).unwrap();
//! assert_eq!(sheet.nf(), 2);
//! assert!(sheet.face().area[daughter.as_usize()] > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod division;
pub mod error;
pub mod events;
mod transaction;
pub mod type1;
pub mod vertex;

pub use division::{cell_division, cell_division_with_rng};
pub use error::{TopologyError, TopologyResult};
pub use events::{
    check_type1, contraction_event, division_event, tri_faces, type1_event, ContractionSpec,
    DivisionOutcome, DivisionSpec, Type1Spec,
};
pub use type1::type1_transition;
pub use vertex::{add_vert, remove_vert};
