// crates/ts_mesh/src/lib.rs

//! TisSheet Mesh Layer
//!
//! 上皮层的半边网格存储。
//!
//! # 模块概览
//!
//! - [`sheet`]: 网格主体 [`Sheet`]，上播/下播、追加、拓扑重建
//! - [`tables`]: 顶点/半边/面列存储表
//! - [`columns`]: 按名称访问的用户标量列
//! - [`settings`]: 几何模式与归一化配置
//! - [`validate`]: 拓扑一致性检查
//! - [`generation`]: 蜂窝网格生成
//!
//! # 示例
//!
//! ```
//! use ts_mesh::generation::single_hexagon;
//! use ts_mesh::SheetSettings;
//!
//! let sheet = single_hexagon(1.0, 0.0, SheetSettings::default()).unwrap();
//! let e = sheet.face_edges(ts_foundation::FaceId::from_usize(0))[0];
//! assert!(sheet.opposite(e).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod columns;
pub mod error;
pub mod generation;
pub mod settings;
pub mod sheet;
pub mod tables;
pub mod validate;

pub use columns::ScalarColumns;
pub use error::{MeshError, MeshResult};
pub use settings::{Axis, GeometryMode, SheetSettings};
pub use sheet::Sheet;
pub use tables::{EdgeTable, FaceTable, VertTable};
pub use validate::{ValidationError, ValidationReport};
