// crates/ts_geometry/src/lib.rs

//! TisSheet Geometry Layer
//!
//! 由顶点位置和网格拓扑推导全部几何量。
//!
//! # 模块概览
//!
//! - [`sheet_geometry`]: [`Geometry`] 接口与默认实现 [`SheetGeometry`]
//! - [`height`]: 各几何模式下的 rho/高度及其梯度
//! - [`projection`]: 面的主成分投影
//! - [`scaffold`]: 网格居中与杆状几何端部
//!
//! # 示例
//!
//! ```
//! use ts_geometry::{Geometry, SheetGeometry};
//! use ts_mesh::generation::single_hexagon;
//! use ts_mesh::SheetSettings;
//!
//! let mut sheet = single_hexagon(1.0, 1.0, SheetSettings::default()).unwrap();
//! SheetGeometry.update_all(&mut sheet).unwrap();
//! assert!(sheet.face().area[0] > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod height;
pub mod projection;
pub mod scaffold;
pub mod sheet_geometry;

pub use error::{GeometryError, GeometryResult};
pub use height::{compute_rho, height_gradient, HeightModel};
pub use sheet_geometry::{Geometry, SheetGeometry};
