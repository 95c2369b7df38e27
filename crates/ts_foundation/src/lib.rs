// crates/ts_foundation/src/lib.rs

//! TisSheet Foundation Layer
//!
//! 上皮层顶点模型的基础抽象，供网格、几何、力学和拓扑各层共享。
//!
//! # 模块概览
//!
//! - [`index`]: 强类型索引 (顶点/半边/面)
//! - [`error`]: 统一错误类型
//! - [`float`]: 安全浮点运算与统计工具
//!
//! # 示例
//!
//! ```
//! use ts_foundation::index::{EdgeId, FaceId};
//!
//! let e = EdgeId::from_usize(3);
//! let f = FaceId::from_usize(3);
//! assert_eq!(e.as_usize(), f.as_usize());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;
pub mod index;

// 重导出常用类型
pub use error::{TsError, TsResult};
pub use index::{EdgeId, FaceId, Idx, VertexId};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{TsError, TsResult};
    pub use crate::float::{percentile, safe_div};
    pub use crate::index::{EdgeId, FaceId, Idx, VertexId};
}
