// crates/ts_dynamics/src/lib.rs

//! TisSheet Dynamics Layer
//!
//! 上皮层顶点模型：线张力、周长收缩、体积弹性三项能量及其解析梯度。
//!
//! # 模块概览
//!
//! - [`specs`]: 模型参数 [`ModelSpecs`]（serde/JSON）与量纲换算
//! - [`energy`]: 能量与能量分量
//! - [`gradient`]: 逐半边梯度表与逐顶点梯度
//!
//! 能量和梯度都读取派生几何列，调用前须先执行 `Geometry::update_all`。
//!
//! # 示例
//!
//! ```
//! use ts_dynamics::{compute_energy, compute_gradient, ModelSpecs};
//! use ts_geometry::{Geometry, SheetGeometry};
//! use ts_mesh::generation::HexaGridGenerator;
//! use ts_mesh::SheetSettings;
//!
//! let mut sheet = HexaGridGenerator::new(2, 2, 1.0)
//!     .with_offset(1.0)
//!     .build(SheetSettings::default())
//!     .unwrap();
//! ModelSpecs::default().apply(&mut sheet);
//! SheetGeometry.update_all(&mut sheet).unwrap();
//!
//! let energy = compute_energy(&sheet).unwrap();
//! let grad = compute_gradient(&sheet).unwrap();
//! assert!(energy > 0.0);
//! assert_eq!(grad.len(), sheet.vert().len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod energy;
pub mod error;
pub mod gradient;
pub mod specs;

pub use energy::{compute_energy, compute_energy_components, EnergyComponents};
pub use error::{DynamicsError, DynamicsResult};
pub use gradient::{compute_gradient, compute_gradient_components, GradientComponents};
pub use specs::{EdgeSpecs, FaceSpecs, ModelSpecs, NormSpecs};
