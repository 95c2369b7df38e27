// crates/ts_dynamics/src/error.rs

//! 力学层错误类型

use thiserror::Error;
use ts_foundation::TsError;
use ts_geometry::GeometryError;
use ts_mesh::MeshError;

/// 力学模块结果类型
pub type DynamicsResult<T> = Result<T, DynamicsError>;

/// 力学错误枚举
#[derive(Error, Debug)]
pub enum DynamicsError {
    /// 模型参数非法
    #[error("模型参数 {name} 非法: {value}")]
    InvalidParameter {
        /// 参数名
        name: &'static str,
        /// 参数值
        value: f64,
    },

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// 几何层错误
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] TsError),
}
