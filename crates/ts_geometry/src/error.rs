// crates/ts_geometry/src/error.rs

//! 几何层错误类型

use thiserror::Error;
use ts_foundation::TsError;
use ts_mesh::MeshError;

/// 几何模块结果类型
pub type GeometryResult<T> = Result<T, GeometryError>;

/// 几何错误枚举
#[derive(Error, Debug)]
pub enum GeometryError {
    /// 杆状几何缺少 (a, b) 参数
    #[error("杆状几何需要先设置 ab 参数 (调用 reset_scaffold)")]
    MissingRodParameters,

    /// 面退化，无法定义法向或投影平面
    #[error("面 {face} 退化: {reason}")]
    DegenerateFace {
        /// 面行号
        face: usize,
        /// 原因
        reason: &'static str,
    },

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

impl From<TsError> for GeometryError {
    fn from(err: TsError) -> Self {
        Self::Mesh(MeshError::Foundation(err))
    }
}

impl GeometryError {
    /// 创建面退化错误
    pub fn degenerate_face(face: usize, reason: &'static str) -> Self {
        Self::DegenerateFace { face, reason }
    }
}
