// crates/ts_mesh/src/error.rs
//! 网格层错误类型
//!
//! 包含拓扑、配置、几何缓存失效等错误定义，
//! 所有错误可转换为 `ts_foundation::TsError` 向上传播。

use thiserror::Error;
use ts_foundation::TsError;

/// 网格模块结果类型
pub type MeshResult<T> = Result<T, MeshError>;

/// 网格错误枚举
#[derive(Error, Debug)]
pub enum MeshError {
    /// 拓扑错误
    #[error("拓扑错误: {operation} 失败, {details}")]
    InvalidTopology {
        /// 出错的操作
        operation: &'static str,
        /// 详细说明
        details: String,
    },

    /// 重复的有向边 (srce, trgt)
    #[error("重复的有向边: {srce} -> {trgt}")]
    DuplicateEdge {
        /// 起点行号
        srce: usize,
        /// 终点行号
        trgt: usize,
    },

    /// 派生几何列已失效
    #[error("几何数据已过期: 位置或连接关系修改后需先调用 update_all ({context})")]
    StaleGeometry {
        /// 读取方
        context: &'static str,
    },

    /// 基础层错误
    #[error(transparent)]
    Foundation(#[from] TsError),
}

impl From<MeshError> for TsError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::Foundation(inner) => inner,
            other => TsError::invalid_input(other.to_string()),
        }
    }
}

impl MeshError {
    /// 创建拓扑错误
    pub fn invalid_topology(operation: &'static str, details: impl Into<String>) -> Self {
        Self::InvalidTopology {
            operation,
            details: details.into(),
        }
    }

    /// 创建几何过期错误
    pub fn stale_geometry(context: &'static str) -> Self {
        Self::StaleGeometry { context }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_to_foundation() {
        let err = MeshError::invalid_topology("reset_topo", "face 3 is not closed");
        let foundation: TsError = err.into();
        assert!(matches!(foundation, TsError::InvalidInput { .. }));
        assert!(foundation.to_string().contains("face 3"));
    }

    #[test]
    fn test_foundation_roundtrip() {
        let err: MeshError = TsError::unknown_column("edge", "foo").into();
        let back: TsError = err.into();
        assert!(matches!(back, TsError::UnknownColumn { .. }));
    }
}
