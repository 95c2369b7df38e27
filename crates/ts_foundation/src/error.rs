//! 错误处理模块，定义统一错误类型
//!
//! 提供 `TsError` 枚举和 `TsResult` 类型别名。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义通用错误，网格/几何/力学/拓扑错误在各自 crate 中定义
//! 2. **易用性**: 提供便捷的构造方法
//!
//! # 示例
//!
//! ```
//! use ts_foundation::error::{TsError, TsResult};
//!
//! fn parse_mode(s: &str) -> TsResult<()> {
//!     Err(TsError::invalid_config("geometry", s, "未知几何模式"))
//! }
//! assert!(parse_mode("torus").is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type TsResult<T> = Result<T, TsError>;

/// TisSheet 基础错误类型
#[derive(Error, Debug)]
pub enum TsError {
    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 未知的属性列
    #[error("未知的属性列: {table}.{column}")]
    UnknownColumn {
        /// 表名 (vert/edge/face)
        table: &'static str,
        /// 列名
        column: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },
}

impl TsError {
    /// 创建无效输入错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建大小不匹配错误
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 创建索引越界错误
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 创建未知列错误
    pub fn unknown_column(table: &'static str, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table,
            column: column.into(),
        }
    }

    /// 创建配置值无效错误
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 创建序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
