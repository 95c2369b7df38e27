//! 强类型索引
//!
//! 顶点、半边与面的标识符都是列存储中的行号，用标记类型区分。
//! 上皮层网格中的元素从不物理删除（死亡元素只清除活性标记），
//! 因此行号单调递增、永不复用，不需要代际校验。
//!
//! # 示例
//!
//! ```
//! use ts_foundation::index::{VertexId, vertex};
//!
//! let v = vertex(7);
//! assert!(v.is_valid());
//! assert_eq!(v.as_usize(), 7);
//! assert!(VertexId::INVALID.is_invalid());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// 顶点标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexTag;

/// 半边标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeTag;

/// 面(细胞)标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceTag;

/// 带元素类型的行号
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Idx<T> {
    row: u32,
    #[serde(skip)]
    _tag: PhantomData<T>,
}

/// 顶点标识
pub type VertexId = Idx<VertexTag>;

/// 半边标识
pub type EdgeId = Idx<EdgeTag>;

/// 面(细胞)标识
pub type FaceId = Idx<FaceTag>;

impl<T> Idx<T> {
    /// 空引用，例如未挂接到任何面的半边
    pub const INVALID: Self = Self::from_raw(u32::MAX);

    /// 从行号创建
    #[inline]
    pub const fn from_raw(row: u32) -> Self {
        Self {
            row,
            _tag: PhantomData,
        }
    }

    /// 从 usize 行号创建
    ///
    /// # Panics
    /// 行号超出 `u32` 标识空间时 panic。
    #[inline]
    pub fn from_usize(row: usize) -> Self {
        match u32::try_from(row) {
            Ok(raw) if raw != u32::MAX => Self::from_raw(raw),
            _ => panic!("row {row} exceeds the u32 id space"),
        }
    }

    /// 行号
    #[inline]
    pub const fn index(self) -> u32 {
        self.row
    }

    /// 行号（usize）
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.row as usize
    }

    /// 是否为有效引用
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row != u32::MAX
    }

    /// 是否为空引用
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.row == u32::MAX
    }
}

impl<T> Clone for Idx<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idx({self})")
    }
}

impl<T> fmt::Display for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.row)
        } else {
            f.write_str("INVALID")
        }
    }
}

/// 顶点标识
#[inline]
pub const fn vertex(row: u32) -> VertexId {
    VertexId::from_raw(row)
}

/// 半边标识
#[inline]
pub const fn edge(row: u32) -> EdgeId {
    EdgeId::from_raw(row)
}

/// 面标识
#[inline]
pub const fn face(row: u32) -> FaceId {
    FaceId::from_raw(row)
}
