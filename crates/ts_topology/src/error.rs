// crates/ts_topology/src/error.rs

//! 拓扑层错误类型
//!
//! 前置条件不满足时网格保持不变，返回的错误可恢复。

use thiserror::Error;
use ts_foundation::{EdgeId, FaceId, VertexId};
use ts_geometry::GeometryError;
use ts_mesh::MeshError;

/// 拓扑模块结果类型
pub type TopologyResult<T> = Result<T, TopologyError>;

/// 拓扑错误枚举
#[derive(Error, Debug)]
pub enum TopologyError {
    /// 半边不存在或已停用
    #[error("半边 {edge} 不存在或已停用")]
    InactiveEdge {
        /// 半边
        edge: EdgeId,
    },

    /// 边界半边没有对边
    #[error("半边 {edge} 位于边界 (没有对边)")]
    BoundaryEdge {
        /// 半边
        edge: EdgeId,
    },

    /// 邻域不满足操作要求
    #[error("半边 {edge} 的邻域不满足 T1 条件: {reason}")]
    InvalidNeighborhood {
        /// 半边
        edge: EdgeId,
        /// 原因
        reason: &'static str,
    },

    /// 面标识超出面表
    #[error("面 {face} 不存在")]
    UnknownFace {
        /// 面
        face: FaceId,
    },

    /// 面已死亡
    #[error("面 {face} 已死亡, 不能参与拓扑操作")]
    DeadFace {
        /// 面
        face: FaceId,
    },

    /// 顶点不是二价顶点
    #[error("顶点 {vertex} 有 {neighbours} 个邻居, 只能移除二价顶点")]
    NotTwoValent {
        /// 顶点
        vertex: VertexId,
        /// 邻居数
        neighbours: usize,
    },

    /// 移除顶点会产生非法的面
    #[error("移除顶点 {vertex} 失败: {reason}")]
    InvalidRemoval {
        /// 顶点
        vertex: VertexId,
        /// 原因
        reason: &'static str,
    },

    /// 分裂线与面的边界不是恰好相交两次
    #[error("面 {face} 的分裂线没有恰好穿过两条边")]
    NoDivisionPlane {
        /// 面
        face: FaceId,
    },

    /// 网格层错误
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// 几何层错误
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl TopologyError {
    /// 记录警告并返回自身
    pub(crate) fn warn(self) -> Self {
        log::warn!("{self}");
        self
    }
}
