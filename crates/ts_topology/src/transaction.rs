// crates/ts_topology/src/transaction.rs

//! 失败即回滚的网格编辑

use crate::error::TopologyResult;
use ts_mesh::Sheet;

/// 在网格快照保护下执行 `edit`
///
/// `edit` 返回错误时网格（含几何过期标记）恢复为调用前的状态。
pub(crate) fn with_rollback<T>(
    sheet: &mut Sheet,
    edit: impl FnOnce(&mut Sheet) -> TopologyResult<T>,
) -> TopologyResult<T> {
    let snapshot = sheet.clone();
    let result = edit(sheet);
    if result.is_err() {
        *sheet = snapshot;
        log::debug!("拓扑编辑失败, 网格已恢复");
    }
    result
}
