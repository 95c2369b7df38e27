// crates/ts_mesh/src/sheet.rs

//! 上皮层网格核心数据结构
//!
//! 顶点、半边、面三张列存储表，加上两份由 [`Sheet::reset_topo`] 维护的拓扑索引：
//!
//! 1. **面环序**: 每个面按环路顺序保存其半边标识符
//! 2. **对边映射**: `(srce, trgt) -> edge`，对边查询为 O(1) 且结果唯一
//!
//! # 设计要点
//!
//! - 标识符即行号，只追加不复用；死亡元素保留行，只清除活性标记
//! - 派生几何列是缓存：任何位置或连接关系的可变访问都会把整张网格标记为过期，
//!   直到几何引擎重新计算
//! - 上播 (upcast) 是按索引的 gather，下播 (downcast) 是按面/顶点分组的归约

use glam::DVec3;
use std::collections::HashMap;
use std::ops::{AddAssign, Div};

use crate::error::{MeshError, MeshResult};
use crate::settings::SheetSettings;
use crate::tables::{EdgeTable, FaceTable, VertTable};
use ts_foundation::{EdgeId, FaceId, VertexId};

/// 上皮层网格
#[derive(Debug, Clone)]
pub struct Sheet {
    /// 标识名
    identifier: String,
    /// 配置
    settings: SheetSettings,
    /// 顶点表
    vert: VertTable,
    /// 半边表
    edge: EdgeTable,
    /// 面表
    face: FaceTable,
    /// 每个面的半边环序
    face_edges: Vec<Vec<EdgeId>>,
    /// 有向边索引 (srce, trgt) -> edge
    pair_index: HashMap<(VertexId, VertexId), EdgeId>,
    /// 派生几何列是否过期
    geometry_stale: bool,
}

impl Sheet {
    /// 创建空网格
    pub fn new(identifier: impl Into<String>, settings: SheetSettings) -> Self {
        Self {
            identifier: identifier.into(),
            settings,
            vert: VertTable::default(),
            edge: EdgeTable::default(),
            face: FaceTable::default(),
            face_edges: Vec::new(),
            pair_index: HashMap::new(),
            geometry_stale: true,
        }
    }

    /// 由顶点坐标和多边形顶点环构建网格
    ///
    /// 每个多边形按给定顺序生成半边，相邻多边形的公共边应方向相反。
    ///
    /// # 错误
    /// 顶点越界、少于 3 个顶点的多边形或重复有向边时返回错误
    pub fn from_polygons(
        identifier: impl Into<String>,
        positions: &[DVec3],
        polygons: &[Vec<usize>],
        settings: SheetSettings,
    ) -> MeshResult<Self> {
        let mut sheet = Self::new(identifier, settings);
        for &p in positions {
            sheet.vert.push(p);
        }
        for (k, poly) in polygons.iter().enumerate() {
            if poly.len() < 3 {
                return Err(MeshError::invalid_topology(
                    "from_polygons",
                    format!("多边形 {k} 只有 {} 个顶点", poly.len()),
                ));
            }
            if let Some(&bad) = poly.iter().find(|&&v| v >= positions.len()) {
                return Err(MeshError::invalid_topology(
                    "from_polygons",
                    format!("多边形 {k} 引用了不存在的顶点 {bad}"),
                ));
            }
            let f = sheet.face.push();
            for (i, &s) in poly.iter().enumerate() {
                let t = poly[(i + 1) % poly.len()];
                sheet
                    .edge
                    .push(VertexId::from_usize(s), VertexId::from_usize(t), f);
            }
        }
        sheet.reset_topo()?;
        Ok(sheet)
    }

    // =========================================================================
    // 基本访问
    // =========================================================================

    /// 标识名
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 配置
    pub fn settings(&self) -> &SheetSettings {
        &self.settings
    }

    /// 配置（可变）；几何模式或高度轴可能改变，标记几何过期
    pub fn settings_mut(&mut self) -> &mut SheetSettings {
        self.geometry_stale = true;
        &mut self.settings
    }

    /// 设置能量与梯度归一化因子；不影响几何
    pub fn set_norm_factors(&mut self, nrj_norm_factor: f64, grad_norm_factor: f64) {
        self.settings.nrj_norm_factor = nrj_norm_factor;
        self.settings.grad_norm_factor = grad_norm_factor;
    }

    /// 顶点表
    #[inline]
    pub fn vert(&self) -> &VertTable {
        &self.vert
    }

    /// 半边表
    #[inline]
    pub fn edge(&self) -> &EdgeTable {
        &self.edge
    }

    /// 面表
    #[inline]
    pub fn face(&self) -> &FaceTable {
        &self.face
    }

    /// 顶点表（可变），标记几何过期
    pub fn vert_mut(&mut self) -> &mut VertTable {
        self.geometry_stale = true;
        &mut self.vert
    }

    /// 半边表（可变），标记几何过期
    ///
    /// 修改 `srce`/`trgt`/`face` 后必须调用 [`Sheet::reset_topo`]。
    pub fn edge_mut(&mut self) -> &mut EdgeTable {
        self.geometry_stale = true;
        &mut self.edge
    }

    /// 面表（可变）
    ///
    /// 面表不含几何输入列，不影响过期标记。
    pub fn face_mut(&mut self) -> &mut FaceTable {
        &mut self.face
    }

    /// 半边参数列（可变），不影响过期标记
    pub fn edge_param_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.edge.param_mut(name)
    }

    /// 修改单个顶点位置
    pub fn set_position(&mut self, v: VertexId, pos: DVec3) {
        self.geometry_stale = true;
        self.vert.pos[v.as_usize()] = pos;
    }

    /// 几何引擎专用：同时借出三张表，不改变过期标记
    ///
    /// 写完全部派生列后调用 [`Sheet::mark_geometry_fresh`]。
    pub fn tables_mut(&mut self) -> (&mut VertTable, &mut EdgeTable, &mut FaceTable) {
        (&mut self.vert, &mut self.edge, &mut self.face)
    }

    /// 标记派生几何列为最新
    pub fn mark_geometry_fresh(&mut self) {
        self.geometry_stale = false;
    }

    /// 标记派生几何列为过期
    pub fn mark_geometry_stale(&mut self) {
        self.geometry_stale = true;
    }

    /// 派生几何列是否过期
    #[inline]
    pub fn is_geometry_stale(&self) -> bool {
        self.geometry_stale
    }

    /// 要求派生几何列为最新
    pub fn ensure_fresh(&self, context: &'static str) -> MeshResult<()> {
        if self.geometry_stale {
            Err(MeshError::stale_geometry(context))
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // 统计
    // =========================================================================

    /// 活动顶点数
    pub fn nv(&self) -> usize {
        self.vert.is_active.iter().filter(|&&a| a).count()
    }

    /// 活动半边数
    pub fn ne(&self) -> usize {
        self.edge.is_active.iter().filter(|&&a| a).count()
    }

    /// 面数（含死亡面）
    pub fn nf(&self) -> usize {
        self.face.len()
    }

    /// 活动半边标识符（按行号递增）
    pub fn active_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge
            .is_active
            .iter()
            .enumerate()
            .filter(|(_, &a)| a)
            .map(|(i, _)| EdgeId::from_usize(i))
    }

    /// 所有面标识符
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.face.len()).map(FaceId::from_usize)
    }

    // =========================================================================
    // 拓扑查询
    // =========================================================================

    /// 面的半边（环序）
    pub fn face_edges(&self, f: FaceId) -> &[EdgeId] {
        &self.face_edges[f.as_usize()]
    }

    /// 面的顶点（环序，即各半边起点）
    pub fn face_verts(&self, f: FaceId) -> Vec<VertexId> {
        self.face_edges(f)
            .iter()
            .map(|e| self.edge.srce[e.as_usize()])
            .collect()
    }

    /// 查找有向边 srce -> trgt
    #[inline]
    pub fn find_edge(&self, srce: VertexId, trgt: VertexId) -> Option<EdgeId> {
        self.pair_index.get(&(srce, trgt)).copied()
    }

    /// 对边 (trgt -> srce)，边界半边返回 None
    pub fn opposite(&self, e: EdgeId) -> Option<EdgeId> {
        let i = e.as_usize();
        self.find_edge(self.edge.trgt[i], self.edge.srce[i])
    }

    /// 面环中紧随 `e` 的半边
    pub fn next_in_face(&self, e: EdgeId) -> Option<EdgeId> {
        let ring = self.face_edges(self.edge.face[e.as_usize()]);
        let pos = ring.iter().position(|&x| x == e)?;
        Some(ring[(pos + 1) % ring.len()])
    }

    /// 面环中位于 `e` 之前的半边
    pub fn prev_in_face(&self, e: EdgeId) -> Option<EdgeId> {
        let ring = self.face_edges(self.edge.face[e.as_usize()]);
        let pos = ring.iter().position(|&x| x == e)?;
        Some(ring[(pos + ring.len() - 1) % ring.len()])
    }

    /// 以 `v` 为起点的活动半边
    pub fn outgoing(&self, v: VertexId) -> Vec<EdgeId> {
        self.active_edges()
            .filter(|e| self.edge.srce[e.as_usize()] == v)
            .collect()
    }

    /// 以 `v` 为终点的活动半边
    pub fn incoming(&self, v: VertexId) -> Vec<EdgeId> {
        self.active_edges()
            .filter(|e| self.edge.trgt[e.as_usize()] == v)
            .collect()
    }

    // =========================================================================
    // 上播 / 下播
    // =========================================================================

    /// 把顶点值广播到以其为起点的每条半边
    ///
    /// # Panics
    /// `values` 长度不等于顶点行数时 panic
    pub fn upcast_srce<T: Copy>(&self, values: &[T]) -> Vec<T> {
        assert_eq!(values.len(), self.vert.len(), "upcast_srce: 顶点列长度不匹配");
        self.edge.srce.iter().map(|v| values[v.as_usize()]).collect()
    }

    /// 把顶点值广播到以其为终点的每条半边
    ///
    /// # Panics
    /// `values` 长度不等于顶点行数时 panic
    pub fn upcast_trgt<T: Copy>(&self, values: &[T]) -> Vec<T> {
        assert_eq!(values.len(), self.vert.len(), "upcast_trgt: 顶点列长度不匹配");
        self.edge.trgt.iter().map(|v| values[v.as_usize()]).collect()
    }

    /// 把面值广播到属于该面的每条半边
    ///
    /// # Panics
    /// `values` 长度不等于面行数时 panic
    pub fn upcast_face<T: Copy>(&self, values: &[T]) -> Vec<T> {
        assert_eq!(values.len(), self.face.len(), "upcast_face: 面列长度不匹配");
        self.edge.face.iter().map(|f| values[f.as_usize()]).collect()
    }

    /// 按面对活动半边值求和（按环序累加）
    ///
    /// # Panics
    /// `values` 长度不等于半边行数时 panic
    pub fn sum_face<T: Copy + Default + AddAssign>(&self, values: &[T]) -> Vec<T> {
        assert_eq!(values.len(), self.edge.len(), "sum_face: 半边列长度不匹配");
        self.face_edges
            .iter()
            .map(|ring| {
                let mut acc = T::default();
                for e in ring {
                    acc += values[e.as_usize()];
                }
                acc
            })
            .collect()
    }

    /// 按面对活动半边值求平均，空面为默认值
    pub fn mean_face<T>(&self, values: &[T]) -> Vec<T>
    where
        T: Copy + Default + AddAssign + Div<f64, Output = T>,
    {
        self.sum_face(values)
            .into_iter()
            .zip(&self.face_edges)
            .map(|(sum, ring)| {
                if ring.is_empty() {
                    T::default()
                } else {
                    sum / ring.len() as f64
                }
            })
            .collect()
    }

    /// 按起点顶点对活动半边值求和
    pub fn sum_srce<T: Copy + Default + AddAssign>(&self, values: &[T]) -> Vec<T> {
        self.group_vertex(values, &self.edge.srce)
    }

    /// 按终点顶点对活动半边值求和
    pub fn sum_trgt<T: Copy + Default + AddAssign>(&self, values: &[T]) -> Vec<T> {
        self.group_vertex(values, &self.edge.trgt)
    }

    fn group_vertex<T: Copy + Default + AddAssign>(&self, values: &[T], key: &[VertexId]) -> Vec<T> {
        assert_eq!(values.len(), self.edge.len(), "sum_vertex: 半边列长度不匹配");
        let mut out = vec![T::default(); self.vert.len()];
        for e in self.active_edges() {
            let i = e.as_usize();
            out[key[i].as_usize()] += values[i];
        }
        out
    }

    // =========================================================================
    // 结构编辑
    // =========================================================================

    /// 追加默认顶点
    pub fn append_vert(&mut self, pos: DVec3) -> VertexId {
        self.geometry_stale = true;
        self.vert.push(pos)
    }

    /// 追加顶点，复制 `src` 的属性
    pub fn append_vert_copy(&mut self, src: VertexId, pos: DVec3) -> VertexId {
        self.geometry_stale = true;
        self.vert.push_copy(src, pos)
    }

    /// 追加半边；须随后调用 [`Sheet::reset_topo`]
    pub fn append_edge(&mut self, srce: VertexId, trgt: VertexId, face: FaceId) -> EdgeId {
        self.geometry_stale = true;
        self.edge.push(srce, trgt, face)
    }

    /// 追加半边，复制 `src` 的属性（含连接关系）
    pub fn append_edge_copy(&mut self, src: EdgeId) -> EdgeId {
        self.geometry_stale = true;
        self.edge.push_copy(src)
    }

    /// 追加默认面
    pub fn append_face(&mut self) -> FaceId {
        self.face_edges.push(Vec::new());
        self.face.push()
    }

    /// 追加面，复制 `src` 的属性（不含半边）
    pub fn append_face_copy(&mut self, src: FaceId) -> FaceId {
        self.face_edges.push(Vec::new());
        self.face.push_copy(src)
    }

    /// 重写半边的连接关系；须随后调用 [`Sheet::reset_topo`]
    pub fn set_edge(&mut self, e: EdgeId, srce: VertexId, trgt: VertexId, face: FaceId) {
        self.geometry_stale = true;
        let i = e.as_usize();
        self.edge.srce[i] = srce;
        self.edge.trgt[i] = trgt;
        self.edge.face[i] = face;
    }

    /// 重新指定半边所属面
    pub fn set_edge_face(&mut self, e: EdgeId, face: FaceId) {
        self.geometry_stale = true;
        self.edge.face[e.as_usize()] = face;
    }

    /// 停用半边（不删除行）
    pub fn deactivate_edge(&mut self, e: EdgeId) {
        self.geometry_stale = true;
        self.edge.is_active[e.as_usize()] = false;
    }

    /// 停用顶点（不删除行）
    pub fn deactivate_vert(&mut self, v: VertexId) {
        self.geometry_stale = true;
        self.vert.is_active[v.as_usize()] = false;
    }

    /// 重建面环序、边数和有向边索引
    ///
    /// 新索引全部构建成功后才替换旧索引；失败时网格拓扑索引保持不变。
    /// 总是把派生几何列标记为过期。
    ///
    /// # 错误
    /// - 面内两条半边起点相同、环路不闭合或一个面含多个环: `InvalidTopology`
    /// - 重复有向边: `DuplicateEdge`
    pub fn reset_topo(&mut self) -> MeshResult<()> {
        self.geometry_stale = true;
        let nf = self.face.len();

        let mut groups: Vec<Vec<EdgeId>> = vec![Vec::new(); nf];
        for e in self.active_edges() {
            let f = self.edge.face[e.as_usize()];
            if f.is_invalid() || f.as_usize() >= nf {
                return Err(MeshError::invalid_topology(
                    "reset_topo",
                    format!("半边 {e} 引用了不存在的面 {f}"),
                ));
            }
            groups[f.as_usize()].push(e);
        }

        let mut rings = Vec::with_capacity(nf);
        for (fi, group) in groups.into_iter().enumerate() {
            let previous = self.face_edges.get(fi).map(Vec::as_slice).unwrap_or(&[]);
            rings.push(self.order_ring(fi, group, previous)?);
        }

        let mut pairs = HashMap::with_capacity(self.edge.len());
        for e in self.active_edges() {
            let i = e.as_usize();
            let key = (self.edge.srce[i], self.edge.trgt[i]);
            if pairs.insert(key, e).is_some() {
                return Err(MeshError::DuplicateEdge {
                    srce: key.0.as_usize(),
                    trgt: key.1.as_usize(),
                });
            }
        }

        for (fi, ring) in rings.iter().enumerate() {
            self.face.num_sides[fi] = ring.len();
        }
        self.face_edges = rings;
        self.pair_index = pairs;
        Ok(())
    }

    /// 把一个面的半边排成环
    ///
    /// 起始半边优先沿用旧环序中仍属于该面的第一条，使环序在编辑前后保持稳定。
    fn order_ring(
        &self,
        fi: usize,
        group: Vec<EdgeId>,
        previous: &[EdgeId],
    ) -> MeshResult<Vec<EdgeId>> {
        if group.is_empty() {
            return Ok(group);
        }

        let mut by_srce: HashMap<VertexId, EdgeId> = HashMap::with_capacity(group.len());
        for &e in &group {
            if by_srce.insert(self.edge.srce[e.as_usize()], e).is_some() {
                return Err(MeshError::invalid_topology(
                    "reset_topo",
                    format!("面 {fi} 中有两条半边起点为 {}", self.edge.srce[e.as_usize()]),
                ));
            }
        }

        let start = previous
            .iter()
            .copied()
            .find(|e| group.contains(e))
            .or_else(|| group.iter().copied().min())
            .ok_or_else(|| MeshError::invalid_topology("reset_topo", "空面"))?;

        let mut ring = Vec::with_capacity(group.len());
        let mut current = start;
        loop {
            ring.push(current);
            let trgt = self.edge.trgt[current.as_usize()];
            current = by_srce.get(&trgt).copied().ok_or_else(|| {
                MeshError::invalid_topology(
                    "reset_topo",
                    format!("面 {fi} 的环路在顶点 {trgt} 处断开"),
                )
            })?;
            if current == start {
                break;
            }
            if ring.len() > group.len() {
                return Err(MeshError::invalid_topology(
                    "reset_topo",
                    format!("面 {fi} 的环路不闭合"),
                ));
            }
        }

        if ring.len() != group.len() {
            return Err(MeshError::invalid_topology(
                "reset_topo",
                format!("面 {fi} 含有多个环 ({} / {} 条半边)", ring.len(), group.len()),
            ));
        }
        Ok(ring)
    }
}
