//! 顶点/半边/面列存储表
//!
//! 每类元素一张 SoA 表，行号即元素标识符。内置列为强类型字段，
//! 其余用户属性放在 [`ScalarColumns`] 中按名称访问。

use glam::DVec3;

use crate::columns::ScalarColumns;
use ts_foundation::{EdgeId, FaceId, TsError, TsResult, VertexId};

#[inline]
fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// 顶点表
// ============================================================================

/// 顶点表
#[derive(Debug, Clone, Default)]
pub struct VertTable {
    /// 位置
    pub pos: Vec<DVec3>,
    /// 度量距离 (派生)
    pub rho: Vec<f64>,
    /// 高度 = rho - basal_shift (派生)
    pub height: Vec<f64>,
    /// 基底偏移
    pub basal_shift: Vec<f64>,
    /// 杆状几何左尖端标记
    pub left_tip: Vec<bool>,
    /// 杆状几何右尖端标记
    pub right_tip: Vec<bool>,
    /// 活性标记 (孤立顶点为 false)
    pub is_active: Vec<bool>,
    /// 附加列
    pub extra: ScalarColumns,
}

impl VertTable {
    /// 行数
    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// 追加默认顶点
    pub fn push(&mut self, pos: DVec3) -> VertexId {
        let id = VertexId::from_usize(self.len());
        self.pos.push(pos);
        self.rho.push(0.0);
        self.height.push(0.0);
        self.basal_shift.push(0.0);
        self.left_tip.push(false);
        self.right_tip.push(false);
        self.is_active.push(true);
        self.extra.push_default();
        id
    }

    /// 追加顶点，复制 `src` 的属性，位置另给
    pub fn push_copy(&mut self, src: VertexId, pos: DVec3) -> VertexId {
        let s = src.as_usize();
        let id = VertexId::from_usize(self.len());
        self.pos.push(pos);
        self.rho.push(self.rho[s]);
        self.height.push(self.height[s]);
        self.basal_shift.push(self.basal_shift[s]);
        self.left_tip.push(self.left_tip[s]);
        self.right_tip.push(self.right_tip[s]);
        self.is_active.push(true);
        self.extra.push_copy(s);
        id
    }

    /// 标量列（内置 f64 列或附加列）
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "rho" => Some(&self.rho),
            "height" => Some(&self.height),
            "basal_shift" => Some(&self.basal_shift),
            _ => self.extra.get(name),
        }
    }

    /// 按列名读取单个值
    pub fn get(&self, name: &str, id: VertexId) -> TsResult<f64> {
        let i = self.check(id)?;
        match name {
            "x" => Ok(self.pos[i].x),
            "y" => Ok(self.pos[i].y),
            "z" => Ok(self.pos[i].z),
            "left_tip" => Ok(bool_to_f64(self.left_tip[i])),
            "right_tip" => Ok(bool_to_f64(self.right_tip[i])),
            "is_active" => Ok(bool_to_f64(self.is_active[i])),
            _ => self
                .column(name)
                .map(|c| c[i])
                .ok_or_else(|| TsError::unknown_column("vert", name)),
        }
    }

    /// 按列名写入单个值
    pub fn set(&mut self, name: &str, id: VertexId, value: f64) -> TsResult<()> {
        let i = self.check(id)?;
        match name {
            "x" => self.pos[i].x = value,
            "y" => self.pos[i].y = value,
            "z" => self.pos[i].z = value,
            "rho" => self.rho[i] = value,
            "height" => self.height[i] = value,
            "basal_shift" => self.basal_shift[i] = value,
            "left_tip" => self.left_tip[i] = value != 0.0,
            "right_tip" => self.right_tip[i] = value != 0.0,
            "is_active" => self.is_active[i] = value != 0.0,
            _ => {
                let col = self
                    .extra
                    .get_mut(name)
                    .ok_or_else(|| TsError::unknown_column("vert", name))?;
                col[i] = value;
            }
        }
        Ok(())
    }

    fn check(&self, id: VertexId) -> TsResult<usize> {
        let i = id.as_usize();
        if id.is_invalid() || i >= self.len() {
            return Err(TsError::index_out_of_bounds("vertex", i, self.len()));
        }
        Ok(i)
    }
}

// ============================================================================
// 半边表
// ============================================================================

/// 半边表
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    /// 起点
    pub srce: Vec<VertexId>,
    /// 终点
    pub trgt: Vec<VertexId>,
    /// 所属面
    pub face: Vec<FaceId>,
    /// 位移向量 trgt - srce (派生)
    pub dx: Vec<DVec3>,
    /// 长度 (派生)
    pub length: Vec<f64>,
    /// 面法向贡献 (派生)
    pub normal: Vec<DVec3>,
    /// 子面积 (派生)
    pub sub_area: Vec<f64>,
    /// 子体积 (派生)
    pub sub_vol: Vec<f64>,
    /// 线张力
    pub line_tension: Vec<f64>,
    /// 活性标记
    pub is_active: Vec<bool>,
    /// 附加列
    pub extra: ScalarColumns,
}

impl EdgeTable {
    /// 行数
    #[inline]
    pub fn len(&self) -> usize {
        self.srce.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.srce.is_empty()
    }

    /// 追加默认半边
    pub fn push(&mut self, srce: VertexId, trgt: VertexId, face: FaceId) -> EdgeId {
        let id = EdgeId::from_usize(self.len());
        self.srce.push(srce);
        self.trgt.push(trgt);
        self.face.push(face);
        self.dx.push(DVec3::ZERO);
        self.length.push(0.0);
        self.normal.push(DVec3::ZERO);
        self.sub_area.push(0.0);
        self.sub_vol.push(0.0);
        self.line_tension.push(0.0);
        self.is_active.push(true);
        self.extra.push_default();
        id
    }

    /// 追加半边，复制 `src` 的全部属性（含连接关系）
    pub fn push_copy(&mut self, src: EdgeId) -> EdgeId {
        let s = src.as_usize();
        let id = EdgeId::from_usize(self.len());
        self.srce.push(self.srce[s]);
        self.trgt.push(self.trgt[s]);
        self.face.push(self.face[s]);
        self.dx.push(self.dx[s]);
        self.length.push(self.length[s]);
        self.normal.push(self.normal[s]);
        self.sub_area.push(self.sub_area[s]);
        self.sub_vol.push(self.sub_vol[s]);
        self.line_tension.push(self.line_tension[s]);
        self.is_active.push(true);
        self.extra.push_copy(s);
        id
    }

    /// 标量列（内置 f64 列或附加列）
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "length" => Some(&self.length),
            "sub_area" => Some(&self.sub_area),
            "sub_vol" => Some(&self.sub_vol),
            "line_tension" => Some(&self.line_tension),
            _ => self.extra.get(name),
        }
    }

    /// 参数列（可变），不含连接关系与派生几何列
    pub fn param_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        match name {
            "line_tension" => Some(&mut self.line_tension),
            _ => self.extra.get_mut(name),
        }
    }

    /// 按列名读取单个值
    pub fn get(&self, name: &str, id: EdgeId) -> TsResult<f64> {
        let i = self.check(id)?;
        match name {
            "srce" => Ok(f64::from(self.srce[i].index())),
            "trgt" => Ok(f64::from(self.trgt[i].index())),
            "face" => Ok(f64::from(self.face[i].index())),
            "dx" => Ok(self.dx[i].x),
            "dy" => Ok(self.dx[i].y),
            "dz" => Ok(self.dx[i].z),
            "nx" => Ok(self.normal[i].x),
            "ny" => Ok(self.normal[i].y),
            "nz" => Ok(self.normal[i].z),
            "is_active" => Ok(bool_to_f64(self.is_active[i])),
            _ => self
                .column(name)
                .map(|c| c[i])
                .ok_or_else(|| TsError::unknown_column("edge", name)),
        }
    }

    /// 按列名写入参数值（连接关系须通过 `Sheet` 的结构编辑接口修改）
    pub fn set(&mut self, name: &str, id: EdgeId, value: f64) -> TsResult<()> {
        let i = self.check(id)?;
        let col = self
            .param_mut(name)
            .ok_or_else(|| TsError::unknown_column("edge", name))?;
        col[i] = value;
        Ok(())
    }

    fn check(&self, id: EdgeId) -> TsResult<usize> {
        let i = id.as_usize();
        if id.is_invalid() || i >= self.len() {
            return Err(TsError::index_out_of_bounds("edge", i, self.len()));
        }
        Ok(i)
    }
}

// ============================================================================
// 面表
// ============================================================================

/// 面(细胞)表
#[derive(Debug, Clone, Default)]
pub struct FaceTable {
    /// 质心 (派生)
    pub centroid: Vec<DVec3>,
    /// 面积 (派生)
    pub area: Vec<f64>,
    /// 周长 (派生)
    pub perimeter: Vec<f64>,
    /// 体积 (派生)
    pub vol: Vec<f64>,
    /// 平均高度 (派生)
    pub height: Vec<f64>,
    /// 平均 rho (派生)
    pub rho: Vec<f64>,
    /// 边数 (由 reset_topo 维护)
    pub num_sides: Vec<usize>,
    /// 存活标记
    pub is_alive: Vec<bool>,
    /// 收缩性
    pub contractility: Vec<f64>,
    /// 体积弹性
    pub vol_elasticity: Vec<f64>,
    /// 偏好高度
    pub prefered_height: Vec<f64>,
    /// 偏好面积
    pub prefered_area: Vec<f64>,
    /// 偏好体积
    pub prefered_vol: Vec<f64>,
    /// 附加列
    pub extra: ScalarColumns,
}

impl FaceTable {
    /// 行数
    #[inline]
    pub fn len(&self) -> usize {
        self.area.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.area.is_empty()
    }

    /// 追加默认面 (存活)
    pub fn push(&mut self) -> FaceId {
        let id = FaceId::from_usize(self.len());
        self.centroid.push(DVec3::ZERO);
        self.area.push(0.0);
        self.perimeter.push(0.0);
        self.vol.push(0.0);
        self.height.push(0.0);
        self.rho.push(0.0);
        self.num_sides.push(0);
        self.is_alive.push(true);
        self.contractility.push(0.0);
        self.vol_elasticity.push(0.0);
        self.prefered_height.push(0.0);
        self.prefered_area.push(0.0);
        self.prefered_vol.push(0.0);
        self.extra.push_default();
        id
    }

    /// 追加面，复制 `src` 的全部属性
    pub fn push_copy(&mut self, src: FaceId) -> FaceId {
        let s = src.as_usize();
        let id = FaceId::from_usize(self.len());
        self.centroid.push(self.centroid[s]);
        self.area.push(self.area[s]);
        self.perimeter.push(self.perimeter[s]);
        self.vol.push(self.vol[s]);
        self.height.push(self.height[s]);
        self.rho.push(self.rho[s]);
        self.num_sides.push(self.num_sides[s]);
        self.is_alive.push(self.is_alive[s]);
        self.contractility.push(self.contractility[s]);
        self.vol_elasticity.push(self.vol_elasticity[s]);
        self.prefered_height.push(self.prefered_height[s]);
        self.prefered_area.push(self.prefered_area[s]);
        self.prefered_vol.push(self.prefered_vol[s]);
        self.extra.push_copy(s);
        id
    }

    /// 标量列（内置 f64 列或附加列）
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        match name {
            "area" => Some(&self.area),
            "perimeter" => Some(&self.perimeter),
            "vol" => Some(&self.vol),
            "height" => Some(&self.height),
            "rho" => Some(&self.rho),
            "contractility" => Some(&self.contractility),
            "vol_elasticity" => Some(&self.vol_elasticity),
            "prefered_height" => Some(&self.prefered_height),
            "prefered_area" => Some(&self.prefered_area),
            "prefered_vol" => Some(&self.prefered_vol),
            _ => self.extra.get(name),
        }
    }

    /// 标量列（可变）
    pub fn column_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        match name {
            "area" => Some(&mut self.area),
            "perimeter" => Some(&mut self.perimeter),
            "vol" => Some(&mut self.vol),
            "height" => Some(&mut self.height),
            "rho" => Some(&mut self.rho),
            "contractility" => Some(&mut self.contractility),
            "vol_elasticity" => Some(&mut self.vol_elasticity),
            "prefered_height" => Some(&mut self.prefered_height),
            "prefered_area" => Some(&mut self.prefered_area),
            "prefered_vol" => Some(&mut self.prefered_vol),
            _ => self.extra.get_mut(name),
        }
    }

    /// 按列名读取单个值
    pub fn get(&self, name: &str, id: FaceId) -> TsResult<f64> {
        let i = self.check(id)?;
        match name {
            "x" => Ok(self.centroid[i].x),
            "y" => Ok(self.centroid[i].y),
            "z" => Ok(self.centroid[i].z),
            "num_sides" => Ok(self.num_sides[i] as f64),
            "is_alive" => Ok(bool_to_f64(self.is_alive[i])),
            _ => self
                .column(name)
                .map(|c| c[i])
                .ok_or_else(|| TsError::unknown_column("face", name)),
        }
    }

    /// 按列名写入单个值
    pub fn set(&mut self, name: &str, id: FaceId, value: f64) -> TsResult<()> {
        let i = self.check(id)?;
        if name == "is_alive" {
            self.is_alive[i] = value != 0.0;
            return Ok(());
        }
        let col = self
            .column_mut(name)
            .ok_or_else(|| TsError::unknown_column("face", name))?;
        col[i] = value;
        Ok(())
    }

    fn check(&self, id: FaceId) -> TsResult<usize> {
        let i = id.as_usize();
        if id.is_invalid() || i >= self.len() {
            return Err(TsError::index_out_of_bounds("face", i, self.len()));
        }
        Ok(i)
    }
}
