// crates/ts_mesh/src/generation.rs

//! 网格生成模块
//!
//! 测试与驱动程序使用的蜂窝状上皮层：
//!
//! - [`single_hexagon`]: 单个正六边形细胞
//! - [`HexaGridGenerator`]: `nx × ny` 的尖顶六边形蜂窝网格（奇数行右移半格）
//!
//! 所有面按逆时针顺序生成，相邻细胞的公共边自然方向相反。
//!
//! ```rust
//! use ts_mesh::generation::HexaGridGenerator;
//! use ts_mesh::SheetSettings;
//!
//! let sheet = HexaGridGenerator::new(2, 2, 1.0)
//!     .build(SheetSettings::default())
//!     .unwrap();
//! assert_eq!(sheet.nf(), 4);
//! ```

use glam::DVec3;
use std::collections::HashMap;

use crate::error::MeshResult;
use crate::settings::SheetSettings;
use crate::sheet::Sheet;

/// 顶点去重的量化步长
const MERGE_SCALE: f64 = 1e6;

/// 单个正六边形细胞
///
/// 外接圆半径 `radius`，中心位于 `(0, 0, z)`。
pub fn single_hexagon(radius: f64, z: f64, settings: SheetSettings) -> MeshResult<Sheet> {
    HexaGridGenerator::new(1, 1, radius)
        .with_offset(z)
        .build(settings)
}

/// 蜂窝网格生成器
#[derive(Debug, Clone)]
pub struct HexaGridGenerator {
    /// 每行细胞数
    nx: usize,
    /// 行数
    ny: usize,
    /// 外接圆半径
    radius: f64,
    /// 沿 z 的整体偏移
    z: f64,
}

impl HexaGridGenerator {
    /// 创建生成器
    pub fn new(nx: usize, ny: usize, radius: f64) -> Self {
        Self {
            nx,
            ny,
            radius,
            z: 0.0,
        }
    }

    /// 设置 z 偏移（平面模式下即为细胞高度）
    pub fn with_offset(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// 细胞中心
    pub fn center(&self, i: usize, j: usize) -> DVec3 {
        let w = 3f64.sqrt() * self.radius;
        let shift = if j % 2 == 1 { 0.5 * w } else { 0.0 };
        DVec3::new(i as f64 * w + shift, 1.5 * self.radius * j as f64, self.z)
    }

    /// 构建网格
    pub fn build(&self, settings: SheetSettings) -> MeshResult<Sheet> {
        let mut positions: Vec<DVec3> = Vec::new();
        let mut lookup: HashMap<(i64, i64), usize> = HashMap::new();
        let mut polygons = Vec::with_capacity(self.nx * self.ny);

        for j in 0..self.ny {
            for i in 0..self.nx {
                let c = self.center(i, j);
                let ring = (0..6)
                    .map(|k| {
                        let theta = (30.0 + 60.0 * k as f64).to_radians();
                        let p = c + self.radius * DVec3::new(theta.cos(), theta.sin(), 0.0);
                        let key = (
                            (p.x * MERGE_SCALE).round() as i64,
                            (p.y * MERGE_SCALE).round() as i64,
                        );
                        *lookup.entry(key).or_insert_with(|| {
                            positions.push(p);
                            positions.len() - 1
                        })
                    })
                    .collect::<Vec<_>>();
                polygons.push(ring);
            }
        }

        log::debug!(
            "生成蜂窝网格 {}x{}: {} 个顶点",
            self.nx,
            self.ny,
            positions.len()
        );
        Sheet::from_polygons(
            format!("hexa_{}x{}", self.nx, self.ny),
            &positions,
            &polygons,
            settings,
        )
    }
}
