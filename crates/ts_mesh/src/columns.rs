//! 用户附加属性列
//!
//! 为顶点/半边/面表提供按名称访问的附加标量列。
//! 每列长度始终与所属表的行数一致：追加行时按默认值或源行补齐。
//!
//! # 示例
//! ```
//! use ts_mesh::columns::ScalarColumns;
//!
//! let mut cols = ScalarColumns::new(3);
//! cols.add_column("stiffness", 1.0).unwrap();
//! cols.push_default();
//! assert_eq!(cols.get("stiffness").unwrap().len(), 4);
//! ```

use std::collections::BTreeMap;

use ts_foundation::{TsError, TsResult};

/// 按名称索引的附加标量列
#[derive(Debug, Clone, Default)]
pub struct ScalarColumns {
    /// 行数
    len: usize,
    /// 列名 -> (默认值, 数据)
    columns: BTreeMap<String, (f64, Vec<f64>)>,
}

impl ScalarColumns {
    /// 创建空列集合
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否无行
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 添加新列（全部填充默认值）
    ///
    /// # 错误
    /// 列名已存在时返回错误
    pub fn add_column(&mut self, name: &str, default: f64) -> TsResult<()> {
        if self.columns.contains_key(name) {
            return Err(TsError::invalid_input(format!("属性列 {name} 已存在")));
        }
        self.columns
            .insert(name.to_string(), (default, vec![default; self.len]));
        Ok(())
    }

    /// 用给定数据设置列
    ///
    /// # 错误
    /// 数据长度与行数不一致时返回维度不匹配错误
    pub fn set_column(&mut self, name: &str, values: Vec<f64>) -> TsResult<()> {
        if values.len() != self.len {
            return Err(TsError::size_mismatch("scalar_column", self.len, values.len()));
        }
        let default = self.columns.get(name).map_or(0.0, |(d, _)| *d);
        self.columns.insert(name.to_string(), (default, values));
        Ok(())
    }

    /// 获取列（不可变）
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|(_, v)| v.as_slice())
    }

    /// 获取列（可变）
    pub fn get_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        self.columns.get_mut(name).map(|(_, v)| v.as_mut_slice())
    }

    /// 列是否存在
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// 删除列
    pub fn remove(&mut self, name: &str) -> Option<Vec<f64>> {
        self.columns.remove(name).map(|(_, v)| v)
    }

    /// 列名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// 追加一行默认值
    pub fn push_default(&mut self) {
        for (default, values) in self.columns.values_mut() {
            values.push(*default);
        }
        self.len += 1;
    }

    /// 追加一行，复制 `src` 行的值
    pub fn push_copy(&mut self, src: usize) {
        for (_, values) in self.columns.values_mut() {
            let value = values[src];
            values.push(value);
        }
        self.len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_set() {
        let mut cols = ScalarColumns::new(2);
        cols.add_column("k", 0.5).unwrap();
        assert_eq!(cols.get("k"), Some(&[0.5, 0.5][..]));
        assert!(cols.add_column("k", 1.0).is_err());

        assert!(cols.set_column("k", vec![1.0]).is_err());
        cols.set_column("k", vec![1.0, 2.0]).unwrap();
        assert_eq!(cols.get("k"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_push_rows() {
        let mut cols = ScalarColumns::new(1);
        cols.add_column("a", 3.0).unwrap();
        cols.get_mut("a").unwrap()[0] = 7.0;
        cols.push_copy(0);
        cols.push_default();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols.get("a"), Some(&[7.0, 7.0, 3.0][..]));
    }

    #[test]
    fn test_remove_and_names() {
        let mut cols = ScalarColumns::new(0);
        cols.add_column("b", 0.0).unwrap();
        cols.add_column("a", 0.0).unwrap();
        assert_eq!(cols.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(cols.remove("a").is_some());
        assert!(!cols.contains("a"));
    }
}
