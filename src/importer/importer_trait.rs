// ==========================================
// 燃烧测试报告系统 - 导入 Trait 与原始表结构
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::ImportOutcome;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// RawRow / RawTable - 解析后的原始表
// ==========================================
// 不区分表头与数据: 首行是否为表头由 ColumnReconciler 判断
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 源文件中的 1 基行号（用于拒收报告）
    pub row_number: usize,
    /// 已 TRIM 的单元格文本，按列顺序
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<String>) -> Self {
        Self { row_number, cells }
    }

    /// 取列值；越界返回 None
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// 由行集合构造（行号按 1 基顺序编号，空白行被丢弃但保留编号）
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| {
                let cells = cells
                    .into_iter()
                    .map(|c| {
                        let value: String = c.into();
                        value.trim().to_string()
                    })
                    .collect();
                RawRow::new(idx + 1, cells)
            })
            .filter(|row| !row.is_blank())
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 最大列宽
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 返回
    /// - Ok(RawTable): 非空白行（单元格已 TRIM）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RecordImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: ImportPipeline
pub trait RecordImporter: Send + Sync {
    /// 从文件导入
    ///
    /// # 返回
    /// 始终返回结构化结果；文件错误、形状错误、存储错误均体现为 success=false
    fn import_file(&self, file_path: &Path) -> ImportOutcome;

    /// 从已解析的原始表导入
    fn import_table(&self, table: RawTable) -> ImportOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_drops_blank_rows_and_keeps_numbers() {
        let table = RawTable::from_rows(vec![
            vec![" a ", "b"],
            vec!["", "  "],
            vec!["c", ""],
        ]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells, vec!["a", "b"]);
        assert_eq!(table.rows[1].row_number, 3);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[1].cell(5), None);
    }
}
