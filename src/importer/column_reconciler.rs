// ==========================================
// 燃烧测试报告系统 - 列对齐器
// ==========================================
// 阶段 1: 将输入表的列映射到标准字段
// 模式:
// - 表头模式: 静态别名表（区分大小写精确匹配），每次导入解析一次为列下标
// - 位置模式: 配置的列字母按标准字段顺序映射
// ==========================================

use crate::config::app_config::{ImportConfig, PositionalLayout};
use crate::domain::cell_ref::column_letters;
use crate::domain::{CanonicalField, CanonicalRecord, LayoutMode};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{RawRow, RawTable};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

// ==========================================
// 别名表: 标准字段 → 可接受的源列名（按优先级）
// ==========================================
pub const FIELD_ALIASES: [(CanonicalField, &[&str]); 7] = [
    (CanonicalField::Customer, &["KHÁCH HÀNG", "CUSTOMER", "TEN_KHACH_HANG"]),
    (CanonicalField::OrderNo, &["ĐƠN HÀNG", "ORDER", "MA_DON_HANG"]),
    (CanonicalField::ProductCode, &["MÃ HÀNG", "PRODUCT_CODE", "MA_HANG"]),
    (CanonicalField::SizeSpec, &["KÍCH THƯỚC", "SIZE", "KICH_THUOC"]),
    (CanonicalField::Wick, &["BẤC", "WICK", "Bac"]),
    (CanonicalField::Color, &["MÀU", "COLOR", "MAU"]),
    (CanonicalField::Fragrance, &["HƯƠNG LIỆU", "FRAGRANCE", "HUONG_LIEU"]),
];

/// 某标准字段的别名列表
pub fn aliases_for(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// 标准字段 → 源列下标（按标准顺序）
type ColumnIndex = [Option<usize>; 7];

// ==========================================
// 对齐结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    /// 源文件 1 基行号
    pub row_number: usize,
    pub record: CanonicalRecord,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// 实际使用的模式（HEADERED 或 POSITIONAL）
    pub mode: LayoutMode,
    pub rows: Vec<ReconciledRow>,
    pub warnings: Vec<String>,
}

// ==========================================
// ColumnReconciler
// ==========================================
pub struct ColumnReconciler {
    layout: LayoutMode,
    positional: PositionalLayout,
}

impl ColumnReconciler {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            layout: config.layout,
            positional: config.positional.clone(),
        }
    }

    /// 判断输入形状
    ///
    /// AUTO: 首行任一单元格命中任一必填字段别名 → 表头模式
    pub fn detect_mode(&self, table: &RawTable) -> LayoutMode {
        match self.layout {
            LayoutMode::Headered | LayoutMode::Positional => self.layout,
            LayoutMode::Auto => {
                let looks_like_header = table.rows.first().is_some_and(|first| {
                    first.cells.iter().any(|cell| {
                        CanonicalField::REQUIRED
                            .iter()
                            .any(|f| aliases_for(*f).contains(&cell.as_str()))
                    })
                });
                if looks_like_header {
                    LayoutMode::Headered
                } else {
                    LayoutMode::Positional
                }
            }
        }
    }

    /// 对齐（以调用时刻为所有行的创建时间）
    pub fn reconcile(&self, table: &RawTable) -> ImportResult<Reconciliation> {
        self.reconcile_at(table, Utc::now())
    }

    /// 对齐（指定创建时间）
    ///
    /// # 返回
    /// - Err(EmptyInput): 输入无任何非空行
    /// - Err(MissingColumns): 必填字段无法定位到源列
    pub fn reconcile_at(
        &self,
        table: &RawTable,
        created_at: DateTime<Utc>,
    ) -> ImportResult<Reconciliation> {
        if table.is_empty() {
            return Err(ImportError::EmptyInput);
        }

        let mode = self.detect_mode(table);
        let mut warnings = Vec::new();

        let (index, data_rows): (ColumnIndex, &[RawRow]) = match mode {
            LayoutMode::Positional => (self.positional_index(table, &mut warnings)?, table.rows.as_slice()),
            _ => (Self::header_index(&table.rows[0], &mut warnings)?, &table.rows[1..]),
        };

        let rows = data_rows
            .iter()
            .map(|row| ReconciledRow {
                row_number: row.row_number,
                record: Self::project(row, &index, created_at),
            })
            .collect::<Vec<_>>();

        debug!(mode = %mode, rows = rows.len(), warnings = warnings.len(), "列对齐完成");
        Ok(Reconciliation {
            mode,
            rows,
            warnings,
        })
    }

    /// 表头模式: 逐字段按别名顺序取首个命中的列
    fn header_index(header: &RawRow, warnings: &mut Vec<String>) -> ImportResult<ColumnIndex> {
        let mut index: ColumnIndex = [None; 7];
        let mut missing = Vec::new();

        for field in CanonicalField::ALL {
            let found = aliases_for(field)
                .iter()
                .find_map(|alias| header.cells.iter().position(|cell| cell == alias));

            match found {
                Some(col) => index[field.position()] = Some(col),
                None if field.is_required() => missing.push(field.header().to_string()),
                None => {
                    let message = format!("column {} not found, values left empty", field.header());
                    warn!(field = %field, "表头中无对应列，字段取空");
                    warnings.push(message);
                }
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "表头缺少必填列");
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(index)
    }

    /// 位置模式: 配置的列字母 → 下标；超出输入宽度的列告警并取空
    fn positional_index(
        &self,
        table: &RawTable,
        warnings: &mut Vec<String>,
    ) -> ImportResult<ColumnIndex> {
        let width = table.width();
        let mut index: ColumnIndex = [None; 7];
        let mut missing = Vec::new();

        for field in CanonicalField::ALL {
            match self.positional.index_for(field) {
                Some(col) => {
                    if col >= width {
                        let message = format!(
                            "column {} ({}) is beyond the input width of {} columns, values left empty",
                            column_letters(col),
                            field.header(),
                            width
                        );
                        warn!(
                            field = %field,
                            column = %column_letters(col),
                            width = width,
                            "位置列超出输入宽度"
                        );
                        warnings.push(message);
                    }
                    index[field.position()] = Some(col);
                }
                None if field.is_required() => missing.push(field.header().to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "位置布局未配置必填列");
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(index)
    }

    fn project(row: &RawRow, index: &ColumnIndex, created_at: DateTime<Utc>) -> CanonicalRecord {
        let values = index.map(|col| {
            col.and_then(|c| row.cell(c))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        });
        CanonicalRecord::from_values(values, created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconciler(layout: LayoutMode) -> ColumnReconciler {
        ColumnReconciler::new(&ImportConfig {
            layout,
            positional: PositionalLayout::default(),
        })
    }

    #[test]
    fn test_header_mode_with_aliases() {
        let table = RawTable::from_rows(vec![
            vec!["CUSTOMER", "MA_DON_HANG", "MÃ HÀNG", "SIZE", "Note"],
            vec!["ACME", "O100", "P1", "30x50mm", "ignored"],
        ]);
        let result = reconciler(LayoutMode::Auto).reconcile(&table).unwrap();

        assert_eq!(result.mode, LayoutMode::Headered);
        assert_eq!(result.rows.len(), 1);
        let record = &result.rows[0].record;
        assert_eq!(record.customer, "ACME");
        assert_eq!(record.order_no, "O100");
        assert_eq!(record.product_code, "P1");
        assert_eq!(record.size_spec, "30x50mm");
        assert_eq!(record.wick, "");
        assert_eq!(result.rows[0].row_number, 2);
        // BẤC / MÀU / HƯƠNG LIỆU 缺列
        assert_eq!(result.warnings.len(), 3);
    }

    #[test]
    fn test_first_alias_wins() {
        let table = RawTable::from_rows(vec![
            vec!["CUSTOMER", "KHÁCH HÀNG", "ĐƠN HÀNG", "MÃ HÀNG"],
            vec!["second", "first", "O1", "P1"],
        ]);
        let result = reconciler(LayoutMode::Headered).reconcile(&table).unwrap();
        assert_eq!(result.rows[0].record.customer, "first");
    }

    #[test]
    fn test_alias_match_is_case_sensitive() {
        let table = RawTable::from_rows(vec![
            vec!["customer", "ĐƠN HÀNG", "MÃ HÀNG"],
            vec!["ACME", "O1", "P1"],
        ]);
        let err = reconciler(LayoutMode::Headered).reconcile(&table).unwrap_err();
        match err {
            ImportError::MissingColumns(cols) => assert_eq!(cols, vec!["KHÁCH HÀNG"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_auto_detects_positional_layout() {
        let mut row = vec![""; 28];
        row[0] = "ACME";
        row[1] = "O100";
        row[6] = "P1";
        row[12] = "3x5cm";
        row[24] = "W2";
        row[27] = "Đỏ";
        let table = RawTable::from_rows(vec![row]);

        let result = reconciler(LayoutMode::Auto).reconcile(&table).unwrap();
        assert_eq!(result.mode, LayoutMode::Positional);
        assert!(result.warnings.is_empty());
        let record = &result.rows[0].record;
        assert_eq!(record.product_code, "P1");
        assert_eq!(record.size_spec, "3x5cm");
        assert_eq!(record.wick, "W2");
        assert_eq!(record.color, "Đỏ");
        assert_eq!(record.fragrance, "");
    }

    #[test]
    fn test_positional_column_beyond_width_warns() {
        let table = RawTable::from_rows(vec![vec!["ACME", "O1", "", "", "", "", "P1"]]);
        let result = reconciler(LayoutMode::Positional).reconcile(&table).unwrap();

        assert_eq!(result.rows[0].record.product_code, "P1");
        assert_eq!(result.rows[0].record.size_spec, "");
        // M / Y / AB 均超出 7 列宽度
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("column M"));
    }

    #[test]
    fn test_all_rows_share_one_timestamp() {
        let table = RawTable::from_rows(vec![
            vec!["KHÁCH HÀNG", "ĐƠN HÀNG", "MÃ HÀNG"],
            vec!["A", "O1", "P1"],
            vec!["B", "O1", "P2"],
        ]);
        let stamp = Utc::now();
        let result = reconciler(LayoutMode::Auto).reconcile_at(&table, stamp).unwrap();
        assert!(result.rows.iter().all(|r| r.record.created_at == stamp));
    }

    #[test]
    fn test_empty_table_is_error() {
        let result = reconciler(LayoutMode::Auto).reconcile(&RawTable::default());
        assert!(matches!(result, Err(ImportError::EmptyInput)));
    }
}
