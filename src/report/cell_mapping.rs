// ==========================================
// 燃烧测试报告系统 - 模板单元格映射
// ==========================================
// 有序的 (字段选择器, 单元格坐标) 表，生成器构造时校验
// ==========================================

use crate::domain::cell_ref::parse_a1;
use crate::domain::CanonicalRecord;
use crate::report::dimension::Dimensions;
use crate::report::error::{ReportError, ReportResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 测试日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// logo 锚点
pub const LOGO_ANCHOR: &str = "A1";

// ==========================================
// ReportField - 报告字段选择器
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    OrderNo,
    Customer,
    Fragrance,
    Color,
    Wick,
    ProductCode,
    Diameter,
    Height,
    TestDate,
}

/// 写入单元格的值
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// 单条记录的取值上下文
pub struct FieldSource<'a> {
    pub order_no: &'a str,
    pub record: &'a CanonicalRecord,
    pub dimensions: Option<Dimensions>,
    pub test_date: NaiveDate,
}

impl ReportField {
    /// 取值；空文本或尺寸解析失败返回 None（跳过写入）
    pub fn value(self, src: &FieldSource<'_>) -> Option<CellValue> {
        let text = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| CellValue::Text(s.to_string()))
        };

        match self {
            ReportField::OrderNo => text(src.order_no),
            ReportField::Customer => text(&src.record.customer),
            ReportField::Fragrance => text(&src.record.fragrance),
            ReportField::Color => text(&src.record.color),
            ReportField::Wick => text(&src.record.wick),
            ReportField::ProductCode => text(&src.record.product_code),
            ReportField::Diameter => src.dimensions.map(|d| CellValue::Number(d.diameter_mm)),
            ReportField::Height => src.dimensions.map(|d| CellValue::Number(d.height_mm)),
            ReportField::TestDate => Some(CellValue::Text(
                src.test_date.format(DATE_FORMAT).to_string(),
            )),
        }
    }
}

/// 默认模板单元格布局
pub const DEFAULT_CELL_MAPPING: [(ReportField, &str); 9] = [
    (ReportField::OrderNo, "C5"),
    (ReportField::Customer, "C6"),
    (ReportField::Fragrance, "C7"),
    (ReportField::Color, "C8"),
    (ReportField::Wick, "C9"),
    (ReportField::ProductCode, "N5"),
    (ReportField::Diameter, "N6"),
    (ReportField::Height, "S6"),
    (ReportField::TestDate, "N8"),
];

// ==========================================
// CellMapping - 已校验的映射表
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct CellMapping {
    entries: Vec<(ReportField, String)>,
}

impl CellMapping {
    /// 构造并校验坐标
    pub fn new<'a, I>(entries: I) -> ReportResult<Self>
    where
        I: IntoIterator<Item = (ReportField, &'a str)>,
    {
        let entries = entries
            .into_iter()
            .map(|(field, cell)| {
                let cell = cell.trim().to_ascii_uppercase();
                parse_a1(&cell)
                    .map(|_| (field, cell.clone()))
                    .ok_or(ReportError::InvalidCell(cell))
            })
            .collect::<ReportResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(ReportField, String)] {
        &self.entries
    }

    pub fn cell_for(&self, field: ReportField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, c)| c.as_str())
    }
}

impl Default for CellMapping {
    fn default() -> Self {
        Self {
            entries: DEFAULT_CELL_MAPPING
                .iter()
                .map(|(f, c)| (*f, c.to_string()))
                .collect(),
        }
    }
}
