// ==========================================
// 燃烧测试报告系统 - 报告层
// ==========================================
// 职责: 按订单基于模板生成多 sheet 报告，并管理导出目录
// ==========================================

pub mod archive;
pub mod assets;
pub mod cell_mapping;
pub mod dimension;
pub mod error;
pub mod generator;
pub mod service;
pub mod sheet_naming;
pub mod workbook;

// 重导出核心类型
pub use archive::ReportArchive;
pub use cell_mapping::{CellMapping, CellValue, ReportField, DEFAULT_CELL_MAPPING, LOGO_ANCHOR};
pub use dimension::{DimensionParser, Dimensions};
pub use error::{ReportError, ReportResult};
pub use generator::ReportGenerator;
pub use service::ReportService;
pub use sheet_naming::{sanitize_sheet_name, SheetNamer, MAX_SHEET_NAME_LEN};
pub use workbook::{ReportWorkbook, UmyaBackend, UmyaWorkbook, WorkbookBackend};
