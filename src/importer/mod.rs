// ==========================================
// 燃烧测试报告系统 - 导入层
// ==========================================
// 职责: 外部表格 → 标准记录 → 记录存储
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod column_reconciler;
pub mod conflict_handler;
pub mod error;
pub mod file_parser;
pub mod import_pipeline;
pub mod importer_trait;
pub mod record_validator;

// 重导出核心类型
pub use column_reconciler::{ColumnReconciler, ReconciledRow, Reconciliation, FIELD_ALIASES};
pub use conflict_handler::ConflictHandler;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_pipeline::ImportPipeline;
pub use record_validator::RecordValidator;

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RawRow, RawTable, RecordImporter};
