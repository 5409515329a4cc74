// ==========================================
// 燃烧测试报告系统 - 领域模型层
// ==========================================
// 职责: 定义测试记录、字段、结果模型
// 红线: 不含数据访问逻辑,不含报告生成逻辑
// ==========================================

pub mod cell_ref;
pub mod outcome;
pub mod record;
pub mod types;

// 重导出核心类型
pub use outcome::{
    ExportOutcome, ImportOutcome, OperationOutcome, ReportFileInfo, ReportOutcome, RowRejection,
    SheetOutcome,
};
pub use record::{CanonicalRecord, OrderSummary, RecordKey};
pub use types::{CanonicalField, ItemStatus, LayoutMode};
