// ==========================================
// 燃烧测试报告系统 - 应用层
// ==========================================
// 职责: 组装数据库、配置与API实例
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, DefaultImportApi, DefaultReportApi};
