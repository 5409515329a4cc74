// ==========================================
// 燃烧测试报告系统 - API 层
// ==========================================
// 职责: 以 async 形式对外提供导入与报告接口
// 阻塞的核心逻辑统一放到 spawn_blocking 中
// ==========================================

pub mod error;
pub mod import_api;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, OrderDetailResponse};
pub use report_api::ReportApi;
