// ==========================================
// 燃烧测试报告系统 - 核心库
// ==========================================
// 职责: 燃烧测试记录导入、按订单生成模板报告
// 技术栈: Rust + SQLite + xlsx 模板
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "vi");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与结果模型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 报告层 - 模板报告生成
pub mod report;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - async 接口
pub mod api;

// 应用层 - 组件组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CanonicalField, CanonicalRecord, ExportOutcome, ImportOutcome, ItemStatus, LayoutMode,
    OperationOutcome, OrderSummary, RecordKey, ReportFileInfo, ReportOutcome, RowRejection,
    SheetOutcome,
};

// 核心组件
pub use config::{ConfigManager, ImportConfig, ReportConfig};
pub use importer::{ColumnReconciler, ImportPipeline, RawTable, RecordImporter};
pub use report::{DimensionParser, Dimensions, ReportGenerator, ReportService};
pub use repository::{RecordStore, SqliteRecordStore};

// API
pub use api::{ImportApi, ReportApi};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Quản lý Test Đốt";
