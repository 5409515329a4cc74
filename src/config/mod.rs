// ==========================================
// 燃烧测试报告系统 - 配置层
// ==========================================
// 职责: 运行配置（模板/logo/导出目录、导入布局）的加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置
pub use app_config::{
    app_home_dir, default_db_path, ImportConfig, PositionalLayout, ReportConfig,
};
pub use config_manager::{config_keys, ConfigManager};
