// ==========================================
// 燃烧测试报告系统 - 报告模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 报告模块错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    // ===== 模板相关错误 =====
    #[error("template file not found: {0}")]
    TemplateNotFound(String),

    #[error("template has no sheets: {0}")]
    TemplateEmpty(String),

    // ===== 工作簿操作错误 =====
    #[error("workbook open failed: {0}")]
    WorkbookOpen(String),

    #[error("workbook save failed: {0}")]
    WorkbookSave(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("sheet operation failed on '{sheet}': {message}")]
    SheetOperation { sheet: String, message: String },

    #[error("image embed failed: {0}")]
    ImageEmbed(String),

    // ===== 配置错误 =====
    #[error("invalid cell coordinate '{0}'")]
    InvalidCell(String),

    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("unsupported asset type: {0}")]
    UnsupportedAsset(String),

    // ===== 底层错误 =====
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persistence failed: {0}")]
    Repository(#[from] RepositoryError),
}

// 实现 From<umya_spreadsheet::XlsxError>
impl From<umya_spreadsheet::XlsxError> for ReportError {
    fn from(err: umya_spreadsheet::XlsxError) -> Self {
        ReportError::WorkbookOpen(err.to_string())
    }
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
