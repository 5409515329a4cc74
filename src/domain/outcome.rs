// ==========================================
// 燃烧测试报告系统 - 操作结果模型
// ==========================================
// 原则: 核心公开操作一律返回结构化结果（成功标志 + 消息 + 计数），
//       不让协作方故障以未处理错误的形式逃逸
// ==========================================

use crate::domain::types::{CanonicalField, ItemStatus, LayoutMode};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ==========================================
// 导入结果
// ==========================================

/// 被拒收的行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRejection {
    /// 源表格中的行号（1 基）
    pub row_number: usize,
    /// 为空的必填字段
    pub missing: Vec<CanonicalField>,
}

/// 导入结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    pub batch_id: String,
    /// 实际使用的布局（失败于识别之前时为 None）
    pub layout: Option<LayoutMode>,
    /// 输入数据行数（不含表头、不含空白行）
    pub total_rows: usize,
    /// 写入（新增或覆盖）的记录数
    pub imported: usize,
    pub rejected: Vec<RowRejection>,
    /// 同批次内被后出现行覆盖的重复键数量
    pub duplicates_merged: usize,
    pub warnings: Vec<String>,
    /// 导入后存储中的记录总数
    pub total_after: usize,
    pub elapsed_ms: u64,
}

impl ImportOutcome {
    pub fn failure(batch_id: String, message: String) -> Self {
        Self {
            success: false,
            message,
            batch_id,
            layout: None,
            total_rows: 0,
            imported: 0,
            rejected: Vec::new(),
            duplicates_merged: 0,
            warnings: Vec::new(),
            total_after: 0,
            elapsed_ms: 0,
        }
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

// ==========================================
// 报告生成结果
// ==========================================

/// 单条记录对应的 sheet 构建结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetOutcome {
    /// 记录在请求中的下标（0 基）
    pub index: usize,
    pub product_code: String,
    #[serde(flatten)]
    pub status: ItemStatus,
    pub logo_embedded: bool,
    /// 因值为空而保留模板默认值的单元格
    pub skipped_cells: Vec<String>,
    /// 构建失败且未能移除、仍留在工作簿中的 sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leftover_sheet: Option<String>,
}

/// 报告生成结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub success: bool,
    pub message: String,
    pub order_no: String,
    /// 实际创建的 sheet 数（部分失败时小于记录数）
    pub sheets_created: usize,
    pub items: Vec<SheetOutcome>,
    /// 输出文件中不属于任何成功记录的 sheet（模板或半成品）
    #[serde(default)]
    pub leftover_sheets: Vec<String>,
    pub file_path: Option<PathBuf>,
}

impl ReportOutcome {
    pub fn failure(order_no: &str, message: String) -> Self {
        Self {
            success: false,
            message,
            order_no: order_no.to_string(),
            sheets_created: 0,
            items: Vec::new(),
            leftover_sheets: Vec::new(),
            file_path: None,
        }
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &SheetOutcome> {
        self.items
            .iter()
            .filter(|item| matches!(item.status, ItemStatus::Failed { .. }))
    }
}

/// 导出结果（报告结果 + 下载文件名）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    #[serde(flatten)]
    pub report: ReportOutcome,
    pub file_name: Option<String>,
}

// ==========================================
// 报告归档
// ==========================================

/// 已生成报告文件信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFileInfo {
    pub file_name: String,
    /// 从文件名前缀解析出的订单号
    pub order_no: String,
    pub file_size: u64,
    pub created_time: DateTime<Local>,
    pub file_path: PathBuf,
}

/// 归档/资源类操作结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
    /// 受影响的文件数
    pub affected: usize,
}

impl OperationOutcome {
    pub fn ok(message: String, affected: usize) -> Self {
        Self {
            success: true,
            message,
            affected,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            affected: 0,
        }
    }
}
