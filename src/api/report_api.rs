// ==========================================
// 报告API
// ==========================================
// 职责: 以 async 形式封装报告导出与归档管理
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{ExportOutcome, OperationOutcome, ReportFileInfo};
use crate::report::{ReportService, WorkbookBackend};
use crate::repository::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;

/// 报告API
pub struct ReportApi<S, B>
where
    S: RecordStore + 'static,
    B: WorkbookBackend + 'static,
{
    service: Arc<ReportService<S, B>>,
}

impl<S, B> Clone for ReportApi<S, B>
where
    S: RecordStore + 'static,
    B: WorkbookBackend + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S, B> ReportApi<S, B>
where
    S: RecordStore + 'static,
    B: WorkbookBackend + 'static,
{
    pub fn new(service: ReportService<S, B>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// 导出订单报告
    pub async fn export_order(&self, order_no: &str) -> ApiResult<ExportOutcome> {
        let service = self.service.clone();
        let order_no = order_no.to_string();
        Ok(task::spawn_blocking(move || service.export_order(&order_no)).await?)
    }

    /// 已生成报告列表（最新在前）
    pub async fn list_reports(&self) -> ApiResult<Vec<ReportFileInfo>> {
        let service = self.service.clone();
        Ok(task::spawn_blocking(move || service.list_reports()).await??)
    }

    /// 报告文件路径（下载用）
    pub async fn report_path(&self, file_name: &str) -> ApiResult<Option<PathBuf>> {
        let service = self.service.clone();
        let file_name = file_name.to_string();
        Ok(task::spawn_blocking(move || service.report_path(&file_name)).await??)
    }

    pub async fn delete_report(&self, file_name: &str) -> ApiResult<OperationOutcome> {
        let service = self.service.clone();
        let file_name = file_name.to_string();
        Ok(task::spawn_blocking(move || service.delete_report(&file_name)).await?)
    }

    pub async fn clear_reports(&self) -> ApiResult<OperationOutcome> {
        let service = self.service.clone();
        Ok(task::spawn_blocking(move || service.clear_reports()).await?)
    }

    pub async fn install_template(&self, source: PathBuf) -> ApiResult<OperationOutcome> {
        let service = self.service.clone();
        Ok(task::spawn_blocking(move || service.install_template(&source)).await?)
    }

    pub async fn install_logo(&self, source: PathBuf) -> ApiResult<OperationOutcome> {
        let service = self.service.clone();
        Ok(task::spawn_blocking(move || service.install_logo(&source)).await?)
    }
}
