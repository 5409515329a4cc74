// ==========================================
// 记录导入API
// ==========================================
// 职责: 以 async 形式封装导入管道与订单查询
// 阻塞的解析/落库在 spawn_blocking 中执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{CanonicalRecord, ImportOutcome, OrderSummary};
use crate::importer::{ImportPipeline, RawTable, RecordImporter};
use crate::repository::RecordStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

/// 订单明细响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub order_no: String,
    pub total_items: usize,
    pub data: Vec<CanonicalRecord>,
}

/// 导入API
pub struct ImportApi<S>
where
    S: RecordStore + 'static,
{
    pipeline: Arc<ImportPipeline<S>>,
}

impl<S> Clone for ImportApi<S>
where
    S: RecordStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<S> ImportApi<S>
where
    S: RecordStore + 'static,
{
    /// 创建新的ImportApi实例
    pub fn new(pipeline: ImportPipeline<S>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// 导入单个文件
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 导入结果（业务失败体现在 success=false）
    /// - Err(ApiError): 后台任务异常
    pub async fn import_file(&self, file_path: PathBuf) -> ApiResult<ImportOutcome> {
        let pipeline = self.pipeline.clone();
        let outcome = task::spawn_blocking(move || pipeline.import_file(&file_path)).await?;
        Ok(outcome)
    }

    /// 导入已解析的表
    pub async fn import_table(&self, table: RawTable) -> ApiResult<ImportOutcome> {
        let pipeline = self.pipeline.clone();
        let outcome = task::spawn_blocking(move || pipeline.import_table(table)).await?;
        Ok(outcome)
    }

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 写入在存储层串行化，每个文件仍是一个原子批次
    pub async fn import_files(&self, file_paths: Vec<PathBuf>) -> Vec<ApiResult<ImportOutcome>> {
        let count = file_paths.len();
        let results = join_all(file_paths.into_iter().map(|p| self.import_file(p))).await;

        let succeeded = results
            .iter()
            .filter(|r| matches!(r, Ok(o) if o.success))
            .count();
        info!(files = count, succeeded = succeeded, "批量导入完成");
        results
    }

    /// 订单汇总（最近创建在前）
    pub async fn orders(&self) -> ApiResult<Vec<OrderSummary>> {
        let pipeline = self.pipeline.clone();
        let orders = task::spawn_blocking(move || pipeline.store().orders_summary()).await??;
        Ok(orders)
    }

    /// 订单明细
    pub async fn order_detail(&self, order_no: &str) -> ApiResult<OrderDetailResponse> {
        let order_no = order_no.trim().to_string();
        if order_no.is_empty() {
            return Err(ApiError::InvalidInput("order_no is empty".to_string()));
        }

        let pipeline = self.pipeline.clone();
        let key = order_no.clone();
        let data = task::spawn_blocking(move || pipeline.store().order_detail(&key)).await??;
        if data.is_empty() {
            warn!(order_no = %order_no, "订单无记录");
        }

        Ok(OrderDetailResponse {
            order_no,
            total_items: data.len(),
            data,
        })
    }
}
