// ==========================================
// 燃烧测试报告系统 - 导入管道
// ==========================================
// 职责: 整合导入流程，从文件到存储
// 流程: 解析 → 列对齐 → 必填校验 → 同批次去重 → 批量 upsert
// ==========================================

use crate::config::app_config::ImportConfig;
use crate::domain::ImportOutcome;
use crate::i18n::t_with_args;
use crate::importer::column_reconciler::ColumnReconciler;
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::error::ImportError;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{RawTable, RecordImporter};
use crate::importer::record_validator::RecordValidator;
use crate::repository::RecordStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

/// 导入错误 → 用户消息
fn failure_message(err: &ImportError) -> String {
    match err {
        ImportError::FileNotFound(path) => t_with_args("import.file_not_found", &[("path", path)]),
        ImportError::UnsupportedFormat(ext) => {
            t_with_args("import.unsupported_format", &[("ext", ext)])
        }
        ImportError::EmptyInput => t_with_args("import.empty_input", &[]),
        ImportError::MissingColumns(cols) => {
            t_with_args("import.missing_columns", &[("columns", &cols.join(", "))])
        }
        ImportError::Repository(e) => {
            t_with_args("import.persist_failed", &[("error", &e.to_string())])
        }
        other => t_with_args("import.read_failed", &[("error", &other.to_string())]),
    }
}

// ==========================================
// ImportPipeline - 导入管道
// ==========================================
pub struct ImportPipeline<S>
where
    S: RecordStore,
{
    store: Arc<S>,
    file_parser: UniversalFileParser,
    reconciler: ColumnReconciler,
    validator: RecordValidator,
    conflict_handler: ConflictHandler,
}

impl<S> ImportPipeline<S>
where
    S: RecordStore,
{
    /// 创建导入管道
    ///
    /// # 参数
    /// - store: 记录存储
    /// - config: 导入配置（布局模式、位置列）
    pub fn new(store: Arc<S>, config: &ImportConfig) -> Self {
        Self {
            store,
            file_parser: UniversalFileParser,
            reconciler: ColumnReconciler::new(config),
            validator: RecordValidator,
            conflict_handler: ConflictHandler,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn run_table(&self, batch_id: String, table: RawTable, started: Instant) -> ImportOutcome {
        // === 步骤 2: 列对齐 ===
        debug!("步骤 2: 列对齐");
        let reconciliation = match self.reconciler.reconcile(&table) {
            Ok(r) => r,
            Err(e) => {
                warn!(batch_id = %batch_id, error = %e, "列对齐失败，整批拒绝");
                return self.finish_failure(batch_id, failure_message(&e), started);
            }
        };

        let layout = reconciliation.mode;
        let warnings = reconciliation.warnings;
        let total_rows = reconciliation.rows.len();
        info!(layout = %layout, total_rows = total_rows, warnings = warnings.len(), "列对齐完成");

        if total_rows == 0 {
            let mut outcome = self.finish_failure(
                batch_id,
                failure_message(&ImportError::EmptyInput),
                started,
            );
            outcome.layout = Some(layout);
            outcome.warnings = warnings;
            return outcome;
        }

        // === 步骤 3: 必填校验 ===
        debug!("步骤 3: 必填校验");
        let (accepted, rejected) = self.validator.partition(reconciliation.rows);
        info!(accepted = accepted.len(), rejected = rejected.len(), "必填校验完成");

        if accepted.is_empty() {
            warn!(batch_id = %batch_id, rejected = rejected.len(), "全部行被拒收");
            let message = t_with_args(
                "import.all_rejected",
                &[("rejected", &rejected.len().to_string())],
            );
            let mut outcome = self.finish_failure(batch_id, message, started);
            outcome.layout = Some(layout);
            outcome.total_rows = total_rows;
            outcome.rejected = rejected;
            outcome.warnings = warnings;
            return outcome;
        }

        // === 步骤 4: 同批次去重 ===
        debug!("步骤 4: 同批次去重");
        for (row, key) in self.conflict_handler.detect_duplicates(&accepted) {
            debug!(row = row, key = %key, "同批次重复键，被后续行覆盖");
        }
        let (records, duplicates_merged) = self.conflict_handler.collapse_keep_last(accepted);
        let imported = records.len() + duplicates_merged;

        // === 步骤 5: 批量 upsert ===
        debug!("步骤 5: 批量 upsert");
        let total_after = match self.store.upsert_batch(&records) {
            Ok(total) => total,
            Err(e) => {
                error!(batch_id = %batch_id, error = %e, "批量写入失败，事务已回滚");
                let err = ImportError::Repository(e);
                let mut outcome = self.finish_failure(batch_id, failure_message(&err), started);
                outcome.layout = Some(layout);
                outcome.total_rows = total_rows;
                outcome.rejected = rejected;
                outcome.warnings = warnings;
                return outcome;
            }
        };

        let message = if rejected.is_empty() && duplicates_merged == 0 {
            t_with_args("import.success", &[("count", &imported.to_string())])
        } else {
            t_with_args(
                "import.success_detail",
                &[
                    ("count", &imported.to_string()),
                    ("rejected", &rejected.len().to_string()),
                    ("merged", &duplicates_merged.to_string()),
                    ("total", &total_after.to_string()),
                ],
            )
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            imported = imported,
            rejected = rejected.len(),
            duplicates_merged = duplicates_merged,
            total_after = total_after,
            elapsed_ms = elapsed_ms,
            "导入完成"
        );

        ImportOutcome {
            success: true,
            message,
            batch_id,
            layout: Some(layout),
            total_rows,
            imported,
            rejected,
            duplicates_merged,
            warnings,
            total_after,
            elapsed_ms,
        }
    }

    /// 失败结果（total_after 尽力读取存储当前总数）
    fn finish_failure(&self, batch_id: String, message: String, started: Instant) -> ImportOutcome {
        let mut outcome = ImportOutcome::failure(batch_id, message);
        outcome.total_after = self.store.total_count().unwrap_or_else(|e| {
            warn!(error = %e, "读取记录总数失败");
            0
        });
        outcome.elapsed_ms = started.elapsed().as_millis() as u64;
        outcome
    }
}

impl<S> RecordImporter for ImportPipeline<S>
where
    S: RecordStore,
{
    #[instrument(skip(self, file_path), fields(batch_id))]
    fn import_file(&self, file_path: &Path) -> ImportOutcome {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, file_path = %file_path.display(), "开始导入");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let table = match self.file_parser.parse(file_path) {
            Ok(table) => table,
            Err(e) => {
                error!(batch_id = %batch_id, error = %e, "文件解析失败");
                return self.finish_failure(batch_id, failure_message(&e), started);
            }
        };
        info!(rows = table.rows.len(), "文件解析完成");

        self.run_table(batch_id, table, started)
    }

    #[instrument(skip(self, table), fields(batch_id))]
    fn import_table(&self, table: RawTable) -> ImportOutcome {
        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, rows = table.rows.len(), "开始导入（已解析表）");

        self.run_table(batch_id, table, started)
    }
}
