// ==========================================
// 燃烧测试报告系统 - 报告服务
// ==========================================
// 职责: 从存储读取订单 → 生成报告 → 归档管理
// ==========================================

use crate::domain::{ExportOutcome, OperationOutcome, ReportFileInfo, ReportOutcome};
use crate::i18n::t_with_args;
use crate::report::archive::ReportArchive;
use crate::report::assets::{install_logo, install_template};
use crate::report::error::{ReportError, ReportResult};
use crate::report::generator::ReportGenerator;
use crate::report::workbook::WorkbookBackend;
use crate::repository::RecordStore;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct ReportService<S, B>
where
    S: RecordStore,
    B: WorkbookBackend,
{
    store: Arc<S>,
    generator: ReportGenerator<B>,
    archive: ReportArchive,
}

impl<S, B> ReportService<S, B>
where
    S: RecordStore,
    B: WorkbookBackend,
{
    pub fn new(store: Arc<S>, generator: ReportGenerator<B>) -> Self {
        let archive = ReportArchive::new(generator.config().export_dir.clone());
        Self {
            store,
            generator,
            archive,
        }
    }

    pub fn archive(&self) -> &ReportArchive {
        &self.archive
    }

    /// 导出订单报告
    ///
    /// # 说明
    /// - 订单无记录 → 失败（不创建文件）
    /// - 输出文件名带时间戳与随机后缀，同一订单并发导出互不覆盖
    #[instrument(skip(self))]
    pub fn export_order(&self, order_no: &str) -> ExportOutcome {
        let order_no = order_no.trim();
        let records = match self.store.order_detail(order_no) {
            Ok(records) => records,
            Err(e) => {
                error!(order_no = %order_no, error = %e, "读取订单明细失败");
                return ExportOutcome {
                    report: ReportOutcome::failure(
                        order_no,
                        t_with_args("report.failed", &[("error", &e.to_string())]),
                    ),
                    file_name: None,
                };
            }
        };

        if records.is_empty() {
            return ExportOutcome {
                report: ReportOutcome::failure(order_no, t_with_args("report.no_records", &[])),
                file_name: None,
            };
        }

        let file_name = ReportArchive::output_file_name(order_no, Local::now());
        let dest = self.archive.export_dir().join(&file_name);
        info!(order_no = %order_no, items = records.len(), file = %file_name, "开始导出");

        let report = self.generator.generate(order_no, &records, &dest);
        let file_name = report.success.then_some(file_name);
        ExportOutcome { report, file_name }
    }

    pub fn list_reports(&self) -> ReportResult<Vec<ReportFileInfo>> {
        self.archive.list()
    }

    /// 报告文件路径（用于下载）；不存在时返回 None
    pub fn report_path(&self, file_name: &str) -> ReportResult<Option<std::path::PathBuf>> {
        let path = self.archive.resolve(file_name)?;
        Ok(path.is_file().then_some(path))
    }

    pub fn delete_report(&self, file_name: &str) -> OperationOutcome {
        match self.archive.delete(file_name) {
            Ok(true) => OperationOutcome::ok(t_with_args("archive.deleted", &[]), 1),
            Ok(false) => OperationOutcome::failure(t_with_args(
                "archive.not_found",
                &[("file", file_name)],
            )),
            Err(ReportError::InvalidFileName(name)) => {
                OperationOutcome::failure(t_with_args("archive.invalid_name", &[("file", &name)]))
            }
            Err(e) => {
                error!(file = %file_name, error = %e, "报告删除失败");
                OperationOutcome::failure(t_with_args(
                    "archive.delete_failed",
                    &[("error", &e.to_string())],
                ))
            }
        }
    }

    pub fn clear_reports(&self) -> OperationOutcome {
        match self.archive.clear() {
            Ok(count) => OperationOutcome::ok(
                t_with_args("archive.cleared", &[("count", &count.to_string())]),
                count,
            ),
            Err(e) => {
                error!(error = %e, "清空报告失败");
                OperationOutcome::failure(t_with_args(
                    "archive.delete_failed",
                    &[("error", &e.to_string())],
                ))
            }
        }
    }

    pub fn install_template(&self, source: &Path) -> OperationOutcome {
        match install_template(self.generator.config(), source) {
            Ok(()) => OperationOutcome::ok(t_with_args("assets.template_updated", &[]), 1),
            Err(e) => Self::asset_failure(e, "assets.template_invalid", source),
        }
    }

    pub fn install_logo(&self, source: &Path) -> OperationOutcome {
        match install_logo(self.generator.config(), source) {
            Ok(()) => OperationOutcome::ok(t_with_args("assets.logo_updated", &[]), 1),
            Err(e) => Self::asset_failure(e, "assets.logo_invalid", source),
        }
    }

    fn asset_failure(err: ReportError, invalid_key: &str, source: &Path) -> OperationOutcome {
        let message = match err {
            ReportError::UnsupportedAsset(_) => t_with_args(invalid_key, &[]),
            ReportError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => t_with_args(
                "assets.source_missing",
                &[("file", &source.display().to_string())],
            ),
            other => t_with_args("assets.install_failed", &[("error", &other.to_string())]),
        };
        OperationOutcome::failure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::ReportConfig;
    use crate::domain::CanonicalRecord;
    use crate::report::workbook::UmyaBackend;
    use crate::repository::SqliteRecordStore;
    use chrono::Utc;
    use std::fs;

    fn service(dir: &Path) -> ReportService<SqliteRecordStore, UmyaBackend> {
        let store = Arc::new(SqliteRecordStore::open_in_memory().unwrap());
        let generator = ReportGenerator::new(ReportConfig::with_base_dir(dir), UmyaBackend);
        ReportService::new(store, generator)
    }

    #[test]
    fn test_export_unknown_order_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let outcome = svc.export_order("NOPE");
        assert!(!outcome.report.success);
        assert!(outcome.file_name.is_none());
        assert!(svc.list_reports().unwrap().is_empty());
    }

    #[test]
    fn test_export_without_template_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let record = CanonicalRecord::from_values(
            [
                "ACME".to_string(),
                "O1".to_string(),
                "P1".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
            Utc::now(),
        );
        svc.store.upsert_batch(&[record]).unwrap();

        let outcome = svc.export_order("O1");
        assert!(!outcome.report.success);
        assert!(svc.list_reports().unwrap().is_empty());
    }

    #[test]
    fn test_delete_report_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        fs::create_dir_all(svc.archive().export_dir()).unwrap();
        fs::write(svc.archive().export_dir().join("O1_BAO_CAO_x.xlsx"), b"x").unwrap();

        assert!(svc.delete_report("O1_BAO_CAO_x.xlsx").success);
        assert!(!svc.delete_report("O1_BAO_CAO_x.xlsx").success);
        assert!(!svc.delete_report("../O1.xlsx").success);
        assert_eq!(svc.clear_reports().affected, 0);
    }

    #[test]
    fn test_install_logo_rejects_gif() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let gif = dir.path().join("logo.gif");
        fs::write(&gif, b"GIF89a").unwrap();

        let outcome = svc.install_logo(&gif);
        assert!(!outcome.success);
        assert_eq!(outcome.affected, 0);
    }
}
