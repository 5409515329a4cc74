// ==========================================
// 燃烧测试报告系统 - 报告归档
// ==========================================
// 职责: 导出目录下报告文件的命名、列举、删除、清空
// 约束: 文件名不得包含路径分隔符（防止越出导出目录）
// ==========================================

use crate::domain::ReportFileInfo;
use crate::report::error::{ReportError, ReportResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 报告文件名中订单号之后的固定标记
pub const REPORT_MARKER: &str = "_BAO_CAO_";

const REPORT_EXTENSION: &str = "xlsx";

/// 订单号用作文件名前缀时替换文件系统不接受的字符
fn file_safe(order_no: &str) -> String {
    order_no
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// 从文件名解析订单号
///
/// `{order}_BAO_CAO_...xlsx` → order；无标记时取首个 '_' 之前部分
pub fn order_from_file_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".xlsx")
        .unwrap_or(file_name);
    if let Some(pos) = stem.find(REPORT_MARKER) {
        return stem[..pos].to_string();
    }
    stem.split('_').next().unwrap_or(stem).to_string()
}

// ==========================================
// ReportArchive
// ==========================================
#[derive(Debug, Clone)]
pub struct ReportArchive {
    export_dir: PathBuf,
}

impl ReportArchive {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// 生成唯一输出文件名
    ///
    /// 格式: `{order}_BAO_CAO_{yyyymmdd_HHMMSS}_{8位uuid}.xlsx`
    pub fn output_file_name(order_no: &str, now: DateTime<Local>) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}{}_{}.{}",
            file_safe(order_no),
            REPORT_MARKER,
            now.format("%Y%m%d_%H%M%S"),
            &uuid[..8],
            REPORT_EXTENSION
        )
    }

    /// 校验文件名并解析为导出目录内路径
    pub fn resolve(&self, file_name: &str) -> ReportResult<PathBuf> {
        let trimmed = file_name.trim();
        let invalid = trimmed.is_empty()
            || trimmed.contains('/')
            || trimmed.contains('\\')
            || trimmed == "."
            || trimmed == "..";
        if invalid {
            return Err(ReportError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.export_dir.join(trimmed))
    }

    /// 列出已生成的报告（最新在前）
    pub fn list(&self) -> ReportResult<Vec<ReportFileInfo>> {
        if !self.export_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.export_dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_report = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(REPORT_EXTENSION));
            if !is_report || !path.is_file() {
                continue;
            }

            let metadata = entry.metadata()?;
            let created = metadata.created().or_else(|_| metadata.modified())?;
            let file_name = entry.file_name().to_string_lossy().to_string();

            reports.push(ReportFileInfo {
                order_no: order_from_file_name(&file_name),
                file_name,
                file_size: metadata.len(),
                created_time: DateTime::<Local>::from(created),
                file_path: path,
            });
        }

        reports.sort_by(|a, b| {
            b.created_time
                .cmp(&a.created_time)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        debug!(count = reports.len(), "报告列表已读取");
        Ok(reports)
    }

    /// 删除单个报告
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 文件不存在
    /// - Err(InvalidFileName): 文件名包含路径分隔符
    pub fn delete(&self, file_name: &str) -> ReportResult<bool> {
        let path = self.resolve(file_name)?;
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!(file = %file_name, "报告已删除");
        Ok(true)
    }

    /// 清空全部报告，返回删除数量
    pub fn clear(&self) -> ReportResult<usize> {
        let mut deleted = 0;
        for report in self.list()? {
            match fs::remove_file(&report.file_path) {
                Ok(()) => deleted += 1,
                Err(e) => warn!(file = %report.file_name, error = %e, "报告删除失败"),
            }
        }
        info!(deleted = deleted, "报告已清空");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_output_file_name_format() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 13, 4, 5).unwrap();
        let name = ReportArchive::output_file_name("O/100", now);

        assert!(name.starts_with("O_100_BAO_CAO_20240501_130405_"));
        assert!(name.ends_with(".xlsx"));
        assert_eq!(name.len(), "O_100_BAO_CAO_20240501_130405_".len() + 8 + 5);
        assert_ne!(name, ReportArchive::output_file_name("O/100", now));
    }

    #[test]
    fn test_order_from_file_name() {
        assert_eq!(order_from_file_name("O100_BAO_CAO_20240501_130405_ab12cd34.xlsx"), "O100");
        assert_eq!(order_from_file_name("DH_01_BAO_CAO_20240501_130405.xlsx"), "DH_01");
        assert_eq!(order_from_file_name("legacy_report.xlsx"), "legacy");
    }

    #[test]
    fn test_list_delete_clear() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ReportArchive::new(dir.path());
        fs::write(dir.path().join("O1_BAO_CAO_20240101_000000_aaaaaaaa.xlsx"), b"a").unwrap();
        fs::write(dir.path().join("O2_BAO_CAO_20240101_000000_bbbbbbbb.xlsx"), b"bb").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let reports = archive.list().unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().any(|r| r.order_no == "O2" && r.file_size == 2));

        assert!(archive.delete("O1_BAO_CAO_20240101_000000_aaaaaaaa.xlsx").unwrap());
        assert!(!archive.delete("O1_BAO_CAO_20240101_000000_aaaaaaaa.xlsx").unwrap());

        assert_eq!(archive.clear().unwrap(), 1);
        assert!(archive.list().unwrap().is_empty());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_delete_refuses_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ReportArchive::new(dir.path());
        assert!(matches!(
            archive.delete("../secret.xlsx"),
            Err(ReportError::InvalidFileName(_))
        ));
        assert!(matches!(
            archive.delete("a\\b.xlsx"),
            Err(ReportError::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_missing_export_dir_lists_nothing() {
        let archive = ReportArchive::new("/definitely/not/here");
        assert!(archive.list().unwrap().is_empty());
    }
}
