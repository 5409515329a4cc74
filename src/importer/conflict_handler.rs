// ==========================================
// 燃烧测试报告系统 - 冲突处理器
// ==========================================
// 职责: 同批次内重复键 (order_no, product_code) 合并
// 策略: 保留最后一次出现（与跨批次 upsert 的后写胜出一致）
// ==========================================

use crate::domain::{CanonicalRecord, RecordKey};
use crate::importer::column_reconciler::ReconciledRow;
use std::collections::HashMap;
use tracing::debug;

pub struct ConflictHandler;

impl ConflictHandler {
    /// 检测同批次内重复键
    ///
    /// # 返回
    /// - Vec<(行号, 键)>: 被后续行覆盖的记录（不包括最后一次出现）
    pub fn detect_duplicates(&self, rows: &[ReconciledRow]) -> Vec<(usize, RecordKey)> {
        let last = Self::last_occurrence(rows);
        rows.iter()
            .enumerate()
            .filter(|(idx, row)| last.get(&row.record.key()) != Some(idx))
            .map(|(_, row)| (row.row_number, row.record.key()))
            .collect()
    }

    /// 按保留最后一次出现合并
    ///
    /// # 返回
    /// - (合并后的记录（按最后出现位置排序）, 被合并掉的行数)
    pub fn collapse_keep_last(&self, rows: Vec<ReconciledRow>) -> (Vec<CanonicalRecord>, usize) {
        let last = Self::last_occurrence(&rows);
        let before = rows.len();

        let records: Vec<CanonicalRecord> = rows
            .into_iter()
            .enumerate()
            .filter(|(idx, row)| last.get(&row.record.key()) == Some(idx))
            .map(|(_, row)| row.record)
            .collect();

        let merged = before - records.len();
        if merged > 0 {
            debug!(merged = merged, remaining = records.len(), "同批次重复键已合并");
        }
        (records, merged)
    }

    fn last_occurrence(rows: &[ReconciledRow]) -> HashMap<RecordKey, usize> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| (row.record.key(), idx))
            .collect()
    }
}
