// ==========================================
// 燃烧测试报告系统 - 记录校验器
// ==========================================
// 阶段 2: 必填字段校验
// 规则: KHÁCH HÀNG / ĐƠN HÀNG / MÃ HÀNG 任一为空 → 整行拒收（计数，不抛错）
// ==========================================

use crate::domain::RowRejection;
use crate::importer::column_reconciler::ReconciledRow;
use tracing::warn;

pub struct RecordValidator;

impl RecordValidator {
    /// 拆分为通过行与拒收行
    ///
    /// # 返回
    /// - (通过行, 拒收明细)，两者均保持输入顺序
    pub fn partition(&self, rows: Vec<ReconciledRow>) -> (Vec<ReconciledRow>, Vec<RowRejection>) {
        let mut accepted = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();

        for row in rows {
            let missing = row.record.missing_required();
            if missing.is_empty() {
                accepted.push(row);
                continue;
            }

            let fields: Vec<&str> = missing.iter().map(|f| f.header()).collect();
            warn!(
                row = row.row_number,
                order_no = %row.record.order_no,
                product_code = %row.record.product_code,
                missing = ?fields,
                "必填字段为空，整行拒收"
            );
            rejected.push(RowRejection {
                row_number: row.row_number,
                missing,
            });
        }

        (accepted, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CanonicalField, CanonicalRecord};
    use chrono::Utc;

    fn row(n: usize, customer: &str, order: &str, product: &str) -> ReconciledRow {
        ReconciledRow {
            row_number: n,
            record: CanonicalRecord::from_values(
                [
                    customer.to_string(),
                    order.to_string(),
                    product.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ],
                Utc::now(),
            ),
        }
    }

    #[test]
    fn test_partition_rejects_rows_with_empty_required_fields() {
        let (accepted, rejected) = RecordValidator.partition(vec![
            row(2, "ACME", "O1", "P1"),
            row(3, "", "O1", "P2"),
            row(4, "ACME", " ", ""),
            row(5, "ACME", "O1", "P3"),
        ]);

        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[1].row_number, 5);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].row_number, 3);
        assert_eq!(rejected[0].missing, vec![CanonicalField::Customer]);
        assert_eq!(
            rejected[1].missing,
            vec![CanonicalField::OrderNo, CanonicalField::ProductCode]
        );
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let (accepted, rejected) = RecordValidator.partition(vec![row(2, "A", "O", "P")]);
        assert_eq!(accepted.len(), 1);
        assert!(rejected.is_empty());
    }
}
