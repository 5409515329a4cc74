// ==========================================
// 燃烧测试报告系统 - 测试记录领域模型
// ==========================================
// 自然键: (order_no, product_code)
// 生命周期: 导入时创建；同键再次导入时覆盖全部非键字段并刷新 created_at；
//           核心层从不删除
// ==========================================

use crate::domain::types::CanonicalField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// CanonicalRecord - 标准测试记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub customer: String,     // KHÁCH HÀNG
    pub order_no: String,     // ĐƠN HÀNG（键）
    pub product_code: String, // MÃ HÀNG（键）
    pub size_spec: String,    // KÍCH THƯỚC（原始字符串）
    pub wick: String,         // BẤC
    pub color: String,        // MÀU
    pub fragrance: String,    // HƯƠNG LIỆU
    pub created_at: DateTime<Utc>,
}

impl CanonicalRecord {
    /// 由标准顺序的 7 个字段值构造
    pub fn from_values(values: [String; 7], created_at: DateTime<Utc>) -> Self {
        let [customer, order_no, product_code, size_spec, wick, color, fragrance] = values;
        Self {
            customer,
            order_no,
            product_code,
            size_spec,
            wick,
            color,
            fragrance,
            created_at,
        }
    }

    /// 按标准字段取值
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Customer => &self.customer,
            CanonicalField::OrderNo => &self.order_no,
            CanonicalField::ProductCode => &self.product_code,
            CanonicalField::SizeSpec => &self.size_spec,
            CanonicalField::Wick => &self.wick,
            CanonicalField::Color => &self.color,
            CanonicalField::Fragrance => &self.fragrance,
        }
    }

    /// 自然键
    pub fn key(&self) -> RecordKey {
        RecordKey {
            order_no: self.order_no.clone(),
            product_code: self.product_code.clone(),
        }
    }

    /// 为空的必填字段
    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::REQUIRED
            .iter()
            .copied()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }
}

// ==========================================
// RecordKey - 自然键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub order_no: String,
    pub product_code: String,
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.order_no, self.product_code)
    }
}

// ==========================================
// OrderSummary - 订单汇总（按最近创建排序）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_no: String,
    pub item_count: usize,
    pub latest_created_at: DateTime<Utc>,
}
