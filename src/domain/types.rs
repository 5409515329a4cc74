// ==========================================
// 燃烧测试报告系统 - 领域类型定义
// ==========================================
// 依据: 标准记录字段表（越南语列名为对外契约）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 标准字段 (Canonical Field)
// ==========================================
// 顺序即标准字段顺序，位置模式按此顺序映射源列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Customer,    // KHÁCH HÀNG
    OrderNo,     // ĐƠN HÀNG
    ProductCode, // MÃ HÀNG
    SizeSpec,    // KÍCH THƯỚC
    Wick,        // BẤC
    Color,       // MÀU
    Fragrance,   // HƯƠNG LIỆU
}

impl CanonicalField {
    /// 全部标准字段（标准顺序）
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::Customer,
        CanonicalField::OrderNo,
        CanonicalField::ProductCode,
        CanonicalField::SizeSpec,
        CanonicalField::Wick,
        CanonicalField::Color,
        CanonicalField::Fragrance,
    ];

    /// 必填字段：任一为空则整行拒收
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::Customer,
        CanonicalField::OrderNo,
        CanonicalField::ProductCode,
    ];

    /// 标准列名（区分变音符号）
    pub fn header(self) -> &'static str {
        match self {
            CanonicalField::Customer => "KHÁCH HÀNG",
            CanonicalField::OrderNo => "ĐƠN HÀNG",
            CanonicalField::ProductCode => "MÃ HÀNG",
            CanonicalField::SizeSpec => "KÍCH THƯỚC",
            CanonicalField::Wick => "BẤC",
            CanonicalField::Color => "MÀU",
            CanonicalField::Fragrance => "HƯƠNG LIỆU",
        }
    }

    /// 在标准顺序中的下标
    pub fn position(self) -> usize {
        match self {
            CanonicalField::Customer => 0,
            CanonicalField::OrderNo => 1,
            CanonicalField::ProductCode => 2,
            CanonicalField::SizeSpec => 3,
            CanonicalField::Wick => 4,
            CanonicalField::Color => 5,
            CanonicalField::Fragrance => 6,
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ==========================================
// 导入布局模式 (Layout Mode)
// ==========================================
// Auto: 按首行形状判断（首行命中任一必填字段别名 → 表头模式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    Auto,
    Headered,
    Positional,
}

impl LayoutMode {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUTO" => Some(LayoutMode::Auto),
            "HEADERED" => Some(LayoutMode::Headered),
            "POSITIONAL" => Some(LayoutMode::Positional),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Auto => write!(f, "AUTO"),
            LayoutMode::Headered => write!(f, "HEADERED"),
            LayoutMode::Positional => write!(f, "POSITIONAL"),
        }
    }
}

// ==========================================
// 逐项处理状态 (Item Status)
// ==========================================
// 用于报告生成的逐 sheet 结果汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Ok { sheet_name: String },
    Skipped { reason: String },
    Failed { reason: String },
}

impl ItemStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ItemStatus::Ok { .. })
    }
}
