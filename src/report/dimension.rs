// ==========================================
// 燃烧测试报告系统 - 尺寸解析器
// ==========================================
// 将自由格式尺寸串（"Ø30x50mm", "3x5cm"）解析为毫米单位的直径/高度
// 任何失败均返回 None，不抛错
// ==========================================

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 直径 × 高度（毫米，保留 1 位小数）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub diameter_mm: f64,
    pub height_mm: f64,
}

fn number_token() -> Option<&'static Regex> {
    static TOKEN: OnceLock<Option<Regex>> = OnceLock::new();
    TOKEN
        .get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").ok())
        .as_ref()
}

/// 按二进制值的精确十进制展开舍入到 1 位小数，恰好居中时取偶
///
/// 7.25 → 7.2，0.15（实为 0.1499…）→ 0.1，2.45（实为 2.4500…02）→ 2.5
fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

pub struct DimensionParser;

impl DimensionParser {
    /// 解析尺寸串
    ///
    /// # 规则
    /// 1. 空/空白 → None
    /// 2. 小写化；'×' 与 '*' 视为 'x'；去除全部空白（小数逗号不做特殊处理）
    /// 3. 自左向右提取无符号十进制数
    /// 4. 少于 2 个数 → None
    /// 5. 前两个数为直径/高度；含 "cm" 时乘 10；四舍五入到 1 位小数
    pub fn parse(raw: &str) -> Option<Dimensions> {
        if raw.trim().is_empty() {
            return None;
        }

        let normalized: String = raw
            .to_lowercase()
            .chars()
            .map(|c| if c == '×' || c == '*' { 'x' } else { c })
            .filter(|c| !c.is_whitespace())
            .collect();

        let mut tokens = number_token()?.find_iter(&normalized);
        let diameter: f64 = tokens.next()?.as_str().parse().ok()?;
        let height: f64 = tokens.next()?.as_str().parse().ok()?;

        let factor = if normalized.contains("cm") { 10.0 } else { 1.0 };
        let dims = Dimensions {
            diameter_mm: round1(diameter * factor),
            height_mm: round1(height * factor),
        };

        if dims.diameter_mm.is_finite() && dims.height_mm.is_finite() {
            Some(dims)
        } else {
            None
        }
    }
}
