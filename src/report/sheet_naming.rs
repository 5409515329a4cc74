// ==========================================
// 燃烧测试报告系统 - sheet 命名
// ==========================================
// 规则:
// - 标题最长 31 字符（按字符计）
// - Excel 禁用字符 [ ] : * ? / \ 替换为 '_'
// - 冲突（不区分大小写）时追加 _1, _2, …，截断基名保证总长 ≤ 31
// ==========================================

use std::collections::HashSet;

/// Excel sheet 标题最大长度
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// 空产品代码的兜底标题
const FALLBACK_NAME: &str = "Sheet";

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// 替换禁用字符并截断
pub fn sanitize_sheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    // 首尾单引号 Excel 不接受
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    truncate_chars(cleaned, MAX_SHEET_NAME_LEN)
}

// ==========================================
// SheetNamer - 唯一标题分配器
// ==========================================
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    /// 以已存在的 sheet 名初始化
    pub fn with_existing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            taken: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// 生成唯一标题（不登记）
    pub fn propose(&self, product_code: &str) -> String {
        let base = sanitize_sheet_name(product_code);
        if !self.is_taken(&base) {
            return base;
        }

        let mut counter: usize = 1;
        loop {
            let suffix = format!("_{}", counter);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let candidate = format!("{}{}", truncate_chars(&base, keep), suffix);
            if !self.is_taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// 登记已使用的标题
    pub fn claim(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// 释放标题（sheet 被移除时）
    pub fn release(&mut self, name: &str) {
        self.taken.remove(&name.to_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_codes_get_suffix() {
        let mut namer = SheetNamer::with_existing(["Template"]);
        let first = namer.propose("ABC");
        namer.claim(&first);
        let second = namer.propose("ABC");
        namer.claim(&second);
        let third = namer.propose("abc");

        assert_eq!(first, "ABC");
        assert_eq!(second, "ABC_1");
        assert_eq!(third, "abc_2");
    }

    #[test]
    fn test_long_codes_truncated() {
        let code = "X".repeat(40);
        let mut namer = SheetNamer::default();

        let first = namer.propose(&code);
        assert_eq!(first.chars().count(), MAX_SHEET_NAME_LEN);
        namer.claim(&first);

        let second = namer.propose(&code);
        assert!(second.chars().count() <= MAX_SHEET_NAME_LEN);
        assert!(second.ends_with("_1"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let code = "Ứ".repeat(35);
        assert_eq!(sanitize_sheet_name(&code).chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_forbidden_characters_replaced() {
        assert_eq!(sanitize_sheet_name("A/B:C*D?"), "A_B_C_D_");
        assert_eq!(sanitize_sheet_name("[X]\\Y"), "_X__Y");
        assert_eq!(sanitize_sheet_name("  "), "Sheet");
    }

    #[test]
    fn test_collides_with_template_name() {
        let namer = SheetNamer::with_existing(["MAU"]);
        assert_eq!(namer.propose("mau"), "mau_1");
    }

    #[test]
    fn test_release_frees_name() {
        let mut namer = SheetNamer::default();
        namer.claim("P1");
        assert!(namer.is_taken("p1"));
        namer.release("P1");
        assert_eq!(namer.propose("P1"), "P1");
    }
}
