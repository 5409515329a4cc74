// ==========================================
// 燃烧测试报告系统 - 单元格坐标工具
// ==========================================
// 职责: A1 坐标 / 列字母 与 0 基下标互转
// ==========================================

/// 列字母 → 0 基列下标（A=0, Z=25, AA=26, AB=27）
///
/// 非法输入（空串、非 ASCII 字母、超过 XFD）返回 None
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }

    let mut index: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let value = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index * 26 + value;
    }

    // XFD = 16384 列（Excel 上限）
    if index > 16_384 {
        return None;
    }
    Some(index - 1)
}

/// 0 基列下标 → 列字母
pub fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// 解析 A1 坐标 → (0 基行, 0 基列)
pub fn parse_a1(coordinate: &str) -> Option<(u32, u32)> {
    let coordinate = coordinate.trim();
    let split = coordinate.find(|c: char| c.is_ascii_digit())?;
    let (col_part, row_part) = coordinate.split_at(split);

    let col = column_index(col_part)?;
    let row: u32 = row_part.parse().ok()?;
    if row == 0 || row > 1_048_576 {
        return None;
    }
    Some((row - 1, col as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("G"), Some(6));
        assert_eq!(column_index("Z"), Some(25));
        assert_eq!(column_index("AA"), Some(26));
        assert_eq!(column_index("ab"), Some(27));
        assert_eq!(column_index(""), None);
        assert_eq!(column_index("A1"), None);
        assert_eq!(column_index("XFE"), None);
    }

    #[test]
    fn test_column_letters_roundtrip_boundaries() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_parse_a1() {
        assert_eq!(parse_a1("C5"), Some((4, 2)));
        assert_eq!(parse_a1("N6"), Some((5, 13)));
        assert_eq!(parse_a1("S6"), Some((5, 18)));
        assert_eq!(parse_a1("A0"), None);
        assert_eq!(parse_a1("5C"), None);
        assert_eq!(parse_a1("C"), None);
    }
}
