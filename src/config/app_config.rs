// ==========================================
// 燃烧测试报告系统 - 运行配置结构
// ==========================================
// 模板/logo 路径作为显式配置在构造时注入生成器，不使用进程级全局状态
// ==========================================

use crate::domain::cell_ref::column_index;
use crate::domain::{CanonicalField, LayoutMode};
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 应用数据目录环境变量
pub const HOME_ENV: &str = "BURN_TEST_REPORT_HOME";

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "BURN_TEST_REPORT_DB_PATH";

/// 默认模板文件名
pub const DEFAULT_TEMPLATE_FILE: &str = "MAU.xlsx";

/// 默认 logo 文件名
pub const DEFAULT_LOGO_FILE: &str = "logo.png";

/// 默认位置模式列（按标准字段顺序；HƯƠNG LIỆU 无默认列）
pub const DEFAULT_POSITIONAL_COLUMNS: &str = "A,B,G,M,Y,AB";

/// 应用数据目录
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn app_home_dir() -> PathBuf {
    if let Ok(path) = std::env::var(HOME_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::data_dir()
        .map(|dir| dir.join("burn-test-report"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 默认数据库路径
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    app_home_dir()
        .join("data")
        .join("burn_test_report.db")
        .to_string_lossy()
        .to_string()
}

// ==========================================
// ReportConfig - 报告生成配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// 模板工作簿（首个 sheet 为克隆源）
    pub template_path: PathBuf,
    /// logo 图片（可缺失，缺失时跳过嵌入）
    pub logo_path: PathBuf,
    /// 报告输出目录
    pub export_dir: PathBuf,
}

impl ReportConfig {
    /// 以某个根目录构造默认布局: templates/MAU.xlsx, templates/logo.png, exports/
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            template_path: base.join("templates").join(DEFAULT_TEMPLATE_FILE),
            logo_path: base.join("templates").join(DEFAULT_LOGO_FILE),
            export_dir: base.join("exports"),
        }
    }

    /// 模板文件名（用于错误消息）
    pub fn template_file_name(&self) -> String {
        self.template_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.template_path.display().to_string())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::with_base_dir(&app_home_dir())
    }
}

// ==========================================
// PositionalLayout - 位置模式列布局
// ==========================================
// 按标准字段顺序排列的源列字母；None 表示该字段无源列（取空串）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionalLayout {
    columns: Vec<Option<String>>,
}

impl PositionalLayout {
    /// 解析逗号分隔的列字母列表（空项表示该字段无源列）
    ///
    /// # 示例
    /// - "A,B,G,M,Y,AB" → 前 6 个标准字段，HƯƠNG LIỆU 无源列
    /// - "A,B,,D" → ĐƠN HÀNG 之后的 MÃ HÀNG 无源列
    pub fn parse(spec: &str) -> RepositoryResult<Self> {
        let parts: Vec<&str> = spec.split(',').map(|p| p.trim()).collect();
        if parts.len() > CanonicalField::ALL.len() {
            return Err(RepositoryError::FieldValueError {
                field: "import.positional_columns".to_string(),
                message: format!(
                    "{} columns given, at most {} canonical fields",
                    parts.len(),
                    CanonicalField::ALL.len()
                ),
            });
        }

        let mut columns = Vec::with_capacity(CanonicalField::ALL.len());
        for part in parts {
            if part.is_empty() {
                columns.push(None);
                continue;
            }
            if column_index(part).is_none() {
                return Err(RepositoryError::FieldValueError {
                    field: "import.positional_columns".to_string(),
                    message: format!("invalid column letter '{}'", part),
                });
            }
            columns.push(Some(part.to_ascii_uppercase()));
        }
        columns.resize(CanonicalField::ALL.len(), None);

        Ok(Self { columns })
    }

    /// 标准字段 → 源列字母
    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.columns
            .get(field.position())
            .and_then(|c| c.as_deref())
    }

    /// 标准字段 → 源列 0 基下标
    pub fn index_for(&self, field: CanonicalField) -> Option<usize> {
        self.column_for(field).and_then(column_index)
    }

    /// 还原为配置字符串
    pub fn to_spec(&self) -> String {
        let mut parts: Vec<&str> = self
            .columns
            .iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect();
        while parts.last() == Some(&"") {
            parts.pop();
        }
        parts.join(",")
    }
}

impl Default for PositionalLayout {
    fn default() -> Self {
        let columns = DEFAULT_POSITIONAL_COLUMNS
            .split(',')
            .map(|c| Some(c.to_string()))
            .chain(std::iter::repeat(None))
            .take(CanonicalField::ALL.len())
            .collect();
        Self { columns }
    }
}

// ==========================================
// ImportConfig - 导入配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub layout: LayoutMode,
    pub positional: PositionalLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_positional_layout() {
        let layout = PositionalLayout::default();
        assert_eq!(layout.column_for(CanonicalField::Customer), Some("A"));
        assert_eq!(layout.index_for(CanonicalField::ProductCode), Some(6));
        assert_eq!(layout.index_for(CanonicalField::Color), Some(27));
        assert_eq!(layout.column_for(CanonicalField::Fragrance), None);
        assert_eq!(layout.to_spec(), DEFAULT_POSITIONAL_COLUMNS);
    }

    #[test]
    fn test_parse_positional_layout_with_gap() {
        let layout = PositionalLayout::parse("a, b, ,D").unwrap();
        assert_eq!(layout.column_for(CanonicalField::OrderNo), Some("B"));
        assert_eq!(layout.column_for(CanonicalField::ProductCode), None);
        assert_eq!(layout.column_for(CanonicalField::SizeSpec), Some("D"));
        assert_eq!(layout.to_spec(), "A,B,,D");
    }

    #[test]
    fn test_parse_positional_layout_rejects_bad_input() {
        assert!(PositionalLayout::parse("A,1B").is_err());
        assert!(PositionalLayout::parse("A,B,C,D,E,F,G,H").is_err());
    }

    #[test]
    fn test_report_config_layout() {
        let config = ReportConfig::with_base_dir(Path::new("/srv/app"));
        assert_eq!(config.template_path, Path::new("/srv/app/templates/MAU.xlsx"));
        assert_eq!(config.logo_path, Path::new("/srv/app/templates/logo.png"));
        assert_eq!(config.export_dir, Path::new("/srv/app/exports"));
        assert_eq!(config.template_file_name(), "MAU.xlsx");
    }
}
