// ==========================================
// 燃烧测试报告系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::config::app_config::{ImportConfig, PositionalLayout, ReportConfig};
use crate::db::{configure_sqlite_connection, init_schema, open_and_init};
use crate::domain::LayoutMode;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    /// 未配置路径时的根目录（templates/、exports/ 均位于其下）
    base_dir: PathBuf,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - base_dir: 默认模板/导出目录的根
    pub fn new(db_path: &str, base_dir: &Path) -> RepositoryResult<Self> {
        let conn = open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>, base_dir: &Path) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self {
            conn,
            base_dir: base_dir.to_path_buf(),
        })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    /// 删除配置值（恢复默认）
    pub fn remove_config_value(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM config_kv WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// 获取所有配置的快照（按键排序）
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }

    // ===== 报告配置 =====

    /// 加载报告配置（未配置的路径取 base_dir 下的默认布局）
    pub fn load_report_config(&self) -> RepositoryResult<ReportConfig> {
        let defaults = ReportConfig::with_base_dir(&self.base_dir);

        let path_or = |key: &str, default: PathBuf| -> RepositoryResult<PathBuf> {
            Ok(match self.get_config_value(key)? {
                Some(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
                _ => default,
            })
        };

        Ok(ReportConfig {
            template_path: path_or(config_keys::REPORT_TEMPLATE_PATH, defaults.template_path)?,
            logo_path: path_or(config_keys::REPORT_LOGO_PATH, defaults.logo_path)?,
            export_dir: path_or(config_keys::REPORT_EXPORT_DIR, defaults.export_dir)?,
        })
    }

    // ===== 导入配置 =====

    /// 加载导入配置
    ///
    /// # 说明
    /// - 布局模式无法识别时回退 AUTO 并告警
    /// - 位置列配置非法时返回 FieldValueError
    pub fn load_import_config(&self) -> RepositoryResult<ImportConfig> {
        let raw_mode = self.get_config_or_default(config_keys::IMPORT_LAYOUT_MODE, "AUTO")?;
        let layout = LayoutMode::from_str(&raw_mode).unwrap_or_else(|| {
            warn!(
                config_key = config_keys::IMPORT_LAYOUT_MODE,
                raw_value = %raw_mode,
                "布局模式配置无法识别，使用 AUTO"
            );
            LayoutMode::Auto
        });

        let positional = match self.get_config_value(config_keys::IMPORT_POSITIONAL_COLUMNS)? {
            Some(raw) if !raw.trim().is_empty() => PositionalLayout::parse(&raw)?,
            _ => PositionalLayout::default(),
        };

        Ok(ImportConfig { layout, positional })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 报告
    pub const REPORT_TEMPLATE_PATH: &str = "report.template_path";
    pub const REPORT_LOGO_PATH: &str = "report.logo_path";
    pub const REPORT_EXPORT_DIR: &str = "report.export_dir";

    // 导入
    pub const IMPORT_LAYOUT_MODE: &str = "import.layout_mode";
    pub const IMPORT_POSITIONAL_COLUMNS: &str = "import.positional_columns";

    pub const ALL: [&str; 5] = [
        REPORT_TEMPLATE_PATH,
        REPORT_LOGO_PATH,
        REPORT_EXPORT_DIR,
        IMPORT_LAYOUT_MODE,
        IMPORT_POSITIONAL_COLUMNS,
    ];
}
