// ==========================================
// 燃烧测试报告系统 - 应用状态
// ==========================================
// 职责: 打开共享数据库连接，加载配置，组装 API 实例
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, ImportApi, ReportApi};
use crate::config::app_config::app_home_dir;
use crate::config::config_manager::ConfigManager;
use crate::db::open_and_init;
use crate::i18n;
use crate::importer::ImportPipeline;
use crate::report::{ReportGenerator, ReportService, UmyaBackend};
use crate::repository::SqliteRecordStore;

/// 默认存储上的导入API
pub type DefaultImportApi = ImportApi<SqliteRecordStore>;

/// 默认存储与 umya 后端上的报告API
pub type DefaultReportApi = ReportApi<SqliteRecordStore, UmyaBackend>;

/// 应用状态
///
/// 所有组件共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 默认模板/导出目录的根
    pub base_dir: PathBuf,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 记录存储
    pub store: Arc<SqliteRecordStore>,

    /// 记录导入API
    pub import_api: Arc<DefaultImportApi>,

    /// 报告API
    pub report_api: Arc<DefaultReportApi>,
}

impl AppState {
    /// 使用默认应用目录创建 AppState
    pub fn new(db_path: String) -> ApiResult<Self> {
        Self::with_base_dir(db_path, app_home_dir())
    }

    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - base_dir: 默认模板/导出目录的根
    ///
    /// # 说明
    /// 1. 语言重置为默认（vi）；需要其他语言时在构造后调用 i18n::set_locale
    /// 2. 打开共享连接并建表
    /// 3. 从 config_kv 加载导入/报告配置
    /// 4. 创建导入管道与报告服务
    pub fn with_base_dir(db_path: String, base_dir: PathBuf) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, base_dir = %base_dir.display(), "初始化AppState");
        i18n::set_locale(i18n::DEFAULT_LOCALE);

        ensure_parent_dir(Path::new(&db_path))?;
        let conn = open_and_init(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone(), &base_dir)?);
        let import_config = config_manager.load_import_config()?;
        let report_config = config_manager.load_report_config()?;
        tracing::debug!(
            layout = %import_config.layout,
            template = %report_config.template_path.display(),
            export_dir = %report_config.export_dir.display(),
            "配置加载完成"
        );

        // ==========================================
        // 存储与API
        // ==========================================
        let store = Arc::new(SqliteRecordStore::from_connection(conn)?);

        let pipeline = ImportPipeline::new(store.clone(), &import_config);
        let import_api = Arc::new(ImportApi::new(pipeline));

        let generator = ReportGenerator::new(report_config, UmyaBackend);
        let report_api = Arc::new(ReportApi::new(ReportService::new(store.clone(), generator)));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            base_dir,
            config_manager,
            store,
            import_api,
            report_api,
        })
    }
}

fn ensure_parent_dir(db_path: &Path) -> ApiResult<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::InternalError(format!("无法创建数据目录: {}", e))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::i18n::{current_locale, set_locale, t_with_args, LOCALE_TEST_LOCK};
    use crate::repository::RecordStore;

    #[test]
    fn test_app_state_creates_nested_db_dir() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("app.db");

        let state =
            AppState::with_base_dir(db_path.to_string_lossy().to_string(), dir.path().to_path_buf())
                .unwrap();
        assert!(db_path.exists());
        assert_eq!(state.store.total_count().unwrap(), 0);
    }

    #[test]
    fn test_app_state_rejects_invalid_positional_config() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db").to_string_lossy().to_string();

        {
            let state = AppState::with_base_dir(db_path.clone(), dir.path().to_path_buf()).unwrap();
            state
                .config_manager
                .set_config_value(config_keys::IMPORT_POSITIONAL_COLUMNS, "A,1")
                .unwrap();
        }

        let result = AppState::with_base_dir(db_path, dir.path().to_path_buf());
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_app_state_applies_default_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("app.db").to_string_lossy().to_string();

        set_locale("en");
        let _state = AppState::with_base_dir(db_path, dir.path().to_path_buf()).unwrap();
        assert_eq!(current_locale(), "vi");
        assert_eq!(
            t_with_args("import.file_not_found", &[("path", "a.xlsx")]),
            "Không tìm thấy file: a.xlsx"
        );
    }
}
