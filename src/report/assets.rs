// ==========================================
// 燃烧测试报告系统 - 模板 / logo 安装
// ==========================================
// 模板仅接受 .xlsx；logo 仅接受 .png/.jpg/.jpeg
// 安装即覆盖配置中的目标路径
// ==========================================

use crate::config::app_config::ReportConfig;
use crate::report::error::{ReportError, ReportResult};
use std::fs;
use std::path::Path;
use tracing::info;

const TEMPLATE_EXTENSIONS: [&str; 1] = ["xlsx"];
const LOGO_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn check_extension(source: &Path, allowed: &[&str]) -> ReportResult<()> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if allowed.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ReportError::UnsupportedAsset(
            source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        ))
    }
}

fn install(source: &Path, target: &Path) -> ReportResult<()> {
    if !source.is_file() {
        return Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            source.display().to_string(),
        )));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    Ok(())
}

/// 覆盖模板文件
pub fn install_template(config: &ReportConfig, source: &Path) -> ReportResult<()> {
    check_extension(source, &TEMPLATE_EXTENSIONS)?;
    install(source, &config.template_path)?;
    info!(source = %source.display(), target = %config.template_path.display(), "模板已更新");
    Ok(())
}

/// 覆盖 logo 文件
pub fn install_logo(config: &ReportConfig, source: &Path) -> ReportResult<()> {
    check_extension(source, &LOGO_EXTENSIONS)?;
    install(source, &config.logo_path)?;
    info!(source = %source.display(), target = %config.logo_path.display(), "logo 已更新");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_template_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_base_dir(dir.path());
        let source = dir.path().join("new.xlsx");
        fs::write(&source, b"v2").unwrap();

        install_template(&config, &source).unwrap();
        assert_eq!(fs::read(&config.template_path).unwrap(), b"v2");
    }

    #[test]
    fn test_rejects_wrong_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_base_dir(dir.path());
        let source = dir.path().join("logo.gif");
        fs::write(&source, b"gif").unwrap();

        assert!(matches!(
            install_logo(&config, &source),
            Err(ReportError::UnsupportedAsset(_))
        ));
        assert!(matches!(
            install_template(&config, &source),
            Err(ReportError::UnsupportedAsset(_))
        ));
        assert!(!config.logo_path.exists());
    }

    #[test]
    fn test_logo_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_base_dir(dir.path());
        let source = dir.path().join("brand.JPEG");
        fs::write(&source, b"jpeg").unwrap();

        install_logo(&config, &source).unwrap();
        assert!(config.logo_path.exists());
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::with_base_dir(dir.path());
        let result = install_template(&config, &dir.path().join("nope.xlsx"));
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
