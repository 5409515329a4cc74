// ==========================================
// 燃烧测试报告系统 - 命令行入口
// ==========================================
// 职责: 解析命令行参数，调用 API 层并输出结果
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use burn_test_report::app::AppState;
use burn_test_report::config::{app_home_dir, config_keys, default_db_path};
use burn_test_report::domain::{ImportOutcome, ReportOutcome};
use burn_test_report::{i18n, logging};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "burn-test-report")]
#[command(about = "Burn-test record import and per-order report generation")]
#[command(version)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "BURN_TEST_REPORT_DB_PATH")]
    db: Option<String>,

    /// Application directory (templates/, exports/)
    #[arg(long, global = true, env = "BURN_TEST_REPORT_HOME")]
    home: Option<PathBuf>,

    /// Message language (vi, en)
    #[arg(long, global = true, default_value = i18n::DEFAULT_LOCALE)]
    locale: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one or more .xlsx/.xls/.csv files
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List orders, most recently created first
    Orders,

    /// Show the records of one order
    Order { order_no: String },

    /// Generate the report workbook for one order
    Export { order_no: String },

    /// List generated reports, newest first
    Reports,

    /// Print the full path of a generated report
    ReportPath { file_name: String },

    /// Delete one generated report
    DeleteReport { file_name: String },

    /// Delete every generated report
    ClearReports,

    /// Replace the report template (.xlsx)
    InstallTemplate { file: PathBuf },

    /// Replace the logo image (.png/.jpg/.jpeg)
    InstallLogo { file: PathBuf },

    /// Inspect or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show all stored settings
    Show,
    /// Store a setting
    Set { key: String, value: String },
    /// Remove a stored setting (falls back to the default)
    Unset { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    let base_dir = cli.home.clone().unwrap_or_else(app_home_dir);
    tracing::info!(version = burn_test_report::VERSION, db_path = %db_path, "启动");

    let state = AppState::with_base_dir(db_path, base_dir).context("failed to initialize")?;
    // AppState 会重置为默认语言
    i18n::set_locale(&cli.locale);
    run(&cli, &state).await
}

async fn run(cli: &Cli, state: &AppState) -> anyhow::Result<ExitCode> {
    let json = cli.json;

    match &cli.command {
        Commands::Import { files } => {
            let results = state.import_api.import_files(files.clone()).await;
            let mut all_ok = true;
            for (file, result) in files.iter().zip(results) {
                let outcome = result?;
                all_ok &= outcome.success;
                if json {
                    print_json(&outcome)?;
                } else {
                    print_import(file, &outcome);
                }
            }
            Ok(exit_code(all_ok))
        }

        Commands::Orders => {
            let orders = state.import_api.orders().await?;
            if json {
                print_json(&orders)?;
            } else {
                for o in &orders {
                    println!(
                        "{}\t{}\t{}",
                        o.order_no,
                        o.item_count,
                        o.latest_created_at.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Order { order_no } => {
            let detail = state.import_api.order_detail(order_no).await?;
            if json {
                print_json(&detail)?;
            } else {
                for r in &detail.data {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        r.product_code, r.customer, r.size_spec, r.wick, r.color, r.fragrance
                    );
                }
            }
            Ok(exit_code(detail.total_items > 0))
        }

        Commands::Export { order_no } => {
            let outcome = state.report_api.export_order(order_no).await?;
            if json {
                print_json(&outcome)?;
            } else {
                print_report(&outcome.report);
                if let Some(name) = &outcome.file_name {
                    println!("{}", name);
                }
            }
            Ok(exit_code(outcome.report.success))
        }

        Commands::Reports => {
            let reports = state.report_api.list_reports().await?;
            if json {
                print_json(&reports)?;
            } else {
                for r in &reports {
                    println!(
                        "{}\t{}\t{}\t{}",
                        r.file_name,
                        r.order_no,
                        r.file_size,
                        r.created_time.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::ReportPath { file_name } => {
            match state.report_api.report_path(file_name).await? {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!(
                        "{}",
                        i18n::t_with_args("archive.not_found", &[("file", file_name)])
                    );
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::DeleteReport { file_name } => {
            let outcome = state.report_api.delete_report(file_name).await?;
            print_operation(json, &outcome)
        }

        Commands::ClearReports => {
            let outcome = state.report_api.clear_reports().await?;
            print_operation(json, &outcome)
        }

        Commands::InstallTemplate { file } => {
            let outcome = state.report_api.install_template(file.clone()).await?;
            print_operation(json, &outcome)
        }

        Commands::InstallLogo { file } => {
            let outcome = state.report_api.install_logo(file.clone()).await?;
            print_operation(json, &outcome)
        }

        Commands::Config { action } => run_config(json, state, action),
    }
}

fn run_config(json: bool, state: &AppState, action: &ConfigAction) -> anyhow::Result<ExitCode> {
    let config = &state.config_manager;
    match action {
        ConfigAction::Show => {
            let snapshot = config.get_config_snapshot()?;
            if json {
                print_json(&snapshot)?;
            } else {
                for (key, value) in &snapshot {
                    println!("{} = {}", key, value);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            if !config_keys::ALL.contains(&key.as_str()) {
                bail!("unknown config key '{}' (known: {})", key, config_keys::ALL.join(", "));
            }
            let previous = config.get_config_value(key)?;
            config.set_config_value(key, value)?;
            // 写入后立即校验，失败则回滚
            let check = config
                .load_import_config()
                .and_then(|_| config.load_report_config());
            if let Err(e) = check {
                match previous {
                    Some(prev) => config.set_config_value(key, &prev)?,
                    None => {
                        config.remove_config_value(key)?;
                    }
                }
                bail!("invalid value for '{}': {}", key, e);
            }
        }
        ConfigAction::Unset { key } => {
            if !config.remove_config_value(key)? {
                eprintln!("'{}' is not set", key);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ==========================================
// 输出辅助
// ==========================================

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_import(file: &std::path::Path, outcome: &ImportOutcome) {
    println!("[{}] {}", file.display(), outcome.message);
    for rejection in &outcome.rejected {
        let missing: Vec<String> = rejection.missing.iter().map(|f| f.to_string()).collect();
        println!("  row {}: {}", rejection.row_number, missing.join(", "));
    }
    for warning in &outcome.warnings {
        println!("  {}", warning);
    }
}

fn print_report(outcome: &ReportOutcome) {
    println!("{}", outcome.message);
    for item in outcome.failed_items() {
        println!("  #{} {}: {:?}", item.index, item.product_code, item.status);
    }
}

fn print_operation(
    json: bool,
    outcome: &burn_test_report::domain::OperationOutcome,
) -> anyhow::Result<ExitCode> {
    if json {
        print_json(outcome)?;
    } else {
        println!("{}", outcome.message);
    }
    Ok(exit_code(outcome.success))
}
