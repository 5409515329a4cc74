// ==========================================
// 燃烧测试报告系统 - 报告生成器
// ==========================================
// 职责: 模板副本上按记录逐个克隆 sheet、写入固定单元格、嵌入 logo
// 流程:
// 1. 复制模板到目标路径（不修改模板本身）
// 2. 打开副本，记录首个 sheet 作为克隆源
// 3. 每条记录一个 sheet；单个 sheet 失败记录日志后继续
// 4. 至少创建 1 个 sheet 时移除模板 sheet
// 5. 保存
// ==========================================

use crate::config::app_config::ReportConfig;
use crate::domain::{CanonicalRecord, ItemStatus, ReportOutcome, SheetOutcome};
use crate::i18n::t_with_args;
use crate::report::cell_mapping::{CellMapping, FieldSource, LOGO_ANCHOR};
use crate::report::dimension::DimensionParser;
use crate::report::error::{ReportError, ReportResult};
use crate::report::sheet_naming::SheetNamer;
use crate::report::workbook::{ReportWorkbook, WorkbookBackend};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// ReportGenerator
// ==========================================
pub struct ReportGenerator<B>
where
    B: WorkbookBackend,
{
    config: ReportConfig,
    mapping: CellMapping,
    backend: B,
}

impl<B> ReportGenerator<B>
where
    B: WorkbookBackend,
{
    /// 使用默认单元格布局创建生成器
    pub fn new(config: ReportConfig, backend: B) -> Self {
        Self {
            config,
            mapping: CellMapping::default(),
            backend,
        }
    }

    /// 使用自定义单元格布局创建生成器（坐标已在 CellMapping 构造时校验）
    pub fn with_mapping(config: ReportConfig, mapping: CellMapping, backend: B) -> Self {
        Self {
            config,
            mapping,
            backend,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 生成报告（测试日期取本地当天）
    pub fn generate(&self, order_no: &str, records: &[CanonicalRecord], dest: &Path) -> ReportOutcome {
        self.generate_with_date(order_no, records, dest, Local::now().date_naive())
    }

    /// 生成报告
    ///
    /// # 参数
    /// - order_no: 订单号
    /// - records: 该订单的记录（按顺序，每条一个 sheet）
    /// - dest: 输出文件路径
    /// - test_date: 写入日期单元格的日期
    ///
    /// # 返回
    /// 始终返回结构化结果；失败时不遗留输出文件
    #[instrument(skip(self, records, dest), fields(records = records.len()))]
    pub fn generate_with_date(
        &self,
        order_no: &str,
        records: &[CanonicalRecord],
        dest: &Path,
        test_date: NaiveDate,
    ) -> ReportOutcome {
        if records.is_empty() {
            warn!(order_no = %order_no, "订单无记录，跳过生成");
            return ReportOutcome::failure(order_no, t_with_args("report.no_records", &[]));
        }

        let template = &self.config.template_path;
        if !template.is_file() {
            let file = self.config.template_file_name();
            error!(order_no = %order_no, template = %template.display(), "模板文件不存在");
            return ReportOutcome::failure(
                order_no,
                t_with_args("report.template_missing", &[("file", &file)]),
            );
        }

        info!(order_no = %order_no, dest = %dest.display(), "开始生成报告");

        match self.build(order_no, records, dest, test_date) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(order_no = %order_no, error = %e, "报告生成失败");
                Self::discard(dest);
                let message = match &e {
                    ReportError::TemplateEmpty(file) => {
                        t_with_args("report.template_empty", &[("file", file)])
                    }
                    other => t_with_args("report.failed", &[("error", &other.to_string())]),
                };
                ReportOutcome::failure(order_no, message)
            }
        }
    }

    fn build(
        &self,
        order_no: &str,
        records: &[CanonicalRecord],
        dest: &Path,
        test_date: NaiveDate,
    ) -> ReportResult<ReportOutcome> {
        // === 步骤 1: 复制模板 ===
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.config.template_path, dest)?;

        // === 步骤 2: 打开副本 ===
        let mut workbook = self.backend.open(dest)?;
        let existing = workbook.sheet_names();
        let template_sheet = existing
            .first()
            .cloned()
            .ok_or_else(|| ReportError::TemplateEmpty(self.config.template_file_name()))?;
        debug!(template_sheet = %template_sheet, "模板 sheet 已定位");

        // === 步骤 3: 逐条记录建 sheet ===
        let logo = self.config.logo_path.is_file().then_some(self.config.logo_path.as_path());
        if logo.is_none() {
            debug!(logo = %self.config.logo_path.display(), "logo 文件不存在，跳过嵌入");
        }

        let mut namer = SheetNamer::with_existing(&existing);
        let mut items = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let item = self.build_sheet(
                &mut workbook,
                &mut namer,
                &template_sheet,
                order_no,
                record,
                index,
                logo,
                test_date,
            );
            items.push(item);
        }

        let sheets_created = items.iter().filter(|i| i.status.is_ok()).count();
        let failed = items.len() - sheets_created;

        // === 步骤 4: 移除模板 sheet（不留下零 sheet 的工作簿）===
        if sheets_created == 0 {
            warn!(order_no = %order_no, failed = failed, "未创建任何 sheet");
            Self::discard(dest);
            return Ok(ReportOutcome {
                success: false,
                message: t_with_args("report.no_sheets", &[("order", order_no)]),
                order_no: order_no.to_string(),
                sheets_created: 0,
                items,
                leftover_sheets: Vec::new(),
                file_path: None,
            });
        }

        let mut leftover_sheets: Vec<String> =
            items.iter().filter_map(|i| i.leftover_sheet.clone()).collect();
        if let Err(e) = workbook.remove_sheet(&template_sheet) {
            warn!(template_sheet = %template_sheet, error = %e, "模板 sheet 移除失败");
            leftover_sheets.insert(0, template_sheet.clone());
        }

        // === 步骤 5: 保存 ===
        workbook.save(dest)?;

        let mut message = if failed == 0 {
            t_with_args("report.success", &[("count", &sheets_created.to_string())])
        } else {
            t_with_args(
                "report.success_with_failures",
                &[
                    ("count", &sheets_created.to_string()),
                    ("failed", &failed.to_string()),
                ],
            )
        };
        if !leftover_sheets.is_empty() {
            message.push_str("; ");
            message.push_str(&t_with_args(
                "report.leftover_sheets",
                &[("sheets", &leftover_sheets.join(", "))],
            ));
        }
        info!(
            order_no = %order_no,
            sheets_created = sheets_created,
            failed = failed,
            leftover = leftover_sheets.len(),
            dest = %dest.display(),
            "报告生成完成"
        );

        Ok(ReportOutcome {
            success: true,
            message,
            order_no: order_no.to_string(),
            sheets_created,
            items,
            leftover_sheets,
            file_path: Some(dest.to_path_buf()),
        })
    }

    /// 构建单个 sheet；失败时尽力移除半成品并返回 Failed
    #[allow(clippy::too_many_arguments)]
    fn build_sheet(
        &self,
        workbook: &mut B::Workbook,
        namer: &mut SheetNamer,
        template_sheet: &str,
        order_no: &str,
        record: &CanonicalRecord,
        index: usize,
        logo: Option<&Path>,
        test_date: NaiveDate,
    ) -> SheetOutcome {
        let sheet_name = namer.propose(&record.product_code);
        let mut outcome = SheetOutcome {
            index,
            product_code: record.product_code.clone(),
            status: ItemStatus::Ok {
                sheet_name: sheet_name.clone(),
            },
            logo_embedded: false,
            skipped_cells: Vec::new(),
            leftover_sheet: None,
        };

        if let Err(e) = workbook.clone_sheet(template_sheet, &sheet_name) {
            error!(
                order_no = %order_no,
                product_code = %record.product_code,
                sheet = %sheet_name,
                error = %e,
                "sheet 克隆失败，跳过该记录"
            );
            outcome.status = ItemStatus::Failed {
                reason: e.to_string(),
            };
            return outcome;
        }
        namer.claim(&sheet_name);

        let source = FieldSource {
            order_no,
            record,
            dimensions: DimensionParser::parse(&record.size_spec),
            test_date,
        };
        if source.dimensions.is_none() && !record.size_spec.trim().is_empty() {
            debug!(size_spec = %record.size_spec, "尺寸无法解析，直径/高度留空");
        }

        for (field, cell) in self.mapping.entries() {
            let Some(value) = field.value(&source) else {
                outcome.skipped_cells.push(cell.clone());
                continue;
            };
            if let Err(e) = workbook.write_cell(&sheet_name, cell, &value) {
                error!(
                    order_no = %order_no,
                    product_code = %record.product_code,
                    sheet = %sheet_name,
                    cell = %cell,
                    error = %e,
                    "单元格写入失败，移除该 sheet"
                );
                match workbook.remove_sheet(&sheet_name) {
                    Ok(()) => namer.release(&sheet_name),
                    Err(remove_err) => {
                        warn!(sheet = %sheet_name, error = %remove_err, "半成品 sheet 移除失败");
                        outcome.leftover_sheet = Some(sheet_name.clone());
                    }
                }
                outcome.status = ItemStatus::Failed {
                    reason: e.to_string(),
                };
                return outcome;
            }
        }

        if let Some(logo_path) = logo {
            match workbook.insert_image(&sheet_name, LOGO_ANCHOR, logo_path) {
                Ok(()) => outcome.logo_embedded = true,
                Err(e) => warn!(sheet = %sheet_name, error = %e, "logo 嵌入失败，继续"),
            }
        }

        debug!(sheet = %sheet_name, product_code = %record.product_code, "sheet 已创建");
        outcome
    }

    /// 删除未完成的输出文件
    fn discard(dest: &Path) {
        if dest.exists() {
            if let Err(e) = fs::remove_file(dest) {
                warn!(dest = %dest.display(), error = %e, "输出文件清理失败");
            }
        }
    }
}
