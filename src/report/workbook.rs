// ==========================================
// 燃烧测试报告系统 - 工作簿抽象
// ==========================================
// 职责: 报告生成器所需的最小工作簿操作集
// 实现者: UmyaWorkbook（umya-spreadsheet，可读写既有 xlsx）
// ==========================================

use crate::report::cell_mapping::CellValue;
use crate::report::error::{ReportError, ReportResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::structs::Image;
use umya_spreadsheet::Spreadsheet;

// ==========================================
// ReportWorkbook Trait
// ==========================================
pub trait ReportWorkbook {
    /// 全部 sheet 名（按顺序）
    fn sheet_names(&self) -> Vec<String>;

    /// 克隆 sheet 并命名，追加到末尾
    fn clone_sheet(&mut self, source: &str, new_name: &str) -> ReportResult<()>;

    /// 写单元格
    fn write_cell(&mut self, sheet: &str, cell: &str, value: &CellValue) -> ReportResult<()>;

    /// 嵌入图片（左上角锚定到 anchor）
    fn insert_image(&mut self, sheet: &str, anchor: &str, image: &Path) -> ReportResult<()>;

    fn remove_sheet(&mut self, sheet: &str) -> ReportResult<()>;

    fn save(&self, path: &Path) -> ReportResult<()>;
}

// ==========================================
// WorkbookBackend Trait
// ==========================================
// 用途: 打开模板副本；测试中可替换为内存实现
pub trait WorkbookBackend: Send + Sync {
    type Workbook: ReportWorkbook;

    fn open(&self, path: &Path) -> ReportResult<Self::Workbook>;
}

/// 图片文件是否为 PNG / JPEG（按文件头判断）
pub fn is_supported_image(path: &Path) -> bool {
    const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG: [u8; 3] = [0xFF, 0xD8, 0xFF];

    let mut header = [0u8; 8];
    let read = File::open(path).and_then(|mut f| f.read(&mut header));
    match read {
        Ok(n) if n >= PNG.len() && header == PNG => true,
        Ok(n) if n >= JPEG.len() && header[..3] == JPEG => true,
        _ => false,
    }
}

// ==========================================
// UmyaWorkbook
// ==========================================
pub struct UmyaWorkbook {
    book: Spreadsheet,
}

impl UmyaWorkbook {
    pub fn from_spreadsheet(book: Spreadsheet) -> Self {
        Self { book }
    }

    fn sheet_mut(&mut self, name: &str) -> ReportResult<&mut umya_spreadsheet::Worksheet> {
        self.book
            .get_sheet_by_name_mut(name)
            .ok_or_else(|| ReportError::SheetNotFound(name.to_string()))
    }
}

impl ReportWorkbook for UmyaWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn clone_sheet(&mut self, source: &str, new_name: &str) -> ReportResult<()> {
        let mut copy = self
            .book
            .get_sheet_by_name(source)
            .ok_or_else(|| ReportError::SheetNotFound(source.to_string()))?
            .clone();
        copy.set_name(new_name);

        self.book
            .add_sheet(copy)
            .map(|_| ())
            .map_err(|e| ReportError::SheetOperation {
                sheet: new_name.to_string(),
                message: e.to_string(),
            })
    }

    fn write_cell(&mut self, sheet: &str, cell: &str, value: &CellValue) -> ReportResult<()> {
        let target = self.sheet_mut(sheet)?.get_cell_mut(cell);
        match value {
            CellValue::Text(text) => {
                target.set_value(text.as_str());
            }
            CellValue::Number(n) => {
                target.set_value_number(*n);
            }
        }
        Ok(())
    }

    fn insert_image(&mut self, sheet: &str, anchor: &str, image: &Path) -> ReportResult<()> {
        // umya 对不可读/非法图片会 panic，嵌入前先校验文件头
        if !is_supported_image(image) {
            return Err(ReportError::ImageEmbed(format!(
                "{} is not a readable PNG/JPEG file",
                image.display()
            )));
        }
        let path_str = image
            .to_str()
            .ok_or_else(|| ReportError::ImageEmbed(format!("non UTF-8 path: {}", image.display())))?;

        let mut marker = MarkerType::default();
        marker.set_coordinate(anchor);
        let mut img = Image::default();
        img.new_image(path_str, marker);

        self.sheet_mut(sheet)?.add_image(img);
        Ok(())
    }

    fn remove_sheet(&mut self, sheet: &str) -> ReportResult<()> {
        self.book
            .remove_sheet_by_name(sheet)
            .map_err(|e| ReportError::SheetOperation {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, path: &Path) -> ReportResult<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path)
            .map_err(|e| ReportError::WorkbookSave(e.to_string()))
    }
}

/// umya-spreadsheet 后端
#[derive(Debug, Clone, Copy, Default)]
pub struct UmyaBackend;

impl WorkbookBackend for UmyaBackend {
    type Workbook = UmyaWorkbook;

    fn open(&self, path: &Path) -> ReportResult<UmyaWorkbook> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| ReportError::WorkbookOpen(format!("{}: {}", path.display(), e)))?;
        Ok(UmyaWorkbook::from_spreadsheet(book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_1X1: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_image_sniffing() {
        let dir = tempfile::tempdir().unwrap();

        let png = dir.path().join("logo.png");
        std::fs::write(&png, PNG_1X1).unwrap();
        assert!(is_supported_image(&png));

        let fake = dir.path().join("fake.png");
        let mut f = File::create(&fake).unwrap();
        f.write_all(b"not an image").unwrap();
        assert!(!is_supported_image(&fake));

        assert!(!is_supported_image(&dir.path().join("missing.png")));
    }

    #[test]
    fn test_umya_clone_write_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = umya_spreadsheet::new_file();
        book.get_sheet_by_name_mut("Sheet1")
            .unwrap()
            .get_cell_mut("A2")
            .set_value("label");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let mut wb = UmyaBackend.open(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Sheet1"]);

        wb.clone_sheet("Sheet1", "P1").unwrap();
        wb.write_cell("P1", "N6", &CellValue::Number(30.0)).unwrap();
        wb.remove_sheet("Sheet1").unwrap();
        wb.save(&path).unwrap();

        let reopened = UmyaBackend.open(&path).unwrap();
        assert_eq!(reopened.sheet_names(), vec!["P1"]);
        assert!(matches!(
            wb.write_cell("missing", "A1", &CellValue::Number(1.0)),
            Err(ReportError::SheetNotFound(_))
        ));
    }
}
