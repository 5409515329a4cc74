// ==========================================
// 报告生成集成测试
// ==========================================
// 测试目标: 真实 xlsx 模板 → 按记录克隆 sheet → 写入单元格 → 保存
// ==========================================


use burn_test_report::domain::{CanonicalRecord, ItemStatus};
use burn_test_report::logging;
use burn_test_report::report::MAX_SHEET_NAME_LEN;
use calamine::Data;
use chrono::{NaiveDate, Utc};
use test_helpers::{create_generator, read_cell, sheet_names, write_logo, write_template};

fn record(customer: &str, order: &str, product: &str, size: &str) -> CanonicalRecord {
    CanonicalRecord::from_values(
        [
            customer.to_string(),
            order.to_string(),
            product.to_string(),
            size.to_string(),
            "W1".to_string(),
            "RED".to_string(),
            "Lavender".to_string(),
        ],
        Utc::now(),
    )
}

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

#[test]
fn test_single_record_fills_template_cells() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();

    let dest = generator.config().export_dir.join("O100_report.xlsx");
    let records = vec![record("ACME", "O100", "P1", "30x50mm")];
    let outcome = generator.generate_with_date("O100", &records, &dest, test_date());

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.sheets_created, 1);
    assert_eq!(outcome.file_path.as_deref(), Some(dest.as_path()));

    // 模板 sheet 已移除
    assert_eq!(sheet_names(&dest).unwrap(), vec!["P1"]);

    assert_eq!(read_cell(&dest, "P1", "C5").unwrap(), Data::String("O100".into()));
    assert_eq!(read_cell(&dest, "P1", "C6").unwrap(), Data::String("ACME".into()));
    assert_eq!(read_cell(&dest, "P1", "C7").unwrap(), Data::String("Lavender".into()));
    assert_eq!(read_cell(&dest, "P1", "C8").unwrap(), Data::String("RED".into()));
    assert_eq!(read_cell(&dest, "P1", "C9").unwrap(), Data::String("W1".into()));
    assert_eq!(read_cell(&dest, "P1", "N5").unwrap(), Data::String("P1".into()));
    assert_eq!(read_cell(&dest, "P1", "N6").unwrap(), Data::Float(30.0));
    assert_eq!(read_cell(&dest, "P1", "S6").unwrap(), Data::Float(50.0));
    assert_eq!(read_cell(&dest, "P1", "N8").unwrap(), Data::String("2024-05-01".into()));

    // 模板标签保留
    assert_eq!(read_cell(&dest, "P1", "B6").unwrap(), Data::String("Khách hàng".into()));
}

#[test]
fn test_duplicate_product_codes_get_suffixes() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();

    let dest = dir.path().join("out.xlsx");
    let records = vec![
        record("ACME", "O1", "ABC", "30x50"),
        record("ACME", "O1", "abc", "30x50"),
        record("ACME", "O1", "P2", "30x50"),
    ];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());

    assert!(outcome.success);
    assert_eq!(outcome.sheets_created, 3);
    assert_eq!(sheet_names(&dest).unwrap(), vec!["ABC", "abc_1", "P2"]);
}

#[test]
fn test_long_product_code_is_truncated_for_sheet_name_only() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();

    let long_code = "X".repeat(40);
    let dest = dir.path().join("long.xlsx");
    let records = vec![
        record("ACME", "O1", &long_code, "30x50"),
        record("ACME", "O1", &long_code, "30x50"),
    ];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());
    assert!(outcome.success);

    let names = sheet_names(&dest).unwrap();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME_LEN));
    assert_eq!(names[0], "X".repeat(MAX_SHEET_NAME_LEN));
    assert!(names[1].ends_with("_1"));

    // 单元格保留完整编码
    assert_eq!(read_cell(&dest, &names[0], "N5").unwrap(), Data::String(long_code));
}

#[test]
fn test_unparseable_size_leaves_dimension_cells_empty() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();

    let dest = dir.path().join("nosize.xlsx");
    let records = vec![record("ACME", "O1", "P1", "unknown")];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());

    assert!(outcome.success);
    assert_eq!(outcome.items[0].skipped_cells, vec!["N6", "S6"]);
    assert_eq!(read_cell(&dest, "P1", "N6").unwrap(), Data::Empty);
    assert_eq!(read_cell(&dest, "P1", "S6").unwrap(), Data::Empty);
}

#[test]
fn test_missing_template_fails_without_output() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());

    let dest = dir.path().join("missing.xlsx");
    let records = vec![record("ACME", "O1", "P1", "30x50")];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());

    assert!(!outcome.success);
    assert_eq!(outcome.sheets_created, 0);
    assert!(outcome.file_path.is_none());
    assert!(!dest.exists());
}

#[test]
fn test_logo_embedded_when_present() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();
    write_logo(&generator.config().logo_path).unwrap();

    let dest = dir.path().join("logo.xlsx");
    let records = vec![record("ACME", "O1", "P1", "30x50")];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());

    assert!(outcome.success);
    assert!(outcome.items[0].logo_embedded);

    let book = umya_spreadsheet::reader::xlsx::read(&dest).unwrap();
    let sheet = book.get_sheet_by_name("P1").unwrap();
    assert_eq!(sheet.get_image_collection().len(), 1);
}

#[test]
fn test_invalid_logo_does_not_fail_report() {
    logging::init_test();

    let dir = tempfile::tempdir().unwrap();
    let generator = create_generator(dir.path());
    write_template(&generator.config().template_path).unwrap();
    std::fs::write(&generator.config().logo_path, b"not a png").unwrap();

    let dest = dir.path().join("badlogo.xlsx");
    let records = vec![record("ACME", "O1", "P1", "30x50")];
    let outcome = generator.generate_with_date("O1", &records, &dest, test_date());

    assert!(outcome.success);
    assert!(!outcome.items[0].logo_embedded);
    assert!(matches!(outcome.items[0].status, ItemStatus::Ok { .. }));
}
