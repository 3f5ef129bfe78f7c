use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use calamine::{open_workbook_auto, Data, Reader};
use workbook_etl::config::{ConflictPolicy, DbConfig, EtlConfig};
use workbook_etl::error::EtlError;
use workbook_etl::pipeline::Pipeline;

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("workbook-etl-{name}-{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_input_workbook(path: &Path) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Stamm").unwrap();
    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(0, 1, "Geburtsdatum").unwrap();
    ws.write_string(1, 0, "Meier").unwrap();
    ws.write_string(1, 1, "1990/05/02").unwrap();
    ws.write_string(2, 0, "Schulz").unwrap();
    ws.write_string(2, 1, "not a date").unwrap();

    let ws2 = wb.add_worksheet();
    ws2.set_name("Zugang").unwrap();
    ws2.write_string(0, 0, "Name").unwrap();
    ws2.write_string(0, 1, "Stadt").unwrap();
    ws2.write_string(1, 0, "Vogel").unwrap();
    ws2.write_string(1, 1, "Berlin").unwrap();

    wb.save(path).unwrap();
}

fn config_for(dir: &Path) -> EtlConfig {
    EtlConfig {
        input_pattern: dir.join("input/*.xlsx").to_string_lossy().into_owned(),
        csv_output_dir: dir.join("out"),
        merged_workbook_path: dir.join("LOAD DATA.xlsx"),
        merged_sheet_name: "Karte7".to_string(),
        date_columns: vec!["Geburtsdatum".to_string()],
        db: DbConfig {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "app_user".to_string(),
            password: "secret".to_string(),
            database: "crm".to_string(),
            table: "customers".to_string(),
            if_exists: ConflictPolicy::Replace,
        },
        do_db_upload: false,
    }
}

#[test]
fn full_run_without_upload_produces_all_artifacts() {
    let dir = tmp_dir("run");
    fs::create_dir_all(dir.join("input")).unwrap();
    write_input_workbook(&dir.join("input/customers_clean.xlsx"));

    let config = config_for(&dir);
    let summary = Pipeline::new(config.clone()).run().unwrap();

    // One dataset per sheet, in workbook order.
    let counted: Vec<(String, usize)> = summary
        .datasets
        .iter()
        .map(|d| (d.name.clone(), d.rows))
        .collect();
    assert_eq!(
        counted,
        vec![
            ("customers_clean_Stamm".to_string(), 2),
            ("customers_clean_Zugang".to_string(), 1),
        ]
    );

    // Per-sheet CSVs, named {stem}_{sheet}.csv, with normalized dates and provenance.
    assert_eq!(summary.csv_files.len(), 2);
    let stamm_csv =
        fs::read_to_string(dir.join("out/customers_clean_Stamm.csv")).unwrap();
    let lines: Vec<&str> = stamm_csv.lines().collect();
    assert_eq!(lines[0], "Name,Geburtsdatum,__source_file,__source_sheet");
    assert_eq!(lines[1], "Meier,1990-05-02,customers_clean.xlsx,Stamm");
    assert_eq!(lines[2], "Schulz,,customers_clean.xlsx,Stamm");

    // Consolidated workbook with union columns and all rows.
    assert_eq!(summary.merged_rows, 3);
    let mut wb = open_workbook_auto(dir.join("LOAD DATA.xlsx")).unwrap();
    assert_eq!(wb.sheet_names().to_vec(), vec!["Karte7".to_string()]);
    let range = wb.worksheet_range("Karte7").unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    assert_eq!(rows.len(), 4);
    let headers: Vec<String> = rows[0]
        .iter()
        .map(|c| match c {
            Data::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    assert_eq!(
        headers,
        vec![
            "Name".to_string(),
            "Geburtsdatum".to_string(),
            "__source_file".to_string(),
            "__source_sheet".to_string(),
            "Stadt".to_string(),
        ]
    );
    // The Zugang row carries its city in the union column added last.
    assert_eq!(rows[3][4], Data::String("Berlin".to_string()));

    // Upload disabled: template instead of inserted rows.
    assert_eq!(summary.uploaded_rows, None);
    let template = summary.load_template.unwrap();
    assert!(template.contains("LOAD DATA LOCAL INFILE"));
    assert!(template.contains("INTO TABLE crm.customers"));
    assert!(template.contains(&config.csv_output_dir.to_string_lossy().into_owned()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn discovery_failure_aborts_before_any_output() {
    let dir = tmp_dir("run-empty");
    fs::create_dir_all(dir.join("input")).unwrap();

    let config = config_for(&dir);
    let err = Pipeline::new(config.clone()).run().unwrap_err();
    assert!(matches!(err, EtlError::Discovery { .. }));

    // No sink ran: neither the CSV directory nor the merged workbook exists.
    assert!(!config.csv_output_dir.exists());
    assert!(!config.merged_workbook_path.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn merged_sheet_lands_next_to_preexisting_sheets() {
    let dir = tmp_dir("run-preserve");
    fs::create_dir_all(dir.join("input")).unwrap();
    write_input_workbook(&dir.join("input/customers_clean.xlsx"));

    // Pre-existing merge target with an unrelated sheet that must survive.
    {
        use rust_xlsxwriter::Workbook;
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.set_name("Notizen").unwrap();
        ws.write_string(0, 0, "bleibt").unwrap();
        wb.save(dir.join("LOAD DATA.xlsx")).unwrap();
    }

    Pipeline::new(config_for(&dir)).run().unwrap();

    let wb = open_workbook_auto(dir.join("LOAD DATA.xlsx")).unwrap();
    assert_eq!(
        wb.sheet_names().to_vec(),
        vec!["Notizen".to_string(), "Karte7".to_string()]
    );

    let _ = fs::remove_dir_all(&dir);
}
