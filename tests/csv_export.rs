use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use workbook_etl::export::write_csv;
use workbook_etl::types::{Dataset, Value};

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("workbook-etl-{name}-{nanos}"))
}

fn sample_dataset() -> Dataset {
    Dataset::with_rows(
        "customers_clean_Stamm",
        vec![
            "Name".to_string(),
            "Betrag".to_string(),
            "Geburtsdatum".to_string(),
        ],
        vec![
            vec![
                Value::Text("Müller".to_string()),
                Value::Number(42.0),
                Value::Date(NaiveDate::from_ymd_opt(1990, 5, 2).unwrap()),
            ],
            vec![Value::Text("Schulz".to_string()), Value::Null, Value::Null],
        ],
    )
}

#[test]
fn writes_header_and_utf8_rows_with_empty_null_fields() {
    // Nested path: the sink must create missing directories itself.
    let dir = tmp_dir("csv").join("nested");
    let path = write_csv(&dir, &sample_dataset()).unwrap();

    assert_eq!(path.file_name().unwrap(), "customers_clean_Stamm.csv");
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Name,Betrag,Geburtsdatum");
    assert_eq!(lines[1], "Müller,42,1990-05-02");
    assert_eq!(lines[2], "Schulz,,");

    let _ = fs::remove_dir_all(dir.parent().unwrap());
}

#[test]
fn overwrites_existing_file_of_same_name() {
    let dir = tmp_dir("csv-overwrite");
    write_csv(&dir, &sample_dataset()).unwrap();

    let replacement = Dataset::with_rows(
        "customers_clean_Stamm",
        vec!["Name".to_string()],
        vec![vec![Value::Text("Neu".to_string())]],
    );
    let path = write_csv(&dir, &replacement).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "Name\nNeu\n");

    let _ = fs::remove_dir_all(&dir);
}
