//! Relational sink: batched bulk load into a MariaDB/MySQL table.
//!
//! The pipeline is synchronous, so [`load_dataset`] drives the async client to
//! completion on a private current-thread runtime. One invocation makes at most one
//! load attempt: any connection or statement error aborts the run, and batches already
//! committed before a failing batch stay committed (there is no compensating
//! rollback).

use std::path::Path;

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

use crate::config::{ConflictPolicy, DbConfig};
use crate::error::{EtlError, EtlResult};
use crate::types::{Dataset, Value};

/// Rows per `INSERT` statement; bounds statement size and per-statement memory.
pub const INSERT_BATCH_ROWS: usize = 1_000;

/// Inserts all records of `dataset` into the configured table, honoring the conflict
/// policy, and returns the number of inserted rows.
///
/// Columns are created as `TEXT NULL` in dataset order; the pipeline does not infer
/// column types beyond the merged column union.
pub fn load_dataset(cfg: &DbConfig, dataset: &Dataset) -> EtlResult<u64> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(load_dataset_async(cfg, dataset))
}

async fn load_dataset_async(cfg: &DbConfig, dataset: &Dataset) -> EtlResult<u64> {
    let options = MySqlConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database);
    let mut conn = MySqlConnection::connect_with(&options)
        .await
        .map_err(|e| upload_error(&cfg.table, e))?;

    let exists = table_exists(&mut conn, cfg).await?;
    match cfg.if_exists {
        ConflictPolicy::Fail if exists => {
            return Err(EtlError::TableExists {
                table: cfg.table.clone(),
            });
        }
        ConflictPolicy::Replace if exists => {
            let drop = format!("DROP TABLE IF EXISTS {}", quote_identifier(&cfg.table));
            sqlx::query(&drop)
                .execute(&mut conn)
                .await
                .map_err(|e| upload_error(&cfg.table, e))?;
        }
        _ => {}
    }

    let create = create_table_sql(&cfg.table, &dataset.columns);
    sqlx::query(&create)
        .execute(&mut conn)
        .await
        .map_err(|e| upload_error(&cfg.table, e))?;

    let mut inserted = 0u64;
    for batch in dataset.rows.chunks(INSERT_BATCH_ROWS) {
        let sql = insert_sql(&cfg.table, &dataset.columns, batch.len());
        let mut query = sqlx::query(&sql);
        for row in batch {
            for value in row {
                query = query.bind(bind_text(value));
            }
        }
        let result = query
            .execute(&mut conn)
            .await
            .map_err(|e| upload_error(&cfg.table, e))?;
        inserted += result.rows_affected();
    }

    conn.close()
        .await
        .map_err(|e| upload_error(&cfg.table, e))?;
    Ok(inserted)
}

async fn table_exists(conn: &mut MySqlConnection, cfg: &DbConfig) -> EtlResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_schema = ? AND table_name = ?",
    )
    .bind(&cfg.database)
    .bind(&cfg.table)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| upload_error(&cfg.table, e))?;
    Ok(count > 0)
}

fn upload_error(table: &str, source: sqlx::Error) -> EtlError {
    EtlError::Upload {
        table: table.to_string(),
        source,
    }
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn create_table_sql(table: &str, columns: &[String]) -> String {
    let cols: Vec<String> = columns
        .iter()
        .map(|c| format!("{} TEXT NULL", quote_identifier(c)))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table),
        cols.join(", ")
    )
}

fn insert_sql(table: &str, columns: &[String], row_count: usize) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_identifier(c)).collect();
    let row = format!("({})", vec!["?"; columns.len()].join(", "));
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_identifier(table),
        cols.join(", "),
        vec![row; row_count].join(", ")
    )
}

fn bind_text(value: &Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Renders the `LOAD DATA LOCAL INFILE` command template suggested when the direct
/// upload is disabled. The output references the per-sheet CSVs and the configured
/// table and is usable verbatim from a MariaDB client.
pub fn load_data_template(csv_dir: &Path, cfg: &DbConfig) -> String {
    format!(
        "LOAD DATA LOCAL INFILE '{infile}'\n\
         INTO TABLE {database}.{table}\n\
         CHARACTER SET utf8mb4\n\
         FIELDS TERMINATED BY ',' ENCLOSED BY '\"'\n\
         LINES TERMINATED BY '\\n'\n\
         IGNORE 1 ROWS;",
        infile = csv_dir.join("*.csv").display(),
        database = cfg.database,
        table = cfg.table,
    )
}
