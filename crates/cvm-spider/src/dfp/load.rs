use super::{sql, Statement};
use crate::{time_elapsed, Error};
use chrono::NaiveDate;
use deadpool_postgres::{Client, Pool};
use serde::Deserialize;
use std::path::Path;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::types::{ToSql, Type};
use tracing::{debug, error, info, warn};

/// Column types of every loaded table, in dataset order.
const COLUMN_TYPES: [Type; 8] = [
    Type::TEXT,
    Type::INT4,
    Type::TEXT,
    Type::TEXT,
    Type::TEXT,
    Type::TEXT,
    Type::DATE,
    Type::FLOAT8,
];

/// One row of a reviewed dataset. Reviewers may blank `VL_CONTA`, which loads as null.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ReviewedRecord {
    #[serde(rename = "GRUPO_DFP")]
    pub group: String,
    #[serde(rename = "CD_CVM")]
    pub entity_code: i32,
    #[serde(rename = "DENOM_CIA")]
    pub company_name: String,
    #[serde(rename = "CD_CONTA")]
    pub account_code: String,
    #[serde(rename = "DS_CONTA")]
    pub account_description: String,
    #[serde(rename = "ST_CONTA_FIXA")]
    pub fixed_account: String,
    #[serde(rename = "DT_FIM_EXERC")]
    pub period_end: NaiveDate,
    #[serde(rename = "VL_CONTA")]
    pub value: Option<f64>,
}

/// Read every row of the reviewed dataset at `path`.
pub fn read_reviewed(path: &Path) -> Result<Vec<ReviewedRecord>, Error> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let records = reader
        .deserialize::<ReviewedRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| {
            error!("failed to read a row of {path:?}, error({err})");
            err
        })?;
    let blank = records.iter().filter(|r| r.value.is_none()).count();
    if blank > 0 {
        warn!("{blank} rows of {path:?} have no value, loading them as null");
    }
    Ok(records)
}

/// Load every reviewed dataset (`<dataset>_checked.csv`) found in `dataset_dir` into its table;
/// returns the tables loaded and their row counts.
///
/// Each table is dropped and recreated before its rows are copied in, so the last load wins.
pub async fn load(
    pool: &Pool,
    dataset_dir: &Path,
    tui: bool,
) -> anyhow::Result<Vec<(&'static str, u64)>> {
    let mut pg_client = pool.get().await.map_err(|err| {
        error!("failed to get pg client from pool, error({err})");
        err
    })?;

    let mut loaded = Vec::new();
    for statement in Statement::ALL {
        let path = dataset_dir.join(statement.checked_file());
        if !path.exists() {
            warn!("file {path:?} not found, skipping");
            if tui {
                println!("{} not found ... skipped", statement.checked_file());
            }
            continue;
        }

        let table = statement.table();
        let pb = crate::tui::spinner(&format!("uploading {path:?} to {table} ..."), tui);
        let rows = load_dataset(&mut pg_client, &path, table).await?;
        pb.finish_and_clear();

        info!("data from {path:?} uploaded to {table} table, {rows} rows");
        if tui {
            println!("uploading {} to {table} ... done", statement.checked_file());
        }
        loaded.push((table, rows));
    }

    info!("data upload complete");
    Ok(loaded)
}

/// Recreate `table` and COPY every row of the dataset at `path` into it, in one transaction.
pub async fn load_dataset(pg_client: &mut Client, path: &Path, table: &str) -> anyhow::Result<u64> {
    let time = std::time::Instant::now();
    let records = read_reviewed(path)?;

    let tx = pg_client.transaction().await?;
    tx.batch_execute(&sql::recreate_table(table))
        .await
        .map_err(|err| {
            error!("failed to recreate table {table}, error({err})");
            err
        })?;
    debug!("table {table} recreated");

    let sink = tx.copy_in(sql::copy_dataset(table).as_str()).await?;
    let writer = BinaryCopyInWriter::new(sink, &COLUMN_TYPES);
    futures::pin_mut!(writer);

    for record in &records {
        let row: [&(dyn ToSql + Sync); 8] = [
            &record.group,
            &record.entity_code,
            &record.company_name,
            &record.account_code,
            &record.account_description,
            &record.fixed_account,
            &record.period_end,
            &record.value,
        ];
        writer.as_mut().write(&row).await?;
    }

    let rows = writer.finish().await?;
    tx.commit().await?;
    debug!("{rows} rows copied into {table}, {}", time_elapsed(time));

    Ok(rows)
}
