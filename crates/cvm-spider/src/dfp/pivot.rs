use super::{sql, Statement};
use chrono::NaiveDate;
use deadpool_postgres::Pool;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use tracing::{debug, error, info};

/// An entity's accounts over the fiscal years; one row per account description.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PivotTable {
    /// Fiscal year ends, one per column.
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<PivotRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PivotRow {
    /// `DS_CONTA`
    pub account: String,
    /// Aligned with [`PivotTable::periods`].
    pub values: Vec<Option<f64>>,
}

impl PivotTable {
    /// Value of `account` at `period`, if both are present and the value is not null.
    pub fn value(&self, account: &str, period: NaiveDate) -> Option<f64> {
        let column = self.periods.iter().position(|p| *p == period)?;
        self.rows
            .iter()
            .find(|row| row.account == account)
            .and_then(|row| row.values.get(column).copied().flatten())
    }
}

/// One row of the pivot query, before partitioning.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotRecord {
    pub entity_code: i32,
    pub account: String,
    pub values: Vec<Option<f64>>,
}

/// Every fiscal year end queried, December 31st of each year.
pub fn fiscal_periods() -> Vec<NaiveDate> {
    sql::FISCAL_YEARS
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 12, 31))
        .collect()
}

/// Drop the periods without a value in any record, then split the records by entity code.
///
/// Each record's `values` must be aligned with `periods`.
pub fn partition(periods: &[NaiveDate], records: Vec<PivotRecord>) -> BTreeMap<i32, PivotTable> {
    let keep: Vec<bool> = (0..periods.len())
        .map(|column| {
            records
                .iter()
                .any(|record| record.values.get(column).copied().flatten().is_some())
        })
        .collect();
    let kept_periods: Vec<NaiveDate> = periods
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(period, _)| *period)
        .collect();

    let mut tables: BTreeMap<i32, PivotTable> = BTreeMap::new();
    for record in records {
        let values = record
            .values
            .into_iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(value, _)| value)
            .collect();
        tables
            .entry(record.entity_code)
            .or_insert_with(|| PivotTable {
                periods: kept_periods.clone(),
                rows: Vec::new(),
            })
            .rows
            .push(PivotRow {
                account: record.account,
                values,
            });
    }
    tables
}

/// Pivot the fixed chart of accounts of `entity_codes` in `table`, keyed by entity code.
///
/// Entity codes without any row are absent from the result. Any database error is logged, the
/// transaction rolled back, and `None` returned.
pub async fn pivot(
    pool: &Pool,
    entity_codes: &[i32],
    table: &str,
) -> Option<BTreeMap<i32, PivotTable>> {
    let periods = fiscal_periods();
    let rows = query(pool, &sql::pivot(table), &[&entity_codes]).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut values = Vec::with_capacity(periods.len());
        for column in 0..periods.len() {
            match row.try_get::<_, Option<f64>>(column + 2) {
                Ok(value) => values.push(value),
                Err(err) => {
                    error!("failed to read pivot row, error({err})");
                    return None;
                }
            }
        }
        let (entity_code, account) = match (row.try_get::<_, i32>(0), row.try_get::<_, String>(1)) {
            (Ok(entity_code), Ok(account)) => (entity_code, account),
            (Err(err), _) | (_, Err(err)) => {
                error!("failed to read pivot row, error({err})");
                return None;
            }
        };
        records.push(PivotRecord {
            entity_code,
            account,
            values,
        });
    }

    let tables = partition(&periods, records);
    debug!("pivoted {} of {} entity codes", tables.len(), entity_codes.len());
    Some(tables)
}

/// Every entity code in the balance sheets, ascending.
pub async fn distinct_entity_codes(pool: &Pool) -> Option<Vec<i32>> {
    let query_sql = sql::distinct_entity_codes(Statement::BalanceSheet.table());
    let rows = query(pool, &query_sql, &[]).await?;
    rows.iter()
        .map(|row| row.try_get(0))
        .collect::<Result<Vec<i32>, _>>()
        .map_err(|err| error!("failed to read entity code, error({err})"))
        .ok()
}

/// A company name filed under `entity_code`, if any.
pub async fn company_name(pool: &Pool, entity_code: i32) -> Option<String> {
    let query_sql = sql::company_name(Statement::BalanceSheet.table());
    let rows = query(pool, &query_sql, &[&entity_code]).await?;
    match rows.first() {
        Some(row) => row
            .try_get(0)
            .map_err(|err| error!("failed to read company name, error({err})"))
            .ok(),
        None => {
            info!("no company found for entity code {entity_code}");
            None
        }
    }
}

/// Run `stmt` in its own transaction on a pooled connection; the connection goes back to the
/// pool when this returns, whatever the outcome.
async fn query(pool: &Pool, stmt: &str, params: &[&(dyn ToSql + Sync)]) -> Option<Vec<Row>> {
    let mut pg_client = match pool.get().await {
        Ok(client) => client,
        Err(err) => {
            error!("failed to get pg client from pool, error({err})");
            return None;
        }
    };
    let tx = match pg_client.transaction().await {
        Ok(tx) => tx,
        Err(err) => {
            error!("failed to open transaction, error({err})");
            return None;
        }
    };

    match tx.query(stmt, params).await {
        Ok(rows) => {
            debug!("query executed successfully, {} rows", rows.len());
            if let Err(err) = tx.commit().await {
                error!("failed to commit transaction, error({err})");
                return None;
            }
            Some(rows)
        }
        Err(err) => {
            error!("error executing query, error({err})");
            match tx.rollback().await {
                Ok(()) => info!("transaction rolled back"),
                Err(err) => error!("failed to roll back transaction, error({err})"),
            }
            None
        }
    }
}
