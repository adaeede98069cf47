use chrono::NaiveDate;
use cvm_spider::dfp::datasets::write_dataset;
use cvm_spider::dfp::load::load;
use cvm_spider::dfp::pivot::{company_name, distinct_entity_codes, pivot};
use cvm_spider::dfp::{AggregatedRecord, Statement};
use dotenv::var;
use tempfile::TempDir;

fn row(code: i32, account: &str, period_end: &str, value: f64, fixed: &str) -> AggregatedRecord {
    AggregatedRecord {
        group: "BSA".to_string(),
        entity_code: code,
        company_name: format!("CIA {code}"),
        account_code: "1.01".to_string(),
        account_description: account.to_string(),
        fixed_account: fixed.to_string(),
        period_end: NaiveDate::parse_from_str(period_end, "%Y-%m-%d").unwrap(),
        value,
    }
}

// Round trip through a live database; run with
// `DB_CONNECTION_STRING=postgres://... cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn load_then_pivot() {
    let pool = cvm_spider::pg::connect(&var("DB_CONNECTION_STRING").unwrap()).unwrap();

    let dir = TempDir::new().unwrap();
    write_dataset(
        &dir.path().join(Statement::BalanceSheet.checked_file()),
        &[
            row(100, "Cash", "2020-12-31", 50.0, "S"),
            row(100, "Cash", "2021-12-31", 75.0, "S"),
            row(100, "Other", "2021-12-31", 1.0, "N"),
            row(300, "Cash", "2015-12-31", 9.0, "S"),
        ],
    )
    .unwrap();

    let loaded = load(&pool, dir.path(), false).await.unwrap();
    assert_eq!(loaded, vec![("balance_sheets", 4)]);

    let tables = pivot(&pool, &[100, 200], "balance_sheets").await.unwrap();
    assert_eq!(tables.keys().copied().collect::<Vec<_>>(), vec![100]);
    let table = &tables[&100];
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].account, "Cash");
    assert_eq!(table.rows[0].values, vec![Some(50.0), Some(75.0)]);

    assert_eq!(distinct_entity_codes(&pool).await, Some(vec![100, 300]));
    assert_eq!(company_name(&pool, 300).await.as_deref(), Some("CIA 300"));
    assert_eq!(company_name(&pool, 999).await, None);

    // a missing table is an error, reported as no result
    assert!(pivot(&pool, &[100], "no_such_table").await.is_none());

    pool.close();
}
