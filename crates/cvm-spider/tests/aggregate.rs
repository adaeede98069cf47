use chrono::NaiveDate;
use cvm_spider::dfp::aggregate::{aggregate, header, remove_accents, COLUMNS};
use cvm_spider::dfp::{ReportRecord, Statement};

fn record(code: i32, account: &str, period_end: &str, value: Option<f64>) -> ReportRecord {
    ReportRecord {
        group: "BSA".to_string(),
        entity_code: code,
        company_name: format!("CIA {code}"),
        account_code: "1.01".to_string(),
        account_description: account.to_string(),
        fixed_account: "S".to_string(),
        period_end: NaiveDate::parse_from_str(period_end, "%Y-%m-%d").unwrap(),
        value,
    }
}

#[test]
fn sums_duplicate_keys() {
    let records = vec![
        record(200, "Caixa", "2021-12-31", Some(10.0)),
        record(100, "Caixa", "2021-12-31", Some(1.5)),
        record(100, "Caixa", "2021-12-31", Some(2.5)),
        record(100, "Caixa", "2020-12-31", None),
        record(100, "Caixa", "2020-12-31", Some(7.0)),
        record(100, "Estoques", "2021-12-31", None),
    ];

    let dataset = aggregate(records);
    assert_eq!(dataset.len(), 4);

    // ordered by key
    let keys: Vec<(i32, &str, String)> = dataset
        .iter()
        .map(|r| {
            (
                r.entity_code,
                r.account_description.as_str(),
                r.period_end.to_string(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (100, "Caixa", "2020-12-31".to_string()),
            (100, "Caixa", "2021-12-31".to_string()),
            (100, "Estoques", "2021-12-31".to_string()),
            (200, "Caixa", "2021-12-31".to_string()),
        ]
    );
    assert_eq!(dataset[0].value, 7.0);
    assert_eq!(dataset[1].value, 4.0);
    assert_eq!(dataset[2].value, 0.0);
    assert_eq!(dataset[3].value, 10.0);
}

#[test]
fn aggregation_is_idempotent() {
    let records = vec![
        record(100, "Caixa", "2021-12-31", Some(1.25)),
        record(100, "Caixa", "2021-12-31", Some(3.0)),
        record(300, "Caixa", "2019-12-31", Some(-8.0)),
    ];
    let once = aggregate(records);
    let twice = aggregate(once.iter().cloned().map(ReportRecord::from));
    assert_eq!(once, twice);
}

#[test]
fn splits_groups_apart() {
    let mut liabilities = record(100, "Caixa", "2021-12-31", Some(2.0));
    liabilities.group = "BSP".to_string();
    let dataset = aggregate(vec![record(100, "Caixa", "2021-12-31", Some(1.0)), liabilities]);
    assert_eq!(dataset.len(), 2);
}

#[test]
fn removes_accents() {
    assert_eq!(remove_accents("DEMONSTRAÇÃO"), "DEMONSTRACAO");
    assert_eq!(remove_accents("Patrimônio Líquido"), "Patrimonio Liquido");
    assert_eq!(remove_accents("PENÚLTIMO"), "PENULTIMO");
    assert_eq!(remove_accents("CD_CVM"), "CD_CVM");
    assert_eq!(remove_accents("Œuvre"), "OEuvre");
    assert_eq!(remove_accents("Đakovo"), "Dakovo");
    assert_eq!(remove_accents("Łódź"), "Lodz");
}

#[test]
fn drops_records_with_empty_key_fields() {
    let dataset = aggregate(vec![
        record(100, "", "2021-12-31", Some(5.0)),
        record(100, "Caixa", "2021-12-31", Some(1.0)),
    ]);
    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset[0].account_description, "Caixa");
    assert_eq!(dataset[0].value, 1.0);
}

#[test]
fn header_is_ascii() {
    let header = header();
    assert_eq!(header.len(), COLUMNS.len());
    assert!(header.iter().all(|column| column.is_ascii()));
    assert_eq!(Statement::ALL.len(), 3);
}
