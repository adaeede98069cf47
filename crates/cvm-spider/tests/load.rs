use cvm_spider::dfp::aggregate::header;
use cvm_spider::dfp::load::read_reviewed;
use cvm_spider::Error;
use tempfile::TempDir;

#[test]
fn blank_reviewed_values_are_null() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("balance_sheets_checked.csv");
    let text = format!(
        "{}\nBSA,100,A,1,Cash,S,2020-12-31,\nBSA,100,A,1,Cash,S,2021-12-31,75.5\n",
        header().join(",")
    );
    std::fs::write(&path, text).unwrap();

    let records = read_reviewed(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].value, None);
    assert_eq!(records[0].account_description, "Cash");
    assert_eq!(records[1].value, Some(75.5));
}

#[test]
fn unreadable_reviewed_rows_are_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cash_flows_checked.csv");
    let text = format!("{}\nFC-MI,abc,A,6.01,Cash,S,2020-12-31,1\n", header().join(","));
    std::fs::write(&path, text).unwrap();

    let err = read_reviewed(&path).unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
}
