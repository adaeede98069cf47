//! Collapses report records sharing a key into a single summed record.
//!
//! Overlapping filings (a year's figures also appear, restated or not, in later archives) leave
//! duplicate rows behind; summing by the full key folds them together.

use super::{AggregatedRecord, ReportRecord};
use chrono::NaiveDate;
use deunicode::deunicode;
use std::collections::BTreeMap;
use tracing::debug;

/// Dataset columns, in file order.
pub const COLUMNS: [&str; 8] = [
    "GRUPO_DFP",
    "CD_CVM",
    "DENOM_CIA",
    "CD_CONTA",
    "DS_CONTA",
    "ST_CONTA_FIXA",
    "DT_FIM_EXERC",
    "VL_CONTA",
];

// (group, entity code, company name, account code, account description, fixed account, period end)
type Key = (String, i32, String, String, String, String, NaiveDate);

/// Sum `VL_CONTA` by (`GRUPO_DFP`, `CD_CVM`, `DENOM_CIA`, `CD_CONTA`, `DS_CONTA`,
/// `ST_CONTA_FIXA`, `DT_FIM_EXERC`), ordered by that key.
///
/// Missing values are skipped; a key with only missing values sums to `0.0`. Records with an
/// empty text field in the key are dropped.
pub fn aggregate(records: impl IntoIterator<Item = ReportRecord>) -> Vec<AggregatedRecord> {
    let mut sums: BTreeMap<Key, f64> = BTreeMap::new();
    let mut dropped = 0usize;
    for record in records {
        if has_empty_key(&record) {
            dropped += 1;
            continue;
        }
        let key = (
            record.group,
            record.entity_code,
            record.company_name,
            record.account_code,
            record.account_description,
            record.fixed_account,
            record.period_end,
        );
        *sums.entry(key).or_insert(0.0) += record.value.unwrap_or(0.0);
    }
    if dropped > 0 {
        debug!("{dropped} records with an empty key field dropped");
    }

    sums.into_iter()
        .map(
            |(
                (
                    group,
                    entity_code,
                    company_name,
                    account_code,
                    account_description,
                    fixed_account,
                    period_end,
                ),
                value,
            )| AggregatedRecord {
                group,
                entity_code,
                company_name,
                account_code,
                account_description,
                fixed_account,
                period_end,
                value,
            },
        )
        .collect()
}

fn has_empty_key(record: &ReportRecord) -> bool {
    [
        &record.group,
        &record.company_name,
        &record.account_code,
        &record.account_description,
        &record.fixed_account,
    ]
    .iter()
    .any(|field| field.is_empty())
}

/// Transliterate `text` to ASCII, e.g. `"DEMONSTRAÇÃO"` to `"DEMONSTRACAO"`.
pub fn remove_accents(text: &str) -> String {
    deunicode(text)
}

/// Dataset header, transliterated to ASCII.
pub fn header() -> Vec<String> {
    COLUMNS.iter().map(|column| remove_accents(column)).collect()
}
