use super::{ReferenceRecord, ReportRecord, Statement};
use crate::fs::{file_names, read_latin1};
use crate::Error;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Exercise order of the prior year's figures, restated in the following filing.
pub const PRIOR_EXERCISE: &str = "PENÚLTIMO";

/// Substring shared by every per-year reference file.
const REFERENCE_MARKER: &str = "dfp_cia_aberta_20";

/// Read every unified file of `statement` in `dir` (sorted by name) into report records.
///
/// Values are read from comma-decimal text; anything unparseable becomes a missing value, and
/// is counted in a warning per file. Rows of the prior exercise are dropped.
pub fn read_statement(dir: &Path, statement: Statement) -> Result<Vec<ReportRecord>, Error> {
    let files = matching_files(dir, |name| {
        statement.markers().iter().any(|marker| name.contains(marker))
    })?;
    if files.is_empty() {
        return Err(Error::NoFiles {
            kind: statement.code(),
            dir: dir.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for path in files {
        trace!("reading {path:?}");
        let rows: Vec<RawReport> = read_rows(&path)?;
        let mut malformed = 0usize;
        let mut restated = 0usize;

        for row in rows {
            if row.exercise_order.as_deref() == Some(PRIOR_EXERCISE) {
                restated += 1;
                continue;
            }

            let value = parse_decimal(&row.value);
            if value.is_none() && !row.value.trim().is_empty() {
                malformed += 1;
            }

            let group = match statement.short_group(&row.group) {
                Some(code) => code.to_string(),
                None => row.group,
            };

            records.push(ReportRecord {
                group,
                entity_code: parse_entity_code(&row.entity_code, &path)?,
                company_name: row.company_name,
                account_code: row.account_code,
                account_description: row.account_description,
                fixed_account: row.fixed_account,
                period_end: parse_date(&row.period_end, &path)?,
                value,
            });
        }

        if malformed > 0 {
            warn!("{malformed} unparseable values in {path:?} read as missing");
        }
        trace!("{restated} prior exercise rows dropped from {path:?}");
    }

    debug!("{} {statement} records read from {dir:?}", records.len());
    Ok(records)
}

/// Read every per-year reference file in `dir` (sorted by name), keeping the first record of
/// each entity code.
pub fn read_reference(dir: &Path) -> Result<Vec<ReferenceRecord>, Error> {
    let files = matching_files(dir, |name| name.contains(REFERENCE_MARKER))?;
    if files.is_empty() {
        return Err(Error::NoFiles {
            kind: "reference",
            dir: dir.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for path in files {
        trace!("reading {path:?}");
        for row in read_rows::<RawReference>(&path)? {
            records.push(ReferenceRecord {
                reference_date: row.reference_date,
                company_name: row.company_name,
                entity_code: parse_entity_code(&row.entity_code, &path)?,
                document_category: row.document_category,
            });
        }
    }

    let records = dedup_by_entity(records);
    debug!("{} reference records read from {dir:?}", records.len());
    Ok(records)
}

/// Keep the first record of each entity code, in order.
pub fn dedup_by_entity(records: Vec<ReferenceRecord>) -> Vec<ReferenceRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.entity_code))
        .collect()
}

/// Parse a comma-decimal number, e.g. `"-1234,56"`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.replace(',', ".").parse::<f64>().ok()
}

fn parse_entity_code(value: &str, path: &Path) -> Result<i32, Error> {
    value.trim().parse::<i32>().map_err(|_| Error::EntityCode {
        value: value.to_string(),
        path: path.to_path_buf(),
    })
}

fn parse_date(value: &str, path: &Path) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::PeriodEnd {
        value: value.to_string(),
        path: path.to_path_buf(),
    })
}

fn matching_files(dir: &Path, select: impl Fn(&str) -> bool) -> Result<Vec<PathBuf>, Error> {
    Ok(file_names(dir)?
        .into_iter()
        .filter(|name| name.ends_with(".csv") && select(name))
        .map(|name| dir.join(name))
        .collect())
}

/// Read a `;`-delimited, Latin-1 encoded file with a header row.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    let text = read_latin1(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(text.as_bytes());
    let rows = reader.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

// de
// -------------------------------------------------------------------------------------------------

// CNPJ_CIA;DT_REFER;VERSAO;DENOM_CIA;CD_CVM;GRUPO_DFP;MOEDA;ESCALA_MOEDA;ORDEM_EXERC;
// DT_INI_EXERC;DT_FIM_EXERC;CD_CONTA;DS_CONTA;VL_CONTA;ST_CONTA_FIXA
//
// `CNPJ_CIA`, `VERSAO` and `DT_INI_EXERC` (income & cash flow only) are never read.
#[derive(Debug, Deserialize)]
struct RawReport {
    #[serde(rename = "GRUPO_DFP")]
    group: String,
    #[serde(rename = "CD_CVM")]
    entity_code: String,
    #[serde(rename = "DENOM_CIA")]
    company_name: String,
    #[serde(rename = "CD_CONTA")]
    account_code: String,
    #[serde(rename = "DS_CONTA")]
    account_description: String,
    #[serde(rename = "ST_CONTA_FIXA")]
    fixed_account: String,
    #[serde(rename = "DT_FIM_EXERC")]
    period_end: String,
    #[serde(rename = "VL_CONTA")]
    value: String,
    #[serde(rename = "ORDEM_EXERC", default)]
    exercise_order: Option<String>,
}

// CNPJ_CIA;DT_REFER;VERSAO;DENOM_CIA;CD_CVM;CATEG_DOC;ID_DOC;DT_RECEB;LINK_DOC
#[derive(Debug, Deserialize)]
struct RawReference {
    #[serde(rename = "DT_REFER")]
    reference_date: String,
    #[serde(rename = "DENOM_CIA")]
    company_name: String,
    #[serde(rename = "CD_CVM")]
    entity_code: String,
    #[serde(rename = "CATEG_DOC", default)]
    document_category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals() {
        assert_eq!(parse_decimal("1234,5"), Some(1234.5));
        assert_eq!(parse_decimal("-0,25"), Some(-0.25));
        assert_eq!(parse_decimal("42"), Some(42.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }
}
