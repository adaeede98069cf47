use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) mod sql;

/// Listing and downloading the yearly `.zip` archives.
pub mod archives;

/// Which extracted files make it into the unified directory.
pub mod filter;

/// Extraction of the archives into the unified directory.
pub mod unify;

/// Reading the unified `.csv` files into typed records.
pub mod reader;

pub mod aggregate;

/// Building and writing the aggregated datasets.
pub mod datasets;

/// Bulk loading of reviewed datasets into PostgreSQL.
pub mod load;

/// Lookups and pivots over the loaded tables.
pub mod pivot;

/// Index page listing every yearly DFP archive.
pub const INDEX_URL: &str = "https://dados.cvm.gov.br/dados/CIA_ABERTA/DOC/DFP/DADOS/";

/// Where each stage of the pipeline reads from and writes to.
#[derive(Clone, Debug)]
pub struct Layout {
    /// Downloaded archives; removed after unification.
    pub zip_dir: PathBuf,
    /// Scratch area for extraction; removed after unification.
    pub temp_dir: PathBuf,
    /// Filtered `.csv` files of every year.
    pub unified_dir: PathBuf,
    /// Aggregated (and reviewed) datasets.
    pub dataset_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            zip_dir: PathBuf::from("cvm_zip_files"),
            temp_dir: PathBuf::from("temp_csv_files"),
            unified_dir: PathBuf::from("unified_cvm_data"),
            dataset_dir: PathBuf::from("."),
        }
    }
}

/// The three statements collected from each filing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Statement {
    /// Balance sheet; assets (`BPA`) and liabilities (`BPP`).
    BalanceSheet,
    /// Income statement (`DRE`).
    IncomeStatement,
    /// Cash flow statement, indirect method (`DFC_MI`).
    CashFlow,
}

impl Statement {
    /// Processing order of the dataset writer.
    pub const ALL: [Statement; 3] = [
        Statement::CashFlow,
        Statement::BalanceSheet,
        Statement::IncomeStatement,
    ];

    /// Short code of the statement, as used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Statement::BalanceSheet => "BS",
            Statement::IncomeStatement => "IS",
            Statement::CashFlow => "CF",
        }
    }

    /// Substrings identifying the consolidated files of this statement.
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            Statement::BalanceSheet => &["dfp_cia_aberta_BPA_con_", "dfp_cia_aberta_BPP_con_"],
            Statement::IncomeStatement => &["dfp_cia_aberta_DRE_con_"],
            Statement::CashFlow => &["dfp_cia_aberta_DFC_MI_con_"],
        }
    }

    /// The short code replacing a `GRUPO_DFP` label, if this statement remaps it.
    pub fn short_group(&self, group: &str) -> Option<&'static str> {
        match (self, group) {
            (Statement::BalanceSheet, "DF Consolidado - Balanço Patrimonial Ativo") => Some("BSA"),
            (Statement::BalanceSheet, "DF Consolidado - Balanço Patrimonial Passivo") => {
                Some("BSP")
            }
            (Statement::IncomeStatement, "DF Consolidado - Demonstração do Resultado") => {
                Some("DRE - Con")
            }
            (
                Statement::CashFlow,
                "DF Consolidado - Demonstração do Fluxo de Caixa (Método Indireto)",
            ) => Some("FC-MI"),
            _ => None,
        }
    }

    /// Destination table of the loader.
    pub fn table(&self) -> &'static str {
        match self {
            Statement::BalanceSheet => "balance_sheets",
            Statement::IncomeStatement => "income_statements",
            Statement::CashFlow => "cash_flows",
        }
    }

    /// File name of the aggregated dataset.
    pub fn dataset_file(&self) -> String {
        format!("{}.csv", self.table())
    }

    /// File name of the dataset once reviewed; only these are loaded.
    pub fn checked_file(&self) -> String {
        format!("{}_checked.csv", self.table())
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One row of a statement file.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRecord {
    pub group: String,
    pub entity_code: i32,
    pub company_name: String,
    pub account_code: String,
    pub account_description: String,
    pub fixed_account: String,
    pub period_end: NaiveDate,
    pub value: Option<f64>,
}

/// One row of an aggregated dataset; column names are the dataset header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
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
    pub value: f64,
}

impl From<AggregatedRecord> for ReportRecord {
    fn from(record: AggregatedRecord) -> Self {
        Self {
            group: record.group,
            entity_code: record.entity_code,
            company_name: record.company_name,
            account_code: record.account_code,
            account_description: record.account_description,
            fixed_account: record.fixed_account,
            period_end: record.period_end,
            value: Some(record.value),
        }
    }
}

/// One reporting entity, from the per-year `dfp_cia_aberta_<year>.csv` files.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRecord {
    pub reference_date: String,
    pub company_name: String,
    pub entity_code: i32,
    pub document_category: String,
}
