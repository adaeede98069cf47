#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

pub const STATEMENT_HEADER: &str = "CNPJ_CIA;DT_REFER;VERSAO;DENOM_CIA;CD_CVM;GRUPO_DFP;MOEDA;\
ESCALA_MOEDA;ORDEM_EXERC;DT_FIM_EXERC;CD_CONTA;DS_CONTA;VL_CONTA;ST_CONTA_FIXA";

pub const REFERENCE_HEADER: &str =
    "CNPJ_CIA;DT_REFER;VERSAO;DENOM_CIA;CD_CVM;CATEG_DOC;ID_DOC;DT_RECEB;LINK_DOC";

/// Encode `text` as Latin-1, like the CVM files.
pub fn latin1(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(!had_errors, "text not representable in Latin-1");
    bytes.into_owned()
}

/// Write `lines` under `header` to `dir/name`, Latin-1 encoded.
pub fn write_latin1_csv(dir: &Path, name: &str, header: &str, lines: &[&str]) {
    let mut text = format!("{header}\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    std::fs::write(dir.join(name), latin1(&text)).unwrap();
}

/// A balance sheet line for `write_latin1_csv`.
pub fn statement_line(
    company: &str,
    code: &str,
    group: &str,
    order: &str,
    period_end: &str,
    account: (&str, &str),
    value: &str,
    fixed: &str,
) -> String {
    format!(
        "00.000.000/0001-00;{period_end};1;{company};{code};{group};REAL;MIL;{order};\
        {period_end};{};{};{value};{fixed}",
        account.0, account.1
    )
}

/// Write a zip archive at `path` holding `entries` of (name, content).
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}
