/// Prefix of every DFP file.
pub const PREFIX: &str = "dfp_cia_aberta_";

/// Statements dropped from the unified directory, by the fourth `_` segment of their name:
/// value added, comprehensive income, changes in equity, and direct-method cash flows.
pub const EXCLUDED_STATEMENTS: [&str; 4] = ["DVA", "DRA", "DMPL", "DFC_MD"];

/// Whether an extracted file belongs in the unified directory.
///
/// ```
/// use cvm_spider::dfp::filter::is_valid_file;
///
/// assert!(is_valid_file("dfp_cia_aberta_2021.csv"));
/// assert!(is_valid_file("dfp_cia_aberta_BPA_con_2021.csv"));
/// assert!(!is_valid_file("dfp_cia_aberta_BPA_ind_2021.csv"));
/// assert!(!is_valid_file("dfp_cia_aberta_DMPL_con_2021.csv"));
/// ```
pub fn is_valid_file(filename: &str) -> bool {
    // the per-year reference file, `dfp_cia_aberta_<year>.csv`
    if is_reference_file(filename) {
        return true;
    }

    if filename.to_lowercase().contains("ind") {
        return false;
    }
    if filename.contains("MD") {
        return false;
    }
    if filename.starts_with("dfp_cia_aberta_parecer_") {
        return false;
    }

    let parts: Vec<&str> = filename.split('_').collect();
    if parts.len() >= 5 && EXCLUDED_STATEMENTS.contains(&parts[3]) {
        return false;
    }

    true
}

/// The base name plus exactly one extra segment.
pub fn is_reference_file(filename: &str) -> bool {
    filename.starts_with(PREFIX) && filename.matches('_').count() == 3
}

/// The year a file covers; the last `_` segment of its stem.
pub fn file_year(filename: &str) -> Option<&str> {
    let stem = filename.rsplit_once('.').map_or(filename, |(stem, _)| stem);
    stem.rsplit('_').next().filter(|year| !year.is_empty())
}
