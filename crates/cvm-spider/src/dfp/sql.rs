use crate::pg::quote_ident;
use std::ops::RangeInclusive;

/// Fiscal years pivoted into columns, each closing on December 31st.
pub(crate) const FISCAL_YEARS: RangeInclusive<i32> = 2010..=2023;

//////////////////////////////////////////////////////////////////
// load
//////////////////////////////////////////////////////////////////

/// Drop `table`, if it exists, and create it anew with the dataset columns.
pub(crate) fn recreate_table(table: &str) -> String {
    let table = quote_ident(table);
    format!(
        r#"
    DROP TABLE IF EXISTS {table};
    CREATE TABLE {table} (
        "GRUPO_DFP" TEXT NOT NULL,
        "CD_CVM" INTEGER NOT NULL,
        "DENOM_CIA" TEXT NOT NULL,
        "CD_CONTA" TEXT NOT NULL,
        "DS_CONTA" TEXT NOT NULL,
        "ST_CONTA_FIXA" TEXT NOT NULL,
        "DT_FIM_EXERC" DATE NOT NULL,
        "VL_CONTA" DOUBLE PRECISION
    );
    "#
    )
}

pub(crate) fn copy_dataset(table: &str) -> String {
    format!(
        r#"COPY {} ("GRUPO_DFP", "CD_CVM", "DENOM_CIA", "CD_CONTA", "DS_CONTA", "ST_CONTA_FIXA", "DT_FIM_EXERC", "VL_CONTA") FROM STDIN BINARY"#,
        quote_ident(table)
    )
}

//////////////////////////////////////////////////////////////////
// pivot
//////////////////////////////////////////////////////////////////

/// One row per (`CD_CVM`, `DS_CONTA`) of the fixed chart of accounts, with one column per
/// fiscal year end; `$1` is the array of entity codes.
pub(crate) fn pivot(table: &str) -> String {
    let columns = FISCAL_YEARS
        .map(|year| {
            format!(
                r#"MAX(CASE WHEN "DT_FIM_EXERC" = '{year}-12-31' THEN "VL_CONTA" END) AS "{year}-12-31""#
            )
        })
        .collect::<Vec<_>>()
        .join(",\n        ");

    format!(
        r#"
    SELECT "CD_CVM", "DS_CONTA",
        {columns}
    FROM (
        SELECT "CD_CVM", "DS_CONTA", "DT_FIM_EXERC", "VL_CONTA"
        FROM {table}
        WHERE "CD_CVM" = ANY($1) AND "ST_CONTA_FIXA" = 'S'
    ) AS filtered_data
    GROUP BY "CD_CVM", "DS_CONTA"
    ORDER BY "CD_CVM", "DS_CONTA"
    "#,
        table = quote_ident(table)
    )
}

pub(crate) fn distinct_entity_codes(table: &str) -> String {
    format!(
        r#"
    SELECT DISTINCT "CD_CVM"
    FROM {}
    ORDER BY "CD_CVM"
    "#,
        quote_ident(table)
    )
}

pub(crate) fn company_name(table: &str) -> String {
    format!(
        r#"
    SELECT "DENOM_CIA"
    FROM {}
    WHERE "CD_CVM" = $1
    LIMIT 1
    "#,
        quote_ident(table)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_has_a_column_per_fiscal_year() {
        let query = pivot("cash_flows");
        for year in FISCAL_YEARS {
            assert!(query.contains(&format!(r#"AS "{year}-12-31""#)));
        }
        assert!(query.contains(r#"FROM "cash_flows""#));
        assert!(query.contains(r#""ST_CONTA_FIXA" = 'S'"#));
        assert!(query.contains(r#""CD_CVM" = ANY($1)"#));
        assert!(query.contains(r#"GROUP BY "CD_CVM", "DS_CONTA""#));
    }
}
