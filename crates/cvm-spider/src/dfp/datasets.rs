use super::aggregate::{aggregate, header};
use super::reader::{read_reference, read_statement};
use super::{AggregatedRecord, Layout, Statement};
use crate::{time_elapsed, Error};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// One worker per statement.
const WORKERS: usize = 3;

/// Read and aggregate every file of `statement` in the unified directory.
pub fn process_statement(
    unified_dir: &Path,
    statement: Statement,
) -> Result<Vec<AggregatedRecord>, Error> {
    let time = std::time::Instant::now();
    let records = read_statement(unified_dir, statement)?;
    let dataset = aggregate(records);
    debug!(
        "{statement} aggregated into {} rows, {}",
        dataset.len(),
        time_elapsed(time)
    );
    Ok(dataset)
}

/// Build the three datasets from `unified_dir`, each on its own worker thread, in the order of
/// [`Statement::ALL`].
///
/// With `limit`, only the first `limit` entity codes of the reference files are kept.
pub fn build(
    unified_dir: &Path,
    limit: Option<usize>,
) -> Result<Vec<(Statement, Vec<AggregatedRecord>)>, Error> {
    let time = std::time::Instant::now();
    let reference = read_reference(unified_dir)?;
    let mut entity_codes: Vec<i32> = reference.iter().map(|r| r.entity_code).collect();
    if let Some(n) = limit {
        entity_codes.truncate(n);
    }
    info!("number of entity codes being processed: {}", entity_codes.len());
    info!("reference data read, {}", time_elapsed(time));

    let time = std::time::Instant::now();
    let workers = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .build()?;
    let mut datasets = workers.install(|| {
        Statement::ALL
            .par_iter()
            .map(|&statement| process_statement(unified_dir, statement).map(|d| (statement, d)))
            .collect::<Result<Vec<_>, Error>>()
    })?;
    info!("statements processed, {}", time_elapsed(time));

    if limit.is_some() {
        let keep: HashSet<i32> = entity_codes.into_iter().collect();
        for (_, dataset) in datasets.iter_mut() {
            dataset.retain(|record| keep.contains(&record.entity_code));
        }
    }

    Ok(datasets)
}

/// Write `dataset` to `path` as a `,`-delimited file with a header row, replacing any previous
/// file.
pub fn write_dataset(path: &Path, dataset: &[AggregatedRecord]) -> Result<(), Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header())?;
    for record in dataset {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Build every dataset from `layout.unified_dir` and save it into `layout.dataset_dir`.
pub fn create_csv_files(layout: &Layout, limit: Option<usize>, tui: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let pb = crate::tui::spinner("processing statements ...", tui);
    let datasets = build(&layout.unified_dir, limit)?;
    pb.finish_and_clear();
    if tui {
        println!("processing statements ... done");
    }

    let time = std::time::Instant::now();
    std::fs::create_dir_all(&layout.dataset_dir)?;
    for (statement, dataset) in &datasets {
        let path = layout.dataset_dir.join(statement.dataset_file());
        write_dataset(&path, dataset)?;
        info!("{statement} dataset of {} rows saved to {path:?}", dataset.len());
        if tui {
            println!("saving {} ... done", statement.dataset_file());
        }
    }
    info!("datasets saved, {}", time_elapsed(time));
    info!("csv files created, total {}", time_elapsed(start));

    Ok(())
}
