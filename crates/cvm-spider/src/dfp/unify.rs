use super::filter::{file_year, is_valid_file};
use super::Layout;
use crate::fs::{display_name, file_names, unzip};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info, trace, warn};

/// Outcome of [`unify`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Archives extracted.
    pub archives: usize,
    /// Archives that could not be read.
    pub corrupt: usize,
    /// Files moved into the unified directory.
    pub moved: usize,
    /// Files rejected by [`is_valid_file`].
    pub rejected: usize,
    /// Files already present in the unified directory, and left untouched.
    pub conflicts: usize,
}

/// Extract every archive of `layout.zip_dir`, move the files passing [`is_valid_file`] into
/// `layout.unified_dir`, then delete the scratch and download directories.
///
/// Corrupt archives are skipped. A file already in the unified directory is replaced only if
/// `overwrite` is set. The directories are deleted whether or not the rest succeeded.
pub async fn unify(layout: &Layout, overwrite: bool, tui: bool) -> anyhow::Result<Summary> {
    let result = extract_and_move(layout, overwrite, tui).await;

    // clean up, regardless of the outcome
    debug!("deleting {:?} and {:?}", layout.temp_dir, layout.zip_dir);
    for dir in [&layout.temp_dir, &layout.zip_dir] {
        if let Err(err) = remove_dir(dir).await {
            error!("failed to delete {dir:?}, error({err})");
        }
    }

    let summary = result?;
    info!(
        "filtered csv files unified into {:?}: {summary:?}",
        layout.unified_dir
    );
    Ok(summary)
}

async fn extract_and_move(layout: &Layout, overwrite: bool, tui: bool) -> anyhow::Result<Summary> {
    tokio::fs::create_dir_all(&layout.temp_dir).await?;
    tokio::fs::create_dir_all(&layout.unified_dir).await?;

    let mut summary = Summary::default();

    // extract all csv files from the downloaded zip files
    let zip_files: Vec<String> = match file_names(&layout.zip_dir) {
        Ok(names) => names.into_iter().filter(|f| f.ends_with(".zip")).collect(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("download directory {:?} does not exist", layout.zip_dir);
            vec![]
        }
        Err(err) => return Err(err.into()),
    };
    for zip_file in zip_files {
        let path = layout.zip_dir.join(&zip_file);
        match unzip(&path, &layout.temp_dir, tui).await {
            Ok(count) => {
                trace!("{count} files extracted from {zip_file}");
                summary.archives += 1;
                if tui {
                    println!("unzipping {zip_file} ... done");
                }
            }
            Err(err) => {
                error!("{zip_file} is not a valid zip file, skipping: {err}");
                summary.corrupt += 1;
                if tui {
                    println!("unzipping {zip_file} ... failed, skipped");
                }
            }
        }
    }

    // move and filter csv files
    let csv_files: Vec<String> = file_names(&layout.temp_dir)?
        .into_iter()
        .filter(|f| f.ends_with(".csv"))
        .collect();

    let (_multi, total, moved, skipped) =
        crate::tui::multi_progress(csv_files.len(), "unified", "skipped", tui)?;

    for file in csv_files {
        total.inc(1);
        if !is_valid_file(&file) {
            trace!("rejecting {file}");
            summary.rejected += 1;
            continue;
        }

        let src_path = layout.temp_dir.join(&file);
        let dst_path = layout.unified_dir.join(&file);
        if dst_path.exists() {
            if overwrite {
                debug!("overwriting {file} in the unified folder");
                tokio::fs::remove_file(&dst_path).await?;
            } else {
                info!("file {file} already exists in the unified folder, skipping");
                summary.conflicts += 1;
                skipped.inc(1);
                continue;
            }
        }
        move_file(&src_path, &dst_path).await?;
        summary.moved += 1;
        moved.inc(1);
    }

    total.finish();
    moved.finish();
    skipped.finish();

    Ok(summary)
}

/// Rename `from` to `to`, copying instead when they sit on different filesystems.
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    trace!("rename of {} failed, copying instead", display_name(from));
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await
}

async fn remove_dir(dir: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Number of `.csv` files per year in `dir`.
pub fn files_by_year(dir: &Path) -> std::io::Result<BTreeMap<String, usize>> {
    let mut year_count = BTreeMap::new();
    for file in file_names(dir)? {
        if !file.ends_with(".csv") {
            continue;
        }
        if let Some(year) = file_year(&file) {
            *year_count.entry(year.to_string()).or_insert(0) += 1;
        }
    }
    Ok(year_count)
}
