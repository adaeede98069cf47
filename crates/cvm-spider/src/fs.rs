use crate::http::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, trace, warn};

/// GET request a file from `url` and stream it to `path`.
///
/// Any failed request, or a response with a non-success status, is returned as an error; the
/// file is not verified beyond that.
pub async fn download_file(
    http_client: &HttpClient,
    url: &str,
    path: &Path,
    tui: bool,
) -> anyhow::Result<()> {
    use reqwest::header::CONTENT_LENGTH;

    let mut response = http_client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch {url}, error({err})");
            err
        })?;

    // get the content length from the URL header
    let file_size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|len| len.to_str().ok())
        .and_then(|len| len.parse::<u64>().ok())
        .unwrap_or(0);
    trace!("{url} content length: {file_size}");

    // ensure the directory exists
    trace!("checking directory path: {:?}", path);
    let dir_path = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("failed to get directory path of {path:?}"))?;
    tokio::fs::create_dir_all(dir_path).await?;

    // progress bar
    let pb = if tui {
        let pb = ProgressBar::new(file_size).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} {spinner:.magenta}\n\
                    [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {bytes}/{total_bytes} \
                    [Rate: {bytes_per_sec:.magenta}, ETA: {eta:.blue}]",
                )?
                .progress_chars("##-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    pb.set_message(format!("downloading {url} ..."));
    let mut file = File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;
    pb.finish_and_clear();

    debug!("{url} downloaded to {path:?}");
    Ok(())
}

/// Unzip a `.zip` file (`zip_file`) to a target directory (`to_dir`), returning the number of
/// files extracted.
///
/// `to_dir` is created as necessary. Entries whose names would escape `to_dir` are skipped.
pub async fn unzip(zip_file: &Path, to_dir: &Path, tui: bool) -> anyhow::Result<usize> {
    debug!("unzipping {zip_file:?} to {to_dir:?}");

    let file = std::fs::File::open(zip_file)?;
    let archive = zip::ZipArchive::new(file).map_err(|err| {
        error!("failed to open zip file at {zip_file:?}, {err}");
        err
    })?;
    let zip_length = archive.len();
    let archive = Arc::new(Mutex::new(archive));

    // progress bar
    let pb = if tui {
        let pb = ProgressBar::new(zip_length as u64).with_style(
            ProgressStyle::default_bar()
                .template(
                    "{msg} {spinner:.magenta}\n\
                    [{elapsed_precise:.magenta}] |{bar:40.cyan/blue}| {human_pos}/{human_len} files \
                    [Rate: {per_sec:.magenta}, ETA: {eta:.blue}]",
                )?
                .progress_chars("##-"),
        );
        pb.set_message(format!("unzipping {} ...", display_name(zip_file)));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    // ensure the target directory exists
    tokio::fs::create_dir_all(to_dir).await?;

    // parallel iteration across zipped files
    let extracted = (0..zip_length)
        .into_par_iter()
        .map(|i| -> anyhow::Result<usize> {
            let mut archive = archive
                .lock()
                .map_err(|_| anyhow::anyhow!("zip archive lock poisoned"))?;
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                return Ok(0);
            }
            let Some(name) = file.enclosed_name() else {
                warn!("skipping unsafe zip entry {}", file.name());
                return Ok(0);
            };
            let outpath = to_dir.join(name);

            // if output directory does not exist, create it
            if let Some(outdir) = outpath.parent() {
                std::fs::create_dir_all(outdir)?;
            }

            // extract the file
            let mut outfile = std::fs::File::create(&outpath)?;
            trace!("copying {} to {:?}", file.name(), outpath);
            std::io::copy(&mut file, &mut outfile)?;
            pb.inc(1);
            Ok(1)
        })
        .collect::<anyhow::Result<Vec<usize>>>()?
        .into_iter()
        .sum();

    pb.finish_and_clear();
    info!("{zip_file:?} unzipped to {to_dir:?}");

    Ok(extracted)
}

/// Read a whole text file encoded in Latin-1 (decoded as windows-1252, its superset).
pub fn read_latin1(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(&bytes);
    if had_errors {
        warn!("replaced undecodable bytes in {path:?}");
    }
    Ok(text.into_owned())
}

/// Names of the files directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
