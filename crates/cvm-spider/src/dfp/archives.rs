use crate::fs::download_file;
use crate::http::*;
use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a[href]").expect("valid anchor selector");
}

/// Every `href` of `html` ending in `.zip`, in page order.
pub fn zip_links(html: &str) -> Vec<String> {
    Html::parse_document(html)
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.ends_with(".zip"))
        .map(str::to_string)
        .collect()
}

/// Download every archive listed on `index_url` into `zip_dir`, skipping the ones already there
/// by name; returns the paths of the archives downloaded by this call.
///
/// A failed request aborts the whole run.
pub async fn scrape(
    http_client: &HttpClient,
    index_url: &str,
    zip_dir: &Path,
    tui: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    debug!("fetching archive index {index_url}");
    let index = Url::parse(index_url)?;
    let html = http_client
        .get(index.clone())
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("failed to fetch archive index, error({err})");
            err
        })?
        .text()
        .await?;

    let links = zip_links(&html);
    info!("{} archives listed at {index_url}", links.len());

    tokio::fs::create_dir_all(zip_dir).await?;

    let mut downloaded = Vec::new();
    for link in links {
        let url = index.join(&link)?;
        let Some(name) = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            error!("failed to get a file name from {url}");
            continue;
        };

        let path = zip_dir.join(&name);
        if path.exists() {
            info!("file {name} already exists, skipping download");
            if tui {
                println!("{name} already exists ... skipped");
            }
            continue;
        }

        download_file(http_client, url.as_str(), &path, tui).await?;
        if tui {
            println!("downloading {name} ... done");
        }
        downloaded.push(path);
    }

    info!("{} archives downloaded to {zip_dir:?}", downloaded.len());
    Ok(downloaded)
}
