use cvm_spider::dfp::{self, Layout};
use deadpool_postgres::Pool;
use tracing::{debug, error, info};

/// Download every archive not downloaded yet.
pub(crate) async fn fetch(layout: &Layout, index_url: &str, tui: bool) -> anyhow::Result<()> {
    if tui {
        println!(
            "{bar}\n{name:^40}\n{bar}",
            bar = "=".repeat(40),
            name = "DFP archives"
        );
    }
    let time = std::time::Instant::now();
    let http_client = cvm_spider::std_client_build()?;
    dfp::archives::scrape(&http_client, index_url, &layout.zip_dir, tui).await?;
    info!("zip files downloaded, time elapsed: {:?}", time.elapsed());
    Ok(())
}

/// Extract the archives into the unified directory, and report the files per year.
pub(crate) async fn unify(layout: &Layout, overwrite: bool, tui: bool) -> anyhow::Result<()> {
    if tui {
        println!(
            "{bar}\n{name:^40}\n{bar}",
            bar = "=".repeat(40),
            name = "Unify"
        );
    }
    let summary = dfp::unify::unify(layout, overwrite, tui).await?;
    if tui {
        println!(
            "{} files unified into {:?} ({} archives, {} corrupt, {} rejected, {} already present)",
            summary.moved,
            layout.unified_dir,
            summary.archives,
            summary.corrupt,
            summary.rejected,
            summary.conflicts
        );
    }

    match dfp::unify::files_by_year(&layout.unified_dir) {
        Ok(years) => {
            for (year, count) in years {
                info!("{year}: {count} files");
                if tui {
                    println!("{year}: {count}");
                }
            }
        }
        Err(err) => error!("failed to count files by year, error({err})"),
    }

    Ok(())
}

/// Aggregate the unified files into the statement datasets.
pub(crate) async fn build(layout: &Layout, limit: Option<usize>, tui: bool) -> anyhow::Result<()> {
    if tui {
        println!(
            "{bar}\n{name:^40}\n{bar}",
            bar = "=".repeat(40),
            name = "Datasets"
        );
    }
    let layout = layout.clone();
    tokio::task::spawn_blocking(move || dfp::datasets::create_csv_files(&layout, limit, tui))
        .await??;
    Ok(())
}

/// Upload the reviewed datasets.
pub(crate) async fn load(pool: &Pool, layout: &Layout, tui: bool) -> anyhow::Result<()> {
    if tui {
        println!(
            "{bar}\n{name:^40}\n{bar}",
            bar = "=".repeat(40),
            name = "Upload"
        );
    }
    let tables = dfp::load::load(pool, &layout.dataset_dir, tui).await?;
    debug!("tables loaded: {tables:?}");
    Ok(())
}
