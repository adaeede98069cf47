mod error;
pub use error::Error;

/// Filesystem helpers; downloading, unzipping and reading Latin-1 `.csv` files.
pub mod fs;

/// PostgreSQL connection pool, built once at startup and handed to whatever needs it.
pub mod pg;

/// Yearly standardized financial statements (DFP) of Brazilian listed companies, published by
/// the [CVM].
///
/// [CVM]: https://dados.cvm.gov.br/dataset/cia_aberta-doc-dfp
pub mod dfp;

pub(crate) mod tui;

/// Shortcut for required API elements.
pub(crate) mod http {
    pub(crate) use dotenv::var;
    pub(crate) use reqwest::Client as HttpClient;
}

use http::*;

const DEFAULT_USER_AGENT: &str = concat!("cvm-spider/", env!("CARGO_PKG_VERSION"));

/// Build the standard HTTP client; the user agent is read from `USER_AGENT`, if set.
pub fn std_client_build() -> anyhow::Result<HttpClient> {
    let user_agent = var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Human readable time since `time`, for log lines.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!("time elapsed: {:.2}s", time.elapsed().as_secs_f64())
}
