use std::path::PathBuf;

/// Failures when reading the unified statement files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no {kind} files found in {dir:?}")]
    NoFiles { kind: &'static str, dir: PathBuf },

    #[error("invalid entity code {value:?} in {path:?}")]
    EntityCode { value: String, path: PathBuf },

    #[error("invalid period end date {value:?} in {path:?}")]
    PeriodEnd { value: String, path: PathBuf },

    #[error("failed to build worker pool: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
