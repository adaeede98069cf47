use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, error, trace};

/// Environment variable holding the PostgreSQL connection string.
pub const CONNECTION_VAR: &str = "DB_CONNECTION_STRING";

/// Upper bound of simultaneously open connections.
pub const MAX_CONNECTIONS: usize = 20;

/// Create the connection pool for `url`.
///
/// Connections are opened lazily, on first checkout, and returned to the pool when the checked
/// out object is dropped. Call [`Pool::close`] at shutdown.
pub fn connect(url: &str) -> anyhow::Result<Pool> {
    trace!("creating postgres connection pool config");
    let mut pg_config = Config::new();
    pg_config.url = Some(url.to_string());
    pg_config.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pg_config.pool = Some(PoolConfig::new(MAX_CONNECTIONS));

    trace!("creating connection pool");
    let pool = pg_config
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|err| {
            error!("failed to create connection pool, error({err})");
            err
        })?;
    debug!("connection pool established");

    Ok(pool)
}

/// Create the connection pool from the [`CONNECTION_VAR`] environment variable.
pub fn connect_from_env() -> anyhow::Result<Pool> {
    let url = crate::http::var(CONNECTION_VAR)
        .map_err(|err| anyhow::anyhow!("environment variable {CONNECTION_VAR}: {err}"))?;
    connect(&url)
}

/// Quote `ident` as a PostgreSQL identifier.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
