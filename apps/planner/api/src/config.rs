use core_config::{AppInfo, FromEnv, app_info, env_parse, http::HttpConfig, server::ServerConfig};
use database::{RetryConfig, postgres::PostgresConfig};

pub use core_config::Environment;

/// Application-specific configuration, composed from the shared config pieces.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    /// Backoff for the startup connection (`DB_CONNECT_RETRIES`, `DB_RETRY_*`)
    pub retry: RetryConfig,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - DATABASE_URL
        let retry = RetryConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Defaults: HOST=0.0.0.0, PORT=8080
        let http = HttpConfig::from_env()?;
        let run_migrations = env_parse("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            retry,
            server,
            http,
            environment,
            run_migrations,
        })
    }
}
