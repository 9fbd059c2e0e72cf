//! Configuration management
//!
//! The whole process shares one [`Config`], built once in `main` and handed
//! to the router and the store by value. Nothing reads the environment after
//! startup.

use std::fmt;

use sqlx::postgres::PgConnectOptions;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default request body limit (16 MiB), sized for large batches.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Default database host.
pub const DEFAULT_DATABASE_HOST: &str = "localhost";

/// Default database port.
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// Default database user.
pub const DEFAULT_DATABASE_USER: &str = "postgres";

/// Default database name.
pub const DEFAULT_DATABASE_NAME: &str = "parameters";

/// Default CORS allowed origin.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "*";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub max_body_bytes: usize,
}

/// Where the store lives
///
/// Either a full `DATABASE_URL` or the discrete connection fields.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl DatabaseConfig {
    /// Connection options for a single, unpooled connection
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        let options = match &self.url {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {e}"))?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.dbname),
        };

        Ok(options.application_name("pdi-server"))
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from `.env` (if present), the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Unset keys fall back to defaults; set keys that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            server: ServerConfig {
                host: lookup("PDI_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
                port: parse_var(&lookup, "PDI_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: parse_var(&lookup, "PDI_SHUTDOWN_TIMEOUT")?
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
                max_body_bytes: parse_var(&lookup, "PDI_MAX_BODY_BYTES")?
                    .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
                host: lookup("PDI_DB_HOST").unwrap_or_else(|| DEFAULT_DATABASE_HOST.to_string()),
                port: parse_var(&lookup, "PDI_DB_PORT")?.unwrap_or(DEFAULT_DATABASE_PORT),
                user: lookup("PDI_DB_USER").unwrap_or_else(|| DEFAULT_DATABASE_USER.to_string()),
                password: lookup("PDI_DB_PASSWORD").unwrap_or_default(),
                dbname: lookup("PDI_DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                allow_credentials: parse_var(&lookup, "CORS_ALLOW_CREDENTIALS")?.unwrap_or(false),
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.max_body_bytes == 0 {
            anyhow::bail!("PDI_MAX_BODY_BYTES must be greater than 0");
        }

        if self.database.url.is_none() {
            if self.database.host.trim().is_empty() {
                anyhow::bail!("Database host cannot be empty");
            }
            if self.database.dbname.trim().is_empty() {
                anyhow::bail!("Database name cannot be empty");
            }
        }

        let wildcard = self.cors.allowed_origins.is_empty()
            || self.cors.allowed_origins.iter().any(|o| o == "*");
        if wildcard && self.cors.allow_credentials {
            anyhow::bail!("CORS credentials cannot be combined with a wildcard origin");
        }

        Ok(())
    }

    /// `host:port` the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            database: DatabaseConfig {
                url: None,
                host: DEFAULT_DATABASE_HOST.to_string(),
                port: DEFAULT_DATABASE_PORT,
                user: DEFAULT_DATABASE_USER.to_string(),
                password: String::new(),
                dbname: DEFAULT_DATABASE_NAME.to_string(),
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: false,
            },
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid value '{raw}' for {key}: {e}"))
        })
        .transpose()
}
