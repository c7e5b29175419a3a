use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::fmt;
use std::path::PathBuf;

// Default timeout functions
fn default_db_connect_timeout() -> u64 {
  5
}

fn default_db_acquire_timeout() -> u64 {
  3
}

fn default_session_ttl() -> u64 {
  86_400
}

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Which of the two services is being configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
  Catalog,
  Auth,
}

impl AppKind {
  /// Name used for the per-app config file (`config/<name>.toml`)
  pub fn name(&self) -> &'static str {
    match self {
      AppKind::Catalog => "catalog",
      AppKind::Auth => "auth",
    }
  }

  fn default_database(&self) -> &'static str {
    match self {
      AppKind::Catalog => "books_collection",
      AppKind::Auth => "users",
    }
  }

  fn default_port(&self) -> i64 {
    match self {
      AppKind::Catalog => 5000,
      AppKind::Auth => 5001,
    }
  }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub server: ServerConfig,
  pub database: DatabaseConfig,
  pub security: SecurityConfig,
  pub download: DownloadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  pub templates_dir: String,
}

/// Database configuration
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  /// Read from `DB_PASSWORD`
  #[serde(default)]
  pub password: Option<String>,
  pub name: String,
  pub max_connections: u32,
  #[serde(default = "default_db_connect_timeout")]
  pub connect_timeout_seconds: u64,
  #[serde(default = "default_db_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
  /// Connection options for sqlx; the password never goes through a URL string
  pub fn connect_options(&self) -> PgConnectOptions {
    let options = PgConnectOptions::new()
      .host(&self.host)
      .port(self.port)
      .username(&self.username)
      .database(&self.name);

    match &self.password {
      Some(password) => options.password(password),
      None => options,
    }
  }

  /// `host:port/name`, safe to log
  pub fn display_target(&self) -> String {
    format!("{}:{}/{}", self.host, self.port, self.name)
  }
}

impl fmt::Debug for DatabaseConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DatabaseConfig")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "***"))
      .field("name", &self.name)
      .field("max_connections", &self.max_connections)
      .field("connect_timeout_seconds", &self.connect_timeout_seconds)
      .field("acquire_timeout_seconds", &self.acquire_timeout_seconds)
      .finish()
  }
}

/// Security configuration
#[derive(Clone, Deserialize)]
pub struct SecurityConfig {
  /// Key for signing session cookies, read from `SESSION_SECRET`.
  /// When absent a random key is generated at startup.
  #[serde(default)]
  pub session_secret: Option<String>,
  #[serde(default = "default_session_ttl")]
  pub session_ttl_seconds: u64,
  #[serde(default)]
  pub secure_cookies: bool,
  /// Argon2 memory cost in KiB
  pub argon2_memory_kib: u32,
  /// Argon2 time cost (iterations)
  pub argon2_iterations: u32,
  pub argon2_parallelism: u32,
}

impl SecurityConfig {
  /// Session lifetime in seconds, checked against `MAX_SESSION_TTL_SECONDS`
  pub fn session_ttl(&self) -> Result<i64, ConfigError> {
    if self.session_ttl_seconds == 0 || self.session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
      return Err(ConfigError::Message(format!(
        "security.session_ttl_seconds must be between 1 and {}, got {}",
        MAX_SESSION_TTL_SECONDS, self.session_ttl_seconds
      )));
    }

    i64::try_from(self.session_ttl_seconds).map_err(|e| ConfigError::Message(e.to_string()))
  }
}

impl fmt::Debug for SecurityConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SecurityConfig")
      .field("session_secret", &self.session_secret.as_ref().map(|_| "***"))
      .field("session_ttl_seconds", &self.session_ttl_seconds)
      .field("secure_cookies", &self.secure_cookies)
      .field("argon2_memory_kib", &self.argon2_memory_kib)
      .field("argon2_iterations", &self.argon2_iterations)
      .field("argon2_parallelism", &self.argon2_parallelism)
      .finish()
  }
}

/// Protected download configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
  pub directory: String,
  pub file_name: String,
}

impl DownloadConfig {
  pub fn path(&self) -> PathBuf {
    PathBuf::from(&self.directory).join(&self.file_name)
  }
}

impl Config {
  /// Load configuration for one of the services
  ///
  /// Sources, later ones override earlier ones:
  /// 1. built-in defaults (database name and port depend on `app`)
  /// 2. config/default.toml
  /// 3. config/catalog.toml or config/auth.toml
  /// 4. config/local.toml
  /// 5. environment variables with the LIBRIS_ prefix
  /// 6. `DB_PASSWORD` and `SESSION_SECRET`
  ///
  /// # Environment Variables
  ///
  /// Nested keys are separated by double underscores:
  /// - `LIBRIS_SERVER__PORT=8080`
  /// - `LIBRIS_DATABASE__HOST=db.internal`
  /// - `LIBRIS_SECURITY__SESSION_TTL_SECONDS=3600`
  /// - `LIBRIS_DOWNLOAD__DIRECTORY=/srv/files`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if a file contains invalid TOML, a value has
  /// the wrong type or the session lifetime is out of range.
  pub fn load(app: AppKind) -> Result<Self, ConfigError> {
    let config = ConfigBuilder::builder()
      .set_default("server.host", "127.0.0.1")?
      .set_default("server.port", app.default_port())?
      .set_default("server.templates_dir", "templates")?
      .set_default("database.host", "localhost")?
      .set_default("database.port", 5432)?
      .set_default("database.username", "postgres")?
      .set_default("database.name", app.default_database())?
      .set_default("database.max_connections", 5)?
      .set_default("security.argon2_memory_kib", 19_456)?
      .set_default("security.argon2_iterations", 2)?
      .set_default("security.argon2_parallelism", 1)?
      .set_default("download.directory", "static/files")?
      .set_default("download.file_name", "cheat_sheet.pdf")?
      .add_source(File::with_name("config/default").required(false))
      .add_source(File::with_name(&format!("config/{}", app.name())).required(false))
      .add_source(File::with_name("config/local").required(false))
      // LIBRIS_SERVER__PORT=8080
      .add_source(
        Environment::with_prefix("LIBRIS")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .set_override_option("database.password", env::var("DB_PASSWORD").ok())?
      .set_override_option("security.session_secret", env::var("SESSION_SECRET").ok())?
      .build()?;

    let config: Config = config.try_deserialize()?;
    config.security.session_ttl()?;

    Ok(config)
  }

  /// The catalog service refuses to start without a database password
  pub fn require_database_password(&self) -> Result<(), ConfigError> {
    match self.database.password.as_deref() {
      Some(password) if !password.is_empty() => Ok(()),
      _ => Err(ConfigError::Message(
        "No DB_PASSWORD set for the catalog application".to_string(),
      )),
    }
  }
}
