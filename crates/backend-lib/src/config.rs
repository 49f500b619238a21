// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::{bail, Result};
use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `USERAUTH_STORE__POOL_SIZE`
pub const ENV_PREFIX: &str = "USERAUTH_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Read verbatim from the environment, never parsed as a typed value
const SECRET_ENV_KEY: &str = "jwt_secret";

/// Accept any scalar for a string setting, so `jwt_secret = 123456` still loads.
fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        UInt(u64),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::UInt(n) => n.to_string(),
        Scalar::Int(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level, overridden by `RUST_LOG` when set
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Shared secret for signing session tokens. Required.
    #[serde(deserialize_with = "scalar_as_string")]
    pub jwt_secret: String,
    /// Credential store settings
    pub store: StoreSettings,
    /// CORS settings
    pub cors: CorsSettings,
    /// Static file serving
    pub static_files: StaticFileSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Credential store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Root directory for all databases
    pub data_dir: PathBuf,
    /// Database (subdirectory) holding the collections
    pub database: String,
    /// Maximum number of concurrently checked-out store sessions
    pub pool_size: usize,
    /// How long a checkout may wait for a free session
    pub checkout_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Allowed origins; `*` allows any
    pub allow_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticFileSettings {
    /// URL prefix the directory is mounted under
    pub mount: String,
    /// Directory to serve; nothing is served when unset
    pub dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            jwt_secret: String::new(),
            store: StoreSettings::default(),
            cors: CorsSettings::default(),
            static_files: StaticFileSettings::default(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            database: "vuejs-login".to_string(),
            pool_size: 16,
            checkout_timeout_ms: 5000,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_credentials: true,
        }
    }
}

impl Default for StaticFileSettings {
    fn default() -> Self {
        Self {
            mount: "/map".to_string(),
            dir: None,
        }
    }
}

impl Settings {
    /// Load settings from defaults, `config.toml` if present, then the environment
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment().merge(Toml::file("config.toml")))
    }

    /// Load settings from an explicit TOML file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        Self::extract(Self::figment().merge(Toml::file(path)))
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let mut figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&[SECRET_ENV_KEY])
                .split("__"),
        );
        // figment parses env values ("007" -> 7, "\"x\"" -> x); the secret must stay as typed
        let secret_var = format!("{ENV_PREFIX}{}", SECRET_ENV_KEY.to_uppercase());
        if let Some(secret) = Env::var(&secret_var) {
            figment = figment.merge(Serialized::default(SECRET_ENV_KEY, secret));
        }
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("jwt_secret must be set (env {ENV_PREFIX}JWT_SECRET)");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log_level {:?}", self.log_level);
        }
        if self.store.pool_size == 0 {
            bail!("store.pool_size must be at least 1");
        }
        if self.store.checkout_timeout_ms == 0 {
            bail!("store.checkout_timeout_ms must be at least 1");
        }
        let database = &self.store.database;
        if database.is_empty()
            || database == "."
            || database.contains("..")
            || database.contains(['/', '\\'])
        {
            bail!("store.database must be a plain directory name, got {database:?}");
        }
        for origin in &self.cors.allow_origins {
            if origin != "*" && HeaderValue::from_str(origin).is_err() {
                bail!("invalid CORS origin {origin:?}");
            }
        }
        let mount = &self.static_files.mount;
        if !mount.starts_with('/') || mount.ends_with('/') {
            bail!("static_files.mount must start with '/' and not end with one");
        }
        Ok(())
    }

    /// Directory holding this deployment's collections
    pub fn database_path(&self) -> PathBuf {
        self.store.data_dir.join(&self.store.database)
    }
}
