use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://teastallbd.netlify.app";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_APP_NAME: &str = "Tea Stall BD";
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Runtime settings, read from the environment (and `.env` via dotenvy in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub session_key: Option<String>,
    pub public_base_url: String,
    pub share_base_url: String,
    pub upload_dir: PathBuf,
    pub app_name: String,
    pub admin_username: String,
    pub admin_password: String,
    pub cookie_secure: bool,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has invalid value '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cookie_secure = match get("COOKIE_SECURE").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("yes") => true,
            Some("0") | Some("false") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "COOKIE_SECURE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Config {
            bind_addr: or("BIND_ADDR", DEFAULT_BIND_ADDR),
            database_url,
            session_key: get("SESSION_KEY"),
            public_base_url: or("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL),
            share_base_url: or("SHARE_BASE_URL", DEFAULT_SHARE_BASE_URL),
            upload_dir: PathBuf::from(or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            app_name: or("APP_NAME", DEFAULT_APP_NAME),
            admin_username: or("ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
            admin_password: or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            cookie_secure,
        })
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}
