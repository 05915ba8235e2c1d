//! Storefront configuration.
//!
//! Settings live in `~/.storefront/config.toml`:
//!
//! ```toml
//! [catalog]
//! url = "https://xyz.supabase.co"
//! anon_key = "${SUPABASE_ANON_KEY}"
//! timeout_seconds = 15
//! max_retries = 0
//!
//! [app]
//! currency_symbol = "$"
//! ```
//!
//! `${VAR}` references are expanded from the environment, and
//! `STOREFRONT_CATALOG_URL` / `STOREFRONT_CATALOG_KEY` take precedence over the
//! file.

use serde::Deserialize;
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const CATALOG_URL_ENV: &str = "STOREFRONT_CATALOG_URL";
pub const CATALOG_KEY_ENV: &str = "STOREFRONT_CATALOG_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Default, Deserialize)]
pub struct StorefrontConfig {
    pub catalog: Option<CatalogSection>,
    pub app: Option<AppSection>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct CatalogSection {
    /// Project URL; the REST path is appended by the client.
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Extra attempts for transient failures. Default: 0.
    pub max_retries: Option<u32>,
}

// Manual Debug impl to prevent leaking the anon key in logs.
impl fmt::Debug for CatalogSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSection")
            .field("url", &self.url)
            .field("anon_key", &mask(self.anon_key.as_deref()))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSection {
    pub currency_symbol: Option<String>,
}

/// Catalog settings after env expansion and overrides.
#[derive(Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("url", &self.url)
            .field("anon_key", &mask(self.anon_key.as_deref()))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn mask(value: Option<&str>) -> &'static str {
    if value.is_some() { "[REDACTED]" } else { "None" }
}

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables expand to the empty string; an unterminated `${` is kept
/// literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    expand_with(value, |var| env::var(var).ok())
}

fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else { break };

        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty()
            && let Some(replacement) = lookup(var)
        {
            out.push_str(&replacement);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl StorefrontConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn catalog_settings(&self) -> CatalogSettings {
        self.resolve_catalog(|var| env::var(var).ok())
    }

    fn resolve_catalog(&self, lookup: impl Fn(&str) -> Option<String>) -> CatalogSettings {
        let section = self.catalog.as_ref();
        let resolve = |env_name: &str, from_file: Option<&String>| {
            lookup(env_name)
                .or_else(|| from_file.map(|raw| expand_with(raw, &lookup)))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        CatalogSettings {
            url: resolve(CATALOG_URL_ENV, section.and_then(|c| c.url.as_ref())),
            anon_key: resolve(CATALOG_KEY_ENV, section.and_then(|c| c.anon_key.as_ref())),
            timeout: Duration::from_secs(
                section
                    .and_then(|c| c.timeout_seconds)
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            max_retries: section.and_then(|c| c.max_retries).unwrap_or(0),
        }
    }

    #[must_use]
    pub fn currency_symbol(&self) -> &str {
        self.app
            .as_ref()
            .and_then(|app| app.currency_symbol.as_deref())
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".storefront").join("config.toml"))
}
