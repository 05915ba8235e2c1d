//! Catalog service client.
//!
//! # Architecture
//!
//! The catalog is a managed PostgREST endpoint (Supabase-style). This crate is
//! a thin pass-through: each operation builds one [`query::Query`], sends it
//! through the [`retry`] policy, and decodes the JSON rows into
//! [`storefront_types`] records.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`CatalogClient::list_products`] | `GET products?select=*,categories(name,slug)`, or `select=*,categories!inner(name,slug)&categories.slug=eq.<slug>` |
//! | [`CatalogClient::get_product`] | `GET products?select=...&id=eq.<id>` as a single object |
//! | [`CatalogClient::recommended_products`] | `GET products?select=*&category_id=eq.<c>&id=neq.<x>&limit=4` |
//!
//! Every request carries the anon key twice, as `apikey` and as a bearer token.
//!
//! # Error Handling
//!
//! Failures are returned as [`CatalogError`]. Screens convert them into a
//! [`storefront_core::LoadState`] at the call site; nothing here touches the cart.

pub mod query;
pub mod retry;

use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

use storefront_core::LoadFailure;
use storefront_core::errors::format_catalog_error;
use storefront_types::{CategoryId, Product, ProductId};

use query::Query;
use retry::{RetryConfig, RetryOutcome};

/// Maximum number of related products shown on a detail page.
pub const RECOMMENDATION_LIMIT: usize = 4;

const REST_PATH: &str = "rest/v1/";

const PRODUCT_COLUMNS: &str = "*,categories(name,slug)";
// `!inner` turns the embedded filter into a row filter.
const PRODUCT_COLUMNS_IN_CATEGORY: &str = "*,categories!inner(name,slug)";

const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// PostgREST error code for a malformed value (e.g. a non-uuid id).
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// The public (anon) API key of the catalog project.
#[derive(Clone)]
pub struct AnonKey(String);

impl AnonKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

// Manual Debug impl to prevent leaking the key in logs.
impl fmt::Debug for AnonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnonKey([REDACTED])")
    }
}

/// Where the catalog lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    rest_url: Url,
    anon_key: AnonKey,
    timeout: Duration,
    retry: RetryConfig,
}

impl CatalogConfig {
    /// `base_url` is the project URL (`https://xyz.supabase.co`); the REST
    /// path is appended here.
    pub fn new(base_url: &str, anon_key: impl Into<String>) -> Result<Self, CatalogError> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidConfig(
                "catalog URL is not set".to_string(),
            ));
        }

        let mut base = Url::parse(trimmed)
            .map_err(|e| CatalogError::InvalidConfig(format!("invalid catalog URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidConfig(format!(
                "catalog URL must be http or https, got {}",
                base.scheme()
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join(REST_PATH)
            .map_err(|e| CatalogError::InvalidConfig(format!("invalid catalog URL: {e}")))?;

        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(CatalogError::InvalidConfig(
                "catalog anon key is not set".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key: AnonKey::new(anon_key.trim()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn rest_url(&self) -> &Url {
        &self.rest_url
    }

    #[must_use]
    pub fn anon_key(&self) -> &AnonKey {
        &self.anon_key
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("record not found")]
    NotFound,
    #[error("catalog returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("catalog request failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read catalog response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("invalid catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid catalog configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Degrade to a view state. `what` names the thing being loaded.
    #[must_use]
    pub fn into_load_failure(self, what: &str) -> LoadFailure {
        match self {
            Self::NotFound => LoadFailure::NotFound,
            Self::Http { status, body } => {
                LoadFailure::Failed(format_catalog_error(what, Some(status.as_u16()), &body))
            }
            other => LoadFailure::Failed(format_catalog_error(what, None, &other.to_string())),
        }
    }
}

impl From<CatalogError> for LoadFailure {
    fn from(err: CatalogError) -> Self {
        err.into_load_failure("catalog data")
    }
}

/// Client for the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// All products, optionally restricted to a category slug.
    ///
    /// The slug is matched lowercased; an empty slug means no filter.
    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let slug = category
            .map(|raw| raw.trim().to_lowercase())
            .filter(|slug| !slug.is_empty());

        let query = match slug {
            Some(slug) => Query::from("products")
                .select(PRODUCT_COLUMNS_IN_CATEGORY)
                .eq("categories.slug", slug),
            None => Query::from("products").select(PRODUCT_COLUMNS),
        };

        self.fetch(&query).await
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let query = Query::from("products")
            .select(PRODUCT_COLUMNS)
            .eq("id", id)
            .single();

        self.fetch(&query).await
    }

    /// Up to [`RECOMMENDATION_LIMIT`] other products from the same category.
    pub async fn recommended_products(
        &self,
        category_id: &CategoryId,
        exclude: &ProductId,
    ) -> Result<Vec<Product>, CatalogError> {
        let query = Query::from("products")
            .select("*")
            .eq("category_id", category_id)
            .neq("id", exclude)
            .limit(RECOMMENDATION_LIMIT);

        self.fetch(&query).await
    }

    async fn fetch<T>(&self, query: &Query) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let url = self
            .config
            .rest_url
            .join(query.table())
            .map_err(|e| CatalogError::InvalidConfig(format!("invalid table path: {e}")))?;

        tracing::debug!(table = query.table(), params = ?query.params(), "Catalog request");

        let build_request = || {
            let request = self.http.get(url.clone()).query(query.params());
            if query.is_single() {
                request.header(ACCEPT, SINGLE_OBJECT_MEDIA_TYPE)
            } else {
                request
            }
        };

        let response = match retry::send_with_retry(build_request, &self.config.retry).await {
            RetryOutcome::Success(response) => response,
            RetryOutcome::HttpError(response) => {
                let status = response.status();
                let body = read_capped_error_body(response).await;
                if query.is_single() && is_missing_row(status, &body) {
                    tracing::debug!(table = query.table(), %status, "Catalog row not found");
                    return Err(CatalogError::NotFound);
                }
                tracing::warn!(table = query.table(), %status, "Catalog request failed");
                return Err(CatalogError::Http { status, body });
            }
            RetryOutcome::ConnectionError { attempts, source } => {
                tracing::warn!(table = query.table(), attempts, error = %source, "Catalog unreachable");
                return Err(CatalogError::Transport { attempts, source });
            }
        };

        let bytes = response.bytes().await.map_err(CatalogError::Body)?;
        let decoded = serde_json::from_slice(&bytes).inspect_err(|e| {
            tracing::warn!(table = query.table(), %e, payload_bytes = bytes.len(), "Invalid catalog payload");
        })?;
        Ok(decoded)
    }
}

fn build_http_client(config: &CatalogConfig) -> Result<reqwest::Client, CatalogError> {
    let key = config.anon_key.expose_secret();
    let invalid_key = |_| CatalogError::InvalidConfig("anon key is not a valid header value".into());

    let mut apikey = HeaderValue::from_str(key).map_err(invalid_key)?;
    apikey.set_sensitive(true);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?;
    bearer.set_sensitive(true);

    let mut default_headers = HeaderMap::new();
    default_headers.insert("apikey", apikey);
    default_headers.insert(AUTHORIZATION, bearer);

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
        .default_headers(default_headers)
        .build()
        .map_err(|e| CatalogError::InvalidConfig(format!("failed to build HTTP client: {e}")))
}

/// A single-object request that matched no row.
///
/// PostgREST answers 406 when the row count is not exactly one, and 400 with
/// code 22P02 when the id cannot be parsed for the column type.
fn is_missing_row(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_ACCEPTABLE {
        return true;
    }
    status == StatusCode::BAD_REQUEST
        && serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|payload| {
                payload
                    .get("code")
                    .and_then(serde_json::Value::as_str)
                    .map(|code| code == INVALID_TEXT_REPRESENTATION)
            })
            .unwrap_or(false)
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
