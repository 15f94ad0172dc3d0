//! TMDB (The Movie Database) catalog client.
//!
//! Implements [`CatalogClient`] against the TMDB v3 REST API.
//!
//! - The API key is fetched from the [`CredentialSource`] before every
//!   request; a missing key short-circuits with
//!   [`FetchError::MissingCredential`] and no network traffic.
//! - Requests are bounded by the configured timeout (15 seconds by default),
//!   which surfaces as [`FetchError::Unreachable`].
//! - No retries. A failed request is reported once.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use movieskyy_common::{CatalogMode, CatalogPage};
use tracing::{debug, warn};

use super::credentials::{CredentialSource, EnvFileCredentials};
use super::{CatalogClient, FetchError};
use crate::config::TmdbConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const SEARCH_PATH: &str = "/search/movie";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// TMDB catalog client.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use movieskyy::catalog::{StaticCredentials, TmdbCatalogClient};
///
/// let client = TmdbCatalogClient::builder(Arc::new(StaticCredentials::new("key")))
///     .language("en-US")
///     .build()
///     .unwrap();
/// ```
pub struct TmdbCatalogClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
    credentials: Arc<dyn CredentialSource>,
}

impl std::fmt::Debug for TmdbCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbCatalogClient")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbCatalogClient {
    pub fn builder(credentials: Arc<dyn CredentialSource>) -> TmdbCatalogClientBuilder {
        TmdbCatalogClientBuilder {
            base_url: TMDB_BASE_URL.to_string(),
            language: "id-ID".to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials,
        }
    }

    /// Build a client whose key is read from the configured env file.
    pub fn from_config(config: &TmdbConfig) -> anyhow::Result<Self> {
        let credentials = EnvFileCredentials::new(&config.env_file, &config.api_key_var);
        Self::builder(Arc::new(credentials))
            .base_url(&config.base_url)
            .language(&config.language)
            .timeout(config.timeout())
            .build()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Map a catalog mode to its endpoint path and extra query parameters.
    fn endpoint(mode: &CatalogMode) -> Result<(&'static str, Option<&str>), FetchError> {
        match mode {
            CatalogMode::Category { value } => Ok((value.upstream_path(), None)),
            CatalogMode::Search { query } => {
                let query = query.trim();
                if query.is_empty() {
                    return Err(FetchError::InvalidQuery);
                }
                Ok((SEARCH_PATH, Some(query)))
            }
        }
    }
}

pub struct TmdbCatalogClientBuilder {
    base_url: String,
    language: String,
    timeout: Duration,
    credentials: Arc<dyn CredentialSource>,
}

impl TmdbCatalogClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> anyhow::Result<TmdbCatalogClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(TmdbCatalogClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            language: self.language,
            credentials: self.credentials,
        })
    }
}

#[async_trait]
impl CatalogClient for TmdbCatalogClient {
    fn has_credential(&self) -> bool {
        self.credentials.api_key().is_some()
    }

    async fn fetch_catalog(
        &self,
        mode: &CatalogMode,
        page: u32,
    ) -> Result<CatalogPage, FetchError> {
        let api_key = self
            .credentials
            .api_key()
            .ok_or(FetchError::MissingCredential)?;

        let (path, query) = Self::endpoint(mode)?;
        let url = format!("{}{path}", self.base_url);
        let page = page.max(1).to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", api_key.as_str()),
            ("page", page.as_str()),
            ("language", self.language.as_str()),
        ];
        if let Some(query) = query {
            params.push(("query", query));
        }

        debug!(url = %url, mode = %mode, page = %page, "TMDB catalog request");

        let resp = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "TMDB request failed");
                if e.is_timeout() {
                    FetchError::Unreachable(format!("request timed out: {url}"))
                } else {
                    FetchError::Unreachable(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "TMDB returned an error status");
            return Err(FetchError::UpstreamRejected {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<CatalogPage>()
            .await
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}
