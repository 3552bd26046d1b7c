//! TMDB-backed metadata provider over blocking HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;

use crate::error::{EnrichError, Result};
use crate::provider::{Category, Detail, MetadataProvider, MovieDetail, SeriesDetail};

/// Default TMDB REST API base.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default poster image base (w500 renditions).
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`TmdbProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key sent as the `api_key` query parameter.
    pub api_key: Option<String>,
    /// REST API base, without trailing slash.
    pub base_url: String,
    /// Prefix prepended to relative poster paths.
    pub image_base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TmdbConfig {
    /// Create a new configuration with default settings and no API key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TMDB_API_KEY`, `TMDB_BASE_URL` and
    /// `TMDB_IMAGE_BASE_URL` when set and non-empty.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self {
            api_key: var("TMDB_API_KEY"),
            ..Self::default()
        };
        if let Some(base_url) = var("TMDB_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(image_base_url) = var("TMDB_IMAGE_BASE_URL") {
            config = config.with_image_base_url(image_base_url);
        }
        config
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the REST API base.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the poster image base.
    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchHit>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: u64,
}

/// Metadata provider backed by the TMDB v3 REST API.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    config: TmdbConfig,
    http: Client,
}

impl TmdbProvider {
    /// Creates a provider with a client that enforces `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::Http` if the HTTP client cannot be built.
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("reelmatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    /// Get the provider configuration.
    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    /// Returns `true` if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(EnrichError::MissingApiKey)?;
        let url = self.endpoint(path);

        trace!(url = %url, "provider request");
        // The request URL carries the API key; keep it out of error messages.
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().map_err(reqwest::Error::without_url)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl MetadataProvider for TmdbProvider {
    fn search(&self, category: Category, title: &str) -> Result<Vec<u64>> {
        let response: SearchResponse = self.get_json(
            &format!("search/{}", category.path()),
            &[("query", title)],
        )?;
        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|hit| hit.id)
            .collect())
    }

    fn detail(&self, category: Category, id: u64) -> Result<Detail> {
        let path = format!("{}/{id}", category.path());
        let params = [("append_to_response", "credits")];
        Ok(match category {
            Category::Movie => Detail::Movie(self.get_json::<MovieDetail>(&path, &params)?),
            Category::Tv => Detail::Series(self.get_json::<SeriesDetail>(&path, &params)?),
        })
    }

    fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.config.image_base_url,
            poster_path.trim_start_matches('/')
        )
    }
}
