//! Upstream client for the TMDB v3 API.
//!
//! Every call goes out through the configured forward proxy with the API key
//! attached as a query parameter. Responses are handed back as raw JSON so the
//! proxy can relay them untouched.

use anyhow::Context;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::UpstreamConfig;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to TMDB failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("TMDB responded with status {0}")]
    Status(StatusCode),
    #[error("TMDB response was not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid upstream path: {0}")]
    Path(#[from] url::ParseError),
}

pub struct TmdbClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url.as_str())
                .with_context(|| format!("configuring proxy {proxy_url}"))?;
            builder = builder.proxy(proxy);
        } else {
            // Only the configured egress is allowed; ignore HTTP_PROXY and friends.
            builder = builder.no_proxy();
        }

        let http = builder.build().context("building upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Title search; used for both the main search and the recommendation fallback.
    pub async fn search_movies(&self, query: &str) -> Result<Value, UpstreamError> {
        self.get_json("search/movie", &[("query", query)]).await
    }

    pub async fn discover_popular(&self) -> Result<Value, UpstreamError> {
        self.get_json("discover/movie", &[("sort_by", "popularity.desc")])
            .await
    }

    pub async fn movie_videos(&self, movie_id: u64) -> Result<Value, UpstreamError> {
        self.get_json(&format!("movie/{movie_id}/videos"), &[]).await
    }

    #[instrument(skip(self, params))]
    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = self.base_url.join(path)?;

        debug!("forwarding request upstream");

        // reqwest errors carry the request URL, which includes the api key.
        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| UpstreamError::Transport(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| UpstreamError::Decode(err.without_url()))
    }
}
