use std::env;
use std::fmt;
use std::net::SocketAddr;

use anyhow::{Context, anyhow};
use url::Url;

const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3/";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Application configuration driven by environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub upstream: UpstreamConfig,
}

/// Everything needed to reach the metadata service. Never echoed back to clients.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: String,
    pub base_url: Url,
    pub proxy_url: Option<Url>,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("proxy_url", &self.proxy_url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = non_empty("TMDB_API_KEY")
            .or_else(|| non_empty("VITE_TMDB_API_KEY"))
            .ok_or_else(|| anyhow!("TMDB_API_KEY must be set"))?;

        let base_url = non_empty("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url).context("parsing TMDB_BASE_URL")?;

        let proxy_url = non_empty("FLICKS_PROXY_URL")
            .map(|value| Url::parse(&value))
            .transpose()
            .context("parsing FLICKS_PROXY_URL")?;

        let bind_addr: SocketAddr = non_empty("FLICKS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("parsing FLICKS_BIND_ADDR")?;

        Ok(Self {
            bind_addr,
            upstream: UpstreamConfig {
                api_key,
                base_url,
                proxy_url,
            },
        })
    }
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
