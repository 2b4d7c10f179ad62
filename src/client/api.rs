use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::models::{ErrorBody, MovieListResponse, MovieSummary, Video, VideoListResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to proxy failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("proxy responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("proxy response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid proxy url: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn fetch_movies(&self, query: Option<&str>) -> Result<Vec<MovieSummary>, ClientError>;

    async fn fetch_videos(&self, movie_id: u64) -> Result<Vec<Video>, ClientError>;
}

pub struct HttpMovieApi {
    http: Client,
    base_url: Url,
}

impl HttpMovieApi {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment of a base without a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// Looser search keyed on the first word of `query`. Not part of the typed search flow.
    pub async fn fetch_recommendations(
        &self,
        query: &str,
    ) -> Result<Vec<MovieSummary>, ClientError> {
        let url = self.base_url.join("api/movies/recommendations")?;
        let response: MovieListResponse = self.get_json(url, &[("query", query)]).await?;
        Ok(response.results)
    }

    async fn get_json<T>(&self, url: Url, params: &[(&str, &str)]) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "proxy request failed".to_string());
            return Err(ClientError::Status { status, message });
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn fetch_movies(&self, query: Option<&str>) -> Result<Vec<MovieSummary>, ClientError> {
        let url = self.base_url.join("api/movies")?;
        let params: Vec<(&str, &str)> = query.map(|q| ("query", q)).into_iter().collect();
        let response: MovieListResponse = self.get_json(url, &params).await?;
        Ok(response.results)
    }

    async fn fetch_videos(&self, movie_id: u64) -> Result<Vec<Video>, ClientError> {
        let url = self
            .base_url
            .join(&format!("api/movies/{movie_id}/videos"))?;
        let response: VideoListResponse = self.get_json(url, &[]).await?;
        Ok(response.results)
    }
}
