use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;

use crate::tmdb::TmdbClient;

use super::handlers::{healthz, list_movies, movie_videos, recommendations};

#[derive(Clone)]
pub struct AppState {
    pub(crate) tmdb: Arc<TmdbClient>,
}

impl AppState {
    pub fn new(tmdb: TmdbClient) -> Self {
        Self {
            tmdb: Arc::new(tmdb),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/movies", get(list_movies))
        .route("/api/movies/recommendations", get(recommendations))
        .route("/api/movies/{id}/videos", get(movie_videos))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
