use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query as AxumQuery, State};
use serde_json::Value;
use tracing::{debug, instrument};

use super::state::AppState;
use super::types::{ApiError, MovieSearchParams};

const MOVIES_ERROR: &str = "Failed to fetch data from TMDB";
const RECOMMENDATIONS_ERROR: &str = "Failed to fetch recommendation data";
const VIDEOS_ERROR: &str = "Failed to fetch trailer data";

pub async fn healthz() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
pub async fn list_movies(
    State(state): State<AppState>,
    AxumQuery(params): AxumQuery<MovieSearchParams>,
) -> Result<Json<Value>, ApiError> {
    let result = match params.search_term() {
        Some(query) => {
            debug!(query, "searching movies by title");
            state.tmdb.search_movies(query).await
        }
        None => {
            debug!("listing popular movies");
            state.tmdb.discover_popular().await
        }
    };

    result
        .map(Json)
        .map_err(|err| ApiError::upstream(MOVIES_ERROR, err))
}

#[instrument(skip_all)]
pub async fn recommendations(
    State(state): State<AppState>,
    AxumQuery(params): AxumQuery<MovieSearchParams>,
) -> Result<Json<Value>, ApiError> {
    let token = params
        .first_token()
        .ok_or_else(|| ApiError::bad_request("query parameter is required"))?;
    debug!(token, "searching recommendations by first token");

    state
        .tmdb
        .search_movies(token)
        .await
        .map(Json)
        .map_err(|err| ApiError::upstream(RECOMMENDATIONS_ERROR, err))
}

#[instrument(skip_all, fields(movie_id = tracing::field::Empty))]
pub async fn movie_videos(
    State(state): State<AppState>,
    movie_id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(movie_id) = movie_id.map_err(|rejection| {
        debug!(%rejection, "rejecting movie id");
        ApiError::bad_request("invalid movie id")
    })?;
    tracing::Span::current().record("movie_id", movie_id);

    state
        .tmdb
        .movie_videos(movie_id)
        .await
        .map(Json)
        .map_err(|err| ApiError::upstream(VIDEOS_ERROR, err))
}
