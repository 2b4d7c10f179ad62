use tracing::{debug, error};

use crate::models::MovieSummary;

use super::api::ClientError;
use super::trailer::{TRAILER_NOT_AVAILABLE, TrailerOutcome};
use super::trending::TrendingEntry;

pub const GENERIC_ERROR: &str = "Something went wrong. Please try again later.";

pub fn no_results_message(query: &str) -> String {
    format!("\"{query}\" movie is not available or try to spell correct.")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(Vec<MovieSummary>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSearch {
    pub term: String,
    pub movie: MovieSummary,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub debounced_query: String,
    pub fetch: FetchState,
    pub trailer_key: Option<String>,
    pub trending: Vec<TrendingEntry>,
    pub notice: Option<String>,
    movies_generation: Generation,
    trailer_generation: Generation,
}

impl SearchState {
    pub fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub fn begin_fetch(&mut self, debounced_query: String) -> Generation {
        self.debounced_query = debounced_query;
        self.fetch = FetchState::Loading;
        self.movies_generation = self.movies_generation.next();
        self.movies_generation
    }

    pub fn finish_fetch(
        &mut self,
        generation: Generation,
        result: Result<Vec<MovieSummary>, ClientError>,
    ) -> Option<RecordSearch> {
        if generation != self.movies_generation {
            debug!(?generation, current = ?self.movies_generation, "discarding stale movie list");
            return None;
        }

        let query = self.debounced_query.as_str();
        match result {
            Ok(movies) if movies.is_empty() && !query.is_empty() => {
                self.fetch = FetchState::Error(no_results_message(query));
                None
            }
            Ok(movies) => {
                let record = match movies.first() {
                    Some(first) if !query.is_empty() => Some(RecordSearch {
                        term: query.to_string(),
                        movie: first.clone(),
                    }),
                    _ => None,
                };
                self.fetch = FetchState::Success(movies);
                record
            }
            Err(err) => {
                error!(error = %err, query, "error fetching movies");
                self.fetch = FetchState::Error(GENERIC_ERROR.to_string());
                None
            }
        }
    }

    pub fn begin_trailer_lookup(&mut self) -> Generation {
        self.trailer_generation = self.trailer_generation.next();
        self.trailer_generation
    }

    pub fn finish_trailer_lookup(&mut self, generation: Generation, outcome: TrailerOutcome) {
        if generation != self.trailer_generation {
            debug!(?generation, "discarding stale trailer lookup");
            return;
        }
        match outcome {
            TrailerOutcome::Found(key) => self.trailer_key = Some(key),
            TrailerOutcome::NotAvailable => {
                self.trailer_key = None;
                self.notice = Some(TRAILER_NOT_AVAILABLE.to_string());
            }
            TrailerOutcome::Failed => {}
        }
    }

    pub fn dismiss_trailer(&mut self) {
        self.trailer_key = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn set_trending(&mut self, entries: Vec<TrendingEntry>) {
        self.trending = entries;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.fetch, FetchState::Loading)
    }

    pub fn movies(&self) -> &[MovieSummary] {
        match &self.fetch {
            FetchState::Success(movies) => movies.as_slice(),
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.fetch {
            FetchState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}
