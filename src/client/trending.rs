use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::MovieSummary;

#[derive(Debug, thiserror::Error)]
pub enum TrendingError {
    #[error("trending store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("trending store data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    pub poster_url: String,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait TrendingStore: Send + Sync {
    async fn update_search_count(
        &self,
        term: &str,
        movie: &MovieSummary,
    ) -> Result<(), TrendingError>;

    async fn top_searches(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError>;
}

#[derive(Debug, Default, Clone)]
struct Counters {
    entries: HashMap<String, TrendingEntry>,
}

impl Counters {
    fn from_entries(entries: Vec<TrendingEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.search_term.clone(), entry))
                .collect(),
        }
    }

    fn bump(&mut self, term: &str, movie: &MovieSummary) {
        let next_id = self.entries.len() + 1;
        let now = Utc::now();
        let entry = self
            .entries
            .entry(term.to_string())
            .and_modify(|entry| {
                entry.count += 1;
                entry.updated_at = now;
            })
            .or_insert_with(|| TrendingEntry {
                id: format!("term-{next_id}"),
                search_term: term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: movie.poster_url(),
                title: movie.title.clone(),
                updated_at: now,
            });
        debug!(term, count = entry.count, "recorded search");
    }

    fn ranked(&self) -> Vec<TrendingEntry> {
        let mut ranked: Vec<TrendingEntry> = self.entries.values().cloned().collect();
        ranked.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
                .then_with(|| a.search_term.cmp(&b.search_term))
        });
        ranked
    }

    fn top(&self, limit: usize) -> Vec<TrendingEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        ranked
    }
}

#[derive(Debug, Default)]
pub struct MemoryTrendingStore {
    counters: Mutex<Counters>,
}

impl MemoryTrendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrendingStore for MemoryTrendingStore {
    async fn update_search_count(
        &self,
        term: &str,
        movie: &MovieSummary,
    ) -> Result<(), TrendingError> {
        self.counters.lock().await.bump(term, movie);
        Ok(())
    }

    async fn top_searches(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
        Ok(self.counters.lock().await.top(limit))
    }
}

#[derive(Debug)]
pub struct FileTrendingStore {
    path: PathBuf,
    counters: Mutex<Counters>,
}

impl FileTrendingStore {
    /// Opens `path`, starting empty if the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, TrendingError> {
        let path = path.as_ref().to_path_buf();
        let counters = match fs::read(&path).await {
            Ok(bytes) => Counters::from_entries(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Counters::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), entries = counters.entries.len(), "opened trending store");
        Ok(Self {
            path,
            counters: Mutex::new(counters),
        })
    }

    async fn persist(&self, counters: &Counters) -> Result<(), TrendingError> {
        let bytes = serde_json::to_vec_pretty(&counters.ranked())?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, bytes).await?;
        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TrendingStore for FileTrendingStore {
    async fn update_search_count(
        &self,
        term: &str,
        movie: &MovieSummary,
    ) -> Result<(), TrendingError> {
        let mut counters = self.counters.lock().await;
        let mut next = counters.clone();
        next.bump(term, movie);
        self.persist(&next).await?;
        *counters = next;
        Ok(())
    }

    async fn top_searches(&self, limit: usize) -> Result<Vec<TrendingEntry>, TrendingError> {
        Ok(self.counters.lock().await.top(limit))
    }
}
