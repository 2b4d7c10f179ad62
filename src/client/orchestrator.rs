use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::models::MovieSummary;

use super::api::{ClientError, MovieApi};
use super::debounce::Debouncer;
use super::state::{Generation, RecordSearch, SearchState};
use super::trailer::{self, TrailerOutcome};
use super::trending::{TrendingEntry, TrendingStore};

pub const SETTLE_DELAY: Duration = Duration::from_millis(500);
pub const TRENDING_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
#[error("search orchestrator has stopped")]
pub struct OrchestratorClosed;

#[derive(Debug)]
enum Command {
    SetQuery(String),
    SelectMovie(u64),
    DismissTrailer,
    DismissNotice,
}

enum Completion {
    Movies {
        generation: Generation,
        result: Result<Vec<MovieSummary>, ClientError>,
    },
    Trailer {
        generation: Generation,
        outcome: TrailerOutcome,
    },
    Trending(Vec<TrendingEntry>),
}

pub struct SearchOrchestrator {
    api: Arc<dyn MovieApi>,
    trending: Arc<dyn TrendingStore>,
    settle_delay: Duration,
    trending_limit: usize,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn MovieApi>, trending: Arc<dyn TrendingStore>) -> Self {
        Self {
            api,
            trending,
            settle_delay: SETTLE_DELAY,
            trending_limit: TRENDING_LIMIT,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_trending_limit(mut self, limit: usize) -> Self {
        self.trending_limit = limit;
        self
    }

    pub fn spawn(self) -> SearchHandle {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(SearchState::default());
        let task = tokio::spawn(self.run(commands_rx, state_tx));
        SearchHandle {
            commands: commands_tx,
            state: state_rx,
            task,
        }
    }

    async fn run(
        self,
        mut commands: mpsc::Receiver<Command>,
        state_tx: watch::Sender<SearchState>,
    ) {
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(self.settle_delay, settled_tx);
        let mut state = SearchState::default();

        self.start_fetch(&mut state, String::new(), &done_tx);
        self.load_trending(&done_tx);
        publish(&state_tx, &state);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command, &mut state, &mut debouncer, &done_tx);
                }
                Some(settled) = settled_rx.recv() => {
                    if !debouncer.is_current(&settled) {
                        debug!(generation = settled.generation, "ignoring superseded timer");
                    } else if settled.value != state.debounced_query {
                        self.start_fetch(&mut state, settled.value, &done_tx);
                    }
                }
                Some(completion) = done_rx.recv() => {
                    self.handle_completion(completion, &mut state);
                }
            }
            publish(&state_tx, &state);
        }

        debug!("search orchestrator stopped");
    }

    fn handle_command(
        &self,
        command: Command,
        state: &mut SearchState,
        debouncer: &mut Debouncer<String>,
        done: &mpsc::UnboundedSender<Completion>,
    ) {
        match command {
            Command::SetQuery(query) => {
                state.set_query(query.clone());
                debouncer.schedule(query);
            }
            Command::SelectMovie(movie_id) => {
                let generation = state.begin_trailer_lookup();
                let api = Arc::clone(&self.api);
                let done = done.clone();
                tokio::spawn(async move {
                    let outcome = trailer::resolve(api.fetch_videos(movie_id).await);
                    let _ = done.send(Completion::Trailer {
                        generation,
                        outcome,
                    });
                });
            }
            Command::DismissTrailer => state.dismiss_trailer(),
            Command::DismissNotice => state.dismiss_notice(),
        }
    }

    fn handle_completion(&self, completion: Completion, state: &mut SearchState) {
        match completion {
            Completion::Movies { generation, result } => {
                if let Some(record) = state.finish_fetch(generation, result) {
                    self.record_search(record);
                }
            }
            Completion::Trailer {
                generation,
                outcome,
            } => state.finish_trailer_lookup(generation, outcome),
            Completion::Trending(entries) => state.set_trending(entries),
        }
    }

    fn start_fetch(
        &self,
        state: &mut SearchState,
        query: String,
        done: &mpsc::UnboundedSender<Completion>,
    ) {
        let generation = state.begin_fetch(query.clone());
        debug!(?generation, query = %query, "fetching movies");

        let api = Arc::clone(&self.api);
        let done = done.clone();
        tokio::spawn(async move {
            let term = (!query.is_empty()).then_some(query.as_str());
            let result = api.fetch_movies(term).await;
            let _ = done.send(Completion::Movies { generation, result });
        });
    }

    fn record_search(&self, record: RecordSearch) {
        let store = Arc::clone(&self.trending);
        tokio::spawn(async move {
            if let Err(err) = store.update_search_count(&record.term, &record.movie).await {
                warn!(error = %err, term = %record.term, "failed to update search count");
            }
        });
    }

    fn load_trending(&self, done: &mpsc::UnboundedSender<Completion>) {
        let store = Arc::clone(&self.trending);
        let limit = self.trending_limit;
        let done = done.clone();
        tokio::spawn(async move {
            match store.top_searches(limit).await {
                Ok(entries) => {
                    let _ = done.send(Completion::Trending(entries));
                }
                Err(err) => error!(error = %err, "error fetching trending movies"),
            }
        });
    }
}

fn publish(state_tx: &watch::Sender<SearchState>, state: &SearchState) {
    state_tx.send_if_modified(|current| {
        if *current == *state {
            return false;
        }
        *current = state.clone();
        true
    });
}

pub struct SearchHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl SearchHandle {
    pub async fn set_query(&self, query: impl Into<String>) -> Result<(), OrchestratorClosed> {
        self.send(Command::SetQuery(query.into())).await
    }

    pub async fn select_movie(&self, movie_id: u64) -> Result<(), OrchestratorClosed> {
        self.send(Command::SelectMovie(movie_id)).await
    }

    pub async fn dismiss_trailer(&self) -> Result<(), OrchestratorClosed> {
        self.send(Command::DismissTrailer).await
    }

    pub async fn dismiss_notice(&self) -> Result<(), OrchestratorClosed> {
        self.send(Command::DismissNotice).await
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(err) = self.task.await {
            error!(error = %err, "search orchestrator task failed");
        }
    }

    async fn send(&self, command: Command) -> Result<(), OrchestratorClosed> {
        self.commands
            .send(command)
            .await
            .map_err(|_| OrchestratorClosed)
    }
}
