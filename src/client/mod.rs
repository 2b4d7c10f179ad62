pub mod api;
pub mod debounce;
pub mod orchestrator;
pub mod state;
pub mod trailer;
pub mod trending;

pub use api::{ClientError, HttpMovieApi, MovieApi};
pub use orchestrator::{OrchestratorClosed, SearchHandle, SearchOrchestrator};
pub use state::{FetchState, SearchState};
pub use trending::{FileTrendingStore, MemoryTrendingStore, TrendingEntry, TrendingStore};
