//! Search and evaluation for gambit.

pub mod config;
pub mod error;
pub mod eval;
pub mod search;
pub mod time;

pub use config::SearchConfig;
pub use error::ConfigError;
pub use eval::evaluate;
pub use search::control::SearchControl;
pub use search::negamax::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY};
pub use search::{SearchResult, Searcher};
pub use time::compute_limits;
