//! Engine configuration errors.

/// Errors raised when a [`SearchConfig`](crate::SearchConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The transposition table must hold at least one megabyte.
    #[error("transposition table size must be at least 1 MB")]
    ZeroTableSize,

    /// Iterative deepening needs at least one iteration.
    #[error("maximum search depth must be at least 1")]
    ZeroDepth,

    /// The per-move share of the remaining clock would divide by zero.
    #[error("time budget divisor must be at least 1")]
    ZeroBudgetDivisor,
}
