//! Search configuration knobs.

use crate::error::ConfigError;
use crate::search::negamax::MAX_PLY;

/// Tunable search parameters.
///
/// Transposition table and killer moves are both optional refinements:
/// disabling them changes only how fast a result is found, never which
/// score a fixed-depth search returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Transposition table size in megabytes.
    pub tt_mb: usize,
    /// Deepest iteration the driver will start.
    pub max_depth: u8,
    /// Per-move budget is `remaining / budget_divisor` when playing on a clock.
    pub budget_divisor: u32,
    /// Probe and store the transposition table.
    pub use_tt: bool,
    /// Record and order killer moves.
    pub use_killers: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tt_mb: 16,
            max_depth: 64,
            budget_divisor: 30,
            use_tt: true,
            use_killers: true,
        }
    }
}

impl SearchConfig {
    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tt_mb == 0 {
            return Err(ConfigError::ZeroTableSize);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.budget_divisor == 0 {
            return Err(ConfigError::ZeroBudgetDivisor);
        }
        Ok(())
    }

    /// The depth cap actually used, bounded by the ply tables.
    pub fn depth_cap(&self) -> u8 {
        self.max_depth.min((MAX_PLY - 1) as u8)
    }
}
