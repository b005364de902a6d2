//! Iterative deepening driver.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod tt;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gambit_core::{Move, Position, to_uci};
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::time::compute_limits;
use control::SearchControl;
use negamax::{INF, MATE_THRESHOLD, SearchContext, negamax};
use ordering::MovePicker;
use tt::TranspositionTable;

/// Outcome of [`Searcher::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Root move of the deepest completed iteration. `None` only when the
    /// root has no legal moves.
    pub best_move: Option<Move>,
    /// Score of the deepest completed iteration, side to move's perspective.
    pub score: i32,
    /// Deepest completed iteration, 0 if none completed.
    pub depth: u8,
    /// Nodes visited, including those of a discarded iteration.
    pub nodes: u64,
    /// Wall-clock time from control creation to return.
    pub elapsed: Duration,
}

/// Owns the transposition table across moves of a game.
pub struct Searcher {
    tt: TranspositionTable,
    config: SearchConfig,
}

impl Searcher {
    /// Searcher with the default configuration.
    pub fn new() -> Self {
        let config = SearchConfig::default();
        Self {
            tt: TranspositionTable::new(config.tt_mb),
            config,
        }
    }

    /// Searcher with a validated custom configuration.
    pub fn with_config(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            tt: TranspositionTable::new(config.tt_mb),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Forget everything learned, e.g. between games.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Pick a move within `budget` of wall-clock time.
    pub fn select_move(&mut self, pos: &mut Position, budget: Duration) -> Option<Move> {
        let control = SearchControl::new_timed(Arc::new(AtomicBool::new(false)), budget, budget);
        self.search(pos, self.config.depth_cap(), &control, |_, _, _, _| {})
            .best_move
    }

    /// Pick a move spending a share of the remaining game clock.
    pub fn select_move_with_clock(
        &mut self,
        pos: &mut Position,
        remaining: Duration,
        increment: Duration,
    ) -> Option<Move> {
        let (soft, hard) = compute_limits(remaining, increment, self.config.budget_divisor);
        let control = SearchControl::new_timed(Arc::new(AtomicBool::new(false)), soft, hard);
        self.search(pos, self.config.depth_cap(), &control, |_, _, _, _| {})
            .best_move
    }

    /// Run iterative deepening up to `max_depth`.
    ///
    /// `on_iter(depth, score, nodes, best_move)` fires after each completed
    /// iteration. An iteration cut short by `control` is discarded; the
    /// result always reflects the deepest one that finished.
    pub fn search<F>(
        &mut self,
        pos: &mut Position,
        max_depth: u8,
        control: &SearchControl,
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &Move),
    {
        let max_depth = max_depth.clamp(1, (negamax::MAX_PLY - 1) as u8);
        let mut ctx = SearchContext::new(&mut self.tt, &self.config, control);

        let mut completed_move: Option<Move> = None;
        let mut completed_score = 0;
        let mut completed_depth: u8 = 0;

        for depth in 1..=max_depth {
            if depth > 1 && control.should_stop_iterating() {
                break;
            }

            let score = negamax(pos, depth, 0, -INF, INF, &mut ctx);

            if ctx.cancelled {
                debug!(depth, nodes = ctx.nodes, "iteration cut short, discarded");
                break;
            }

            completed_move = ctx.best_moves.get(0).cloned();
            completed_score = score;
            completed_depth = depth;

            let Some(best) = &completed_move else {
                // Terminal root: nothing to deepen.
                break;
            };

            debug!(
                depth,
                score,
                nodes = ctx.nodes,
                best = %to_uci(best),
                elapsed_ms = control.elapsed().as_millis() as u64,
                hashfull = ctx.tt.hashfull(),
                "iteration complete"
            );
            on_iter(depth, score, ctx.nodes, best);

            if score.abs() > MATE_THRESHOLD {
                break;
            }
        }

        let nodes = ctx.nodes;

        if completed_depth == 0 {
            completed_move = MovePicker::new_quiescence(pos.legal_moves(false), pos).next();
            if let Some(mv) = &completed_move {
                warn!(
                    fallback = %to_uci(mv),
                    "no iteration completed, playing first ordered move"
                );
            }
        }

        SearchResult {
            best_move: completed_move,
            score: completed_score,
            depth: completed_depth,
            nodes,
            elapsed: control.elapsed(),
        }
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt_entries", &self.tt.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use gambit_core::PackedMove;

    use super::*;

    fn infinite() -> SearchControl {
        SearchControl::new_infinite(Arc::new(AtomicBool::new(false)))
    }

    fn search_depth(searcher: &mut Searcher, fen: &str, depth: u8) -> SearchResult {
        search_depth_with(searcher, fen, depth, |_, _, _, _| {})
    }

    fn search_depth_with<F>(searcher: &mut Searcher, fen: &str, depth: u8, on_iter: F) -> SearchResult
    where
        F: FnMut(u8, i32, u64, &Move),
    {
        let mut pos = Position::from_fen(fen).unwrap();
        searcher.search(&mut pos, depth, &infinite(), on_iter)
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let mut searcher = Searcher::new();
        let pos = Position::new();
        let result = search_depth(&mut searcher, gambit_core::STARTING_FEN, 1);
        let best = result.best_move.unwrap();
        assert!(pos.legal_moves(false).contains(&best));
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn stalemate_result_is_none() {
        let mut searcher = Searcher::new();
        let result = search_depth(&mut searcher, "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 4);
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn checkmate_result_is_none() {
        let mut searcher = Searcher::new();
        let result = search_depth(
            &mut searcher,
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            4,
        );
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, -negamax::MATE_SCORE);
    }

    #[test]
    fn callback_fires_once_per_completed_depth() {
        let mut searcher = Searcher::new();
        let mut pos = Position::new();
        let mut depths = Vec::new();
        let result = searcher.search(&mut pos, 4, &infinite(), |depth, _, _, mv| {
            assert!(!PackedMove::new(mv).is_null());
            depths.push(depth);
        });
        assert_eq!(depths, vec![1, 2, 3, 4]);
        assert_eq!(result.depth, 4);
    }

    #[test]
    fn aborted_iteration_keeps_previous_result() {
        let mut first = Searcher::new();
        let reference = search_depth(&mut first, gambit_core::STARTING_FEN, 3);

        // Allow exactly the nodes depth 3 needed; depth 4 is cut at its first node.
        let mut second = Searcher::new();
        let mut pos = Position::new();
        let control = infinite().with_node_limit(reference.nodes);
        let result = second.search(&mut pos, 20, &control, |_, _, _, _| {});

        assert_eq!(result.depth, 3);
        assert_eq!(result.best_move, reference.best_move);
        assert_eq!(result.score, reference.score);
        assert_eq!(pos.hash(), Position::new().hash());
    }

    #[test]
    fn cut_inside_iteration_reports_previous_depth() {
        let fens = [
            gambit_core::STARTING_FEN,
            "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3",
            "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
        ];
        let mut changed_mind = false;

        for fen in fens {
            let mut completed = Vec::new();
            search_depth_with(&mut Searcher::new(), fen, 4, |depth, score, nodes, mv| {
                completed.push((depth, score, nodes, mv.clone()));
            });
            assert_eq!(completed.len(), 4, "{fen}");

            for pair in completed.windows(2) {
                let (depth, score, nodes, mv) = &pair[0];
                let next = &pair[1];
                changed_mind |= *mv != next.3;

                // Every limit lands strictly inside the next iteration.
                let span = next.2 - nodes;
                for step in 1..8 {
                    let limit = nodes + span * step / 8;
                    let mut pos = Position::from_fen(fen).unwrap();
                    let control = infinite().with_node_limit(limit);
                    let result = Searcher::new().search(&mut pos, 20, &control, |_, _, _, _| {});

                    assert_eq!(result.depth, *depth, "{fen} limit {limit}");
                    assert_eq!(result.best_move.as_ref(), Some(mv), "{fen} limit {limit}");
                    assert_eq!(result.score, *score, "{fen} limit {limit}");
                    assert!(result.nodes > *nodes);
                    assert_eq!(pos.ply(), 0);
                }
            }
        }
        assert!(changed_mind, "no deeper iteration picked a different move");
    }

    #[test]
    fn no_completed_depth_falls_back_to_ordered_move() {
        let mut searcher = Searcher::new();
        let mut pos = Position::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let control = infinite().with_node_limit(0);
        let result = searcher.search(&mut pos, 10, &control, |_, _, _, _| {});
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_move.map(|mv| to_uci(&mv)).as_deref(), Some("e4d5"));
    }

    #[test]
    fn with_config_rejects_invalid() {
        let config = SearchConfig { tt_mb: 0, ..SearchConfig::default() };
        assert_eq!(Searcher::with_config(config).unwrap_err(), ConfigError::ZeroTableSize);
    }

    #[test]
    fn clear_tt_keeps_results_identical() {
        let mut searcher = Searcher::new();
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3";
        let a = search_depth(&mut searcher, fen, 4);
        searcher.clear_tt();
        let b = search_depth(&mut searcher, fen, 4);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn select_move_returns_legal_move() {
        let mut searcher = Searcher::new();
        let mut pos = Position::new();
        let mv = searcher.select_move(&mut pos, Duration::from_millis(50)).unwrap();
        assert!(pos.legal_moves(false).contains(&mv));
        assert_eq!(pos.ply(), 0);
    }
}
