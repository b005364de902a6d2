//! Negamax alpha-beta search with quiescence.
//!
//! Both searches are fail-hard: the returned score always lies within the
//! `[alpha, beta]` window they were called with. Once the control signals a
//! stop, `ctx.cancelled` is latched and every frame unwinds returning 0
//! without touching the killer, best-move, or transposition tables.

use gambit_core::{Move, PackedMove, Position};

use crate::config::SearchConfig;
use crate::eval::evaluate;
use crate::search::control::SearchControl;
use crate::search::heuristics::KillerTable;
use crate::search::ordering::MovePicker;
use crate::search::tt::{Bound, TranspositionTable};

/// Bound no score can reach.
pub const INF: i32 = 1_000_000;

/// Score of delivering mate at the root. Mate found `n` plies deep scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 100_000;

/// Scores beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: i32 = 99_000;

/// Depth of the per-ply tables; also the recursion ceiling.
pub const MAX_PLY: usize = 128;

const DRAW: i32 = 0;

/// Best move found so far at each ply.
///
/// Written when a move raises alpha, read back as the prioritized move when
/// the transposition table has no hint.
pub struct BestMoveTable {
    moves: Vec<Option<Move>>,
}

impl BestMoveTable {
    /// One empty slot per ply up to [`MAX_PLY`].
    pub fn new() -> Self {
        Self {
            moves: vec![None; MAX_PLY],
        }
    }

    /// Best move recorded at `ply`, if any.
    pub fn get(&self, ply: usize) -> Option<&Move> {
        self.moves.get(ply).and_then(Option::as_ref)
    }

    /// Record `mv` at `ply`; ignored past [`MAX_PLY`].
    pub fn set(&mut self, ply: usize, mv: &Move) {
        if let Some(slot) = self.moves.get_mut(ply) {
            *slot = Some(mv.clone());
        }
    }
}

impl Default for BestMoveTable {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every frame of one search.
pub(super) struct SearchContext<'a> {
    pub nodes: u64,
    pub cancelled: bool,
    pub tt: &'a mut TranspositionTable,
    pub config: &'a SearchConfig,
    pub control: &'a SearchControl,
    pub killers: KillerTable,
    pub best_moves: BestMoveTable,
}

impl<'a> SearchContext<'a> {
    pub fn new(tt: &'a mut TranspositionTable, config: &'a SearchConfig, control: &'a SearchControl) -> Self {
        Self {
            nodes: 0,
            cancelled: false,
            tt,
            config,
            control,
            killers: KillerTable::new(),
            best_moves: BestMoveTable::new(),
        }
    }
}

fn is_quiet(mv: &Move) -> bool {
    !mv.is_capture() && !mv.is_promotion()
}

/// Negamax alpha-beta search.
///
/// Returns the score of `pos` for the side to move, clamped to
/// `[alpha, beta]`. At ply 0 the best move is left in `ctx.best_moves`.
pub(super) fn negamax(
    pos: &mut Position,
    mut depth: u8,
    ply: u8,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if ctx.cancelled || ctx.control.should_stop(ctx.nodes) {
        ctx.cancelled = true;
        return DRAW;
    }

    if pos.is_checkmate() {
        return (-MATE_SCORE + ply as i32).clamp(alpha, beta);
    }

    if ply > 0 && pos.is_draw() {
        return DRAW.clamp(alpha, beta);
    }

    if ply as usize >= MAX_PLY - 1 {
        return evaluate(pos).clamp(alpha, beta);
    }

    if depth == 0 {
        // Never stand pat while in check: search the evasions one ply deeper.
        if !pos.is_in_check() {
            return qsearch(pos, ply, alpha, beta, ctx);
        }
        depth = 1;
    }

    let hash = pos.hash();
    let mut hint = PackedMove::NULL;
    if ctx.config.use_tt {
        if let Some(entry) = ctx.tt.probe(hash, ply) {
            hint = entry.best_move;
            // The root always searches so it has a move to report.
            if ply > 0 && entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score.clamp(alpha, beta),
                    Bound::LowerBound if entry.score >= beta => return beta,
                    Bound::UpperBound if entry.score <= alpha => return alpha,
                    _ => {}
                }
            }
        }
    }

    let moves = pos.legal_moves(false);
    if moves.is_empty() {
        // Checkmate was handled above, so this is stalemate.
        return DRAW.clamp(alpha, beta);
    }

    let priority = if hint.is_null() {
        ctx.best_moves
            .get(ply as usize)
            .map_or(PackedMove::NULL, PackedMove::new)
    } else {
        hint
    };
    let killers = if ctx.config.use_killers {
        ctx.killers.at(ply as usize)
    } else {
        [PackedMove::NULL; 2]
    };

    let mut best: Option<PackedMove> = None;
    for mv in MovePicker::new(moves, pos, priority, killers) {
        let score = {
            let mut child = pos.play(&mv);
            -negamax(&mut child, depth - 1, ply + 1, -beta, -alpha, ctx)
        };

        if ctx.cancelled {
            return DRAW;
        }

        if score >= beta {
            if ctx.config.use_killers && is_quiet(&mv) {
                ctx.killers.store(ply as usize, &mv);
            }
            if ctx.config.use_tt {
                ctx.tt.store(hash, depth, beta, PackedMove::new(&mv), Bound::LowerBound, ply);
            }
            return beta;
        }

        if score > alpha {
            alpha = score;
            ctx.best_moves.set(ply as usize, &mv);
            best = Some(PackedMove::new(&mv));
        }
    }

    if ctx.config.use_tt {
        // A fail-low keeps whatever hint the slot already had.
        let (bound, stored) = match best {
            Some(mv) => (Bound::Exact, mv),
            None => (Bound::UpperBound, hint),
        };
        ctx.tt.store(hash, depth, alpha, stored, bound, ply);
    }

    alpha
}

/// Quiescence search: captures only (all evasions when in check), with a
/// stand-pat floor from the static evaluation.
pub(super) fn qsearch(
    pos: &mut Position,
    ply: u8,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if ctx.cancelled || ctx.control.poll(ctx.nodes) {
        ctx.cancelled = true;
        return DRAW;
    }

    if pos.is_repetition() {
        return DRAW.clamp(alpha, beta);
    }

    let in_check = pos.is_in_check();
    let moves = pos.legal_moves(!in_check);
    if in_check && moves.is_empty() {
        return (-MATE_SCORE + ply as i32).clamp(alpha, beta);
    }

    let stand_pat = evaluate(pos);
    if ply as usize >= MAX_PLY - 1 {
        return stand_pat.clamp(alpha, beta);
    }
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    for mv in MovePicker::new_quiescence(moves, pos) {
        let score = {
            let mut child = pos.play(&mv);
            -qsearch(&mut child, ply + 1, -beta, -alpha, ctx)
        };

        if ctx.cancelled {
            return DRAW;
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use super::*;

    fn infinite() -> SearchControl {
        SearchControl::new_infinite(Arc::new(AtomicBool::new(false)))
    }

    fn plain_config() -> SearchConfig {
        SearchConfig {
            use_tt: false,
            use_killers: false,
            ..SearchConfig::default()
        }
    }

    /// Exhaustive minimax with the same leaf rules as [`negamax`].
    fn minimax(pos: &mut Position, mut depth: u8, ply: u8, ctx: &mut SearchContext<'_>) -> i32 {
        if pos.is_checkmate() {
            return -MATE_SCORE + ply as i32;
        }
        if ply > 0 && pos.is_draw() {
            return DRAW;
        }
        if depth == 0 {
            if !pos.is_in_check() {
                return qsearch(pos, ply, -INF, INF, ctx);
            }
            depth = 1;
        }
        let moves = pos.legal_moves(false);
        if moves.is_empty() {
            return DRAW;
        }
        moves
            .iter()
            .map(|mv| {
                let mut child = pos.play(mv);
                -minimax(&mut child, depth - 1, ply + 1, ctx)
            })
            .max()
            .unwrap_or(DRAW)
    }

    fn search(fen: &str, depth: u8, config: &SearchConfig) -> (i32, u64) {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut tt = TranspositionTable::with_entries(1 << 16);
        let control = infinite();
        let mut ctx = SearchContext::new(&mut tt, config, &control);
        let score = negamax(&mut pos, depth, 0, -INF, INF, &mut ctx);
        (score, ctx.nodes)
    }

    const POSITIONS: [&str; 4] = [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r1bqkbnr/pppp1ppp/2n5/4p3/3PP3/5N2/PPP2PPP/RNBQKB1R b KQkq - 0 3",
        "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1",
        "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1",
    ];

    #[test]
    fn alpha_beta_matches_minimax() {
        let config = plain_config();
        for fen in POSITIONS {
            for depth in 1..=2u8 {
                let (ab, _) = search(fen, depth, &config);

                let mut pos = Position::from_fen(fen).unwrap();
                let mut tt = TranspositionTable::with_entries(1);
                let control = infinite();
                let mut ctx = SearchContext::new(&mut tt, &config, &control);
                let reference = minimax(&mut pos, depth, 0, &mut ctx);

                assert_eq!(ab, reference, "{fen} at depth {depth}");
            }
        }
    }

    #[test]
    fn killers_do_not_change_score() {
        let fen = POSITIONS[1];
        let with = SearchConfig { use_killers: true, ..plain_config() };
        let (a, _) = search(fen, 3, &with);
        let (b, _) = search(fen, 3, &plain_config());
        assert_eq!(a, b);
    }

    #[test]
    fn table_never_changes_fixed_depth_score() {
        let with_tt = SearchConfig { use_tt: true, ..plain_config() };
        for fen in POSITIONS {
            for depth in 1..=4u8 {
                let (on, _) = search(fen, depth, &with_tt);
                let (off, _) = search(fen, depth, &plain_config());
                assert_eq!(on, off, "{fen} at depth {depth}");
            }
        }
    }

    /// Search `fen` as a ply-1 node whose table slot already holds `seed`.
    fn search_seeded(fen: &str, alpha: i32, beta: i32, seed: Option<(Bound, i32)>) -> i32 {
        let config = SearchConfig::default();
        let control = infinite();
        let mut pos = Position::from_fen(fen).unwrap();
        let mut tt = TranspositionTable::with_entries(1 << 12);
        if let Some((bound, score)) = seed {
            tt.store(pos.hash(), 8, score, PackedMove::NULL, bound, 1);
        }
        let mut ctx = SearchContext::new(&mut tt, &config, &control);
        negamax(&mut pos, 1, 1, alpha, beta, &mut ctx)
    }

    #[test]
    fn stored_bounds_cut_only_outside_the_window() {
        let fen = POSITIONS[2];
        let (alpha, beta) = (-1_000, 1_000);
        let searched = search_seeded(fen, alpha, beta, None);
        assert!(alpha < searched && searched < beta, "{searched}");

        // An upper bound above alpha or a lower bound below beta proves nothing.
        let upper = search_seeded(fen, alpha, beta, Some((Bound::UpperBound, alpha + 1)));
        let lower = search_seeded(fen, alpha, beta, Some((Bound::LowerBound, beta - 1)));
        assert_eq!(upper, searched);
        assert_eq!(lower, searched);

        let upper = search_seeded(fen, alpha, beta, Some((Bound::UpperBound, alpha)));
        let lower = search_seeded(fen, alpha, beta, Some((Bound::LowerBound, beta)));
        let exact = search_seeded(fen, alpha, beta, Some((Bound::Exact, 5 * beta)));
        assert_eq!(upper, alpha);
        assert_eq!(lower, beta);
        assert_eq!(exact, beta);
    }

    #[test]
    fn back_rank_mate_scores_as_mate_in_one() {
        let (score, _) = search(POSITIONS[3], 2, &SearchConfig::default());
        assert_eq!(score, MATE_SCORE - 1);
    }

    #[test]
    fn checkmated_root_scores_minus_mate() {
        let fen = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
        let (score, _) = search(fen, 3, &SearchConfig::default());
        assert_eq!(score, -MATE_SCORE);
    }

    #[test]
    fn stalemate_scores_zero() {
        let (score, _) = search("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3, &SearchConfig::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn qsearch_never_below_stand_pat() {
        let config = plain_config();
        let control = infinite();
        for fen in POSITIONS {
            let mut pos = Position::from_fen(fen).unwrap();
            let stand_pat = evaluate(&mut pos);
            let mut tt = TranspositionTable::with_entries(1);
            let mut ctx = SearchContext::new(&mut tt, &config, &control);
            let q = qsearch(&mut pos, 0, -INF, INF, &mut ctx);
            assert!(q >= stand_pat, "{fen}: {q} < {stand_pat}");
        }
    }

    #[test]
    fn qsearch_wins_hanging_queen() {
        let config = plain_config();
        let control = infinite();
        let mut pos = Position::from_fen(POSITIONS[2]).unwrap();
        let stand_pat = evaluate(&mut pos);
        let mut tt = TranspositionTable::with_entries(1);
        let mut ctx = SearchContext::new(&mut tt, &config, &control);
        let q = qsearch(&mut pos, 0, -INF, INF, &mut ctx);
        assert!(q > stand_pat + 800, "{q} vs {stand_pat}");
    }

    #[test]
    fn stopped_search_is_flagged_and_leaves_position() {
        let config = SearchConfig::default();
        let control = infinite().with_node_limit(50);
        let mut pos = Position::new();
        let before = pos.hash();
        let mut tt = TranspositionTable::with_entries(1 << 10);
        let mut ctx = SearchContext::new(&mut tt, &config, &control);
        let _ = negamax(&mut pos, 6, 0, -INF, INF, &mut ctx);
        assert!(ctx.cancelled);
        assert_eq!(pos.hash(), before);
        assert_eq!(pos.ply(), 0);
    }

    #[test]
    fn table_keeps_position_intact() {
        let config = SearchConfig::default();
        let control = infinite();
        let mut pos = Position::from_fen(POSITIONS[1]).unwrap();
        let before = pos.hash();
        let mut tt = TranspositionTable::with_entries(1 << 12);
        let mut ctx = SearchContext::new(&mut tt, &config, &control);
        let _ = negamax(&mut pos, 3, 0, -INF, INF, &mut ctx);
        assert_eq!(pos.hash(), before);
        assert!(ctx.best_moves.get(0).is_some());
    }
}
