//! Weighted legal-move mobility.

use gambit_core::{PieceKind, Position};

/// Per-move weight in tenths of a centipawn, indexed by [`PieceKind::index`].
///
/// Knights have few moves at best, so each one counts for more.
const MOBILITY_WEIGHT: [i32; PieceKind::COUNT] = [0, 105, 25, 30, 20, 0];

/// Weighted legal-move count for the side to move, in tenths.
fn weighted_moves(pos: &Position) -> i32 {
    pos.legal_moves(false)
        .iter()
        .map(|mv| MOBILITY_WEIGHT[PieceKind::from_role(mv.role()).index()])
        .sum()
}

/// Mobility difference from the side to move's perspective.
///
/// The opponent's mobility is measured by passing the turn. When the turn
/// cannot be passed (side to move in check) the term is zero for both sides.
pub fn mobility(pos: &mut Position) -> i32 {
    let ours = weighted_moves(pos);
    let Some(passed) = pos.skip_turn() else {
        return 0;
    };
    let theirs = weighted_moves(&passed);
    (ours - theirs) / 10
}
