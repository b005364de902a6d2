//! Game phase from remaining non-pawn material.

use gambit_core::{Color, PieceKind, Position};

/// Non-pawn material at or above which the phase is pure opening.
pub const OPENING_MATERIAL: i32 = 3500;

/// Phase weight of each piece kind, indexed by [`PieceKind::index`].
const PHASE_WEIGHT: [i32; PieceKind::COUNT] = [0, 350, 350, 525, 1000, 0];

/// Knight, bishop, rook, and queen material for one side.
pub fn non_pawn_material(pos: &Position, color: Color) -> i32 {
    PieceKind::ALL
        .iter()
        .map(|&kind| pos.count(color, kind) as i32 * PHASE_WEIGHT[kind.index()])
        .sum()
}

/// Game phase in `[0.0, 1.0]`: 0.0 with plenty of pieces left, 1.0 with
/// bare kings and pawns.
pub fn game_phase(pos: &Position) -> f32 {
    let total = non_pawn_material(pos, Color::White) + non_pawn_material(pos, Color::Black);
    1.0 - (total as f32 / OPENING_MATERIAL as f32).min(1.0)
}
