//! Material balance.

use gambit_core::{Color, PieceKind, Position};

use crate::eval::score::{S, Score};

/// Material values indexed by [`PieceKind::index`]. Kings carry no material.
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 110),   // Pawn
    S(350, 330),   // Knight
    S(360, 350),   // Bishop
    S(525, 560),   // Rook
    S(1000, 1050), // Queen
    S(0, 0),       // King
];

/// Material balance from White's perspective.
pub fn material(pos: &Position) -> Score {
    PieceKind::ALL.iter().fold(Score::ZERO, |acc, &kind| {
        let diff = pos.count(Color::White, kind) as i32 - pos.count(Color::Black, kind) as i32;
        acc + MATERIAL_VALUE[kind.index()] * diff
    })
}
