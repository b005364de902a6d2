//! Endgame drive: push pawns and bring pieces toward the enemy king.

use gambit_core::{Color, PieceKind, Position, Square};

/// Full bonus for a piece at distance zero; each step costs [`STEP`].
const BASE: i32 = 50;
const STEP: i32 = 10;

fn chebyshev(a: Square, b: Square) -> i32 {
    let files = (a.file() as i32 - b.file() as i32).abs();
    let ranks = (a.rank() as i32 - b.rank() as i32).abs();
    files.max(ranks)
}

/// Unscaled drive for `color`.
///
/// Pawns score by ranks left to promotion, rooks by the shorter of file or
/// rank distance to the enemy king (a rook on the king's line cuts it off),
/// every other piece by king distance.
pub fn drive(pos: &Position, color: Color) -> i32 {
    let Some(target) = pos.king_square(!color) else {
        return 0;
    };

    let mut total = 0;
    for kind in PieceKind::ALL {
        for sq in pos.pieces(color, kind) {
            let distance = match kind {
                PieceKind::Pawn => match color {
                    Color::White => 7 - sq.rank() as i32,
                    Color::Black => sq.rank() as i32,
                },
                PieceKind::Rook => {
                    let files = (sq.file() as i32 - target.file() as i32).abs();
                    let ranks = (sq.rank() as i32 - target.rank() as i32).abs();
                    files.min(ranks)
                }
                _ => chebyshev(sq, target),
            };
            total += BASE - STEP * distance;
        }
    }
    total
}

/// Drive balance from White's perspective, scaled by `phase`.
pub fn endgame(pos: &Position, phase: f32) -> i32 {
    if phase <= 0.0 {
        return 0;
    }
    let raw = drive(pos, Color::White) - drive(pos, Color::Black);
    (raw as f32 * phase).round() as i32
}
