//! Static evaluation.
//!
//! Scores a position in centipawns from the side to move's perspective.
//! Packed terms (material, square tables) are tapered by game phase; the
//! mobility, endgame drive, and tempo terms are added on top. The total is
//! clamped well inside the mate band so a heavy material edge can never be
//! mistaken for a forced mate.

pub mod endgame;
pub mod material;
pub mod mobility;
pub mod phase;
pub mod pst;
pub mod score;

use gambit_core::{Color, Position};

use self::endgame::endgame;
use self::material::material;
use self::mobility::mobility;
use self::phase::game_phase;
use self::pst::psqt;

/// Bonus for having the move.
pub const TEMPO: i32 = 10;

/// Magnitude bound on any static evaluation.
pub const EVAL_LIMIT: i32 = 50_000;

/// Evaluate `pos` from the side to move's perspective.
///
/// Takes `&mut` because mobility briefly passes the turn; the position is
/// restored before returning.
pub fn evaluate(pos: &mut Position) -> i32 {
    let phase = game_phase(pos);
    let white = (material(pos) + psqt(pos)).taper(phase) + endgame(pos, phase);

    let relative = match pos.side_to_move() {
        Color::White => white,
        Color::Black => -white,
    };

    (relative + mobility(pos) + TEMPO).clamp(-EVAL_LIMIT, EVAL_LIMIT)
}
