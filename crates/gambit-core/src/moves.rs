//! Compact move encoding and UCI formatting.

use std::fmt;

use shakmaty::{CastlingMode, Move};

use crate::piece_kind::PieceKind;

/// A move packed into 16 bits.
///
/// Bit layout: `[15:12] promotion | [11:6] destination | [5:0] source`.
/// Promotion is `PieceKind::index() + 1`, or 0 for none. Castling is encoded
/// with the king's source and the rook's square, matching [`Move::to`].
///
/// Used where a full [`Move`] is too large to store per slot (the
/// transposition table). It carries no legality information: a packed move
/// is only meaningful when compared against moves generated for the
/// position it was recorded in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedMove(u16);

impl PackedMove {
    /// The null packed move (A1 to A1, never legal).
    pub const NULL: PackedMove = PackedMove(0);

    /// Pack a move.
    #[inline]
    pub fn new(mv: &Move) -> PackedMove {
        let from = mv.from().map_or(0, |sq| sq as u16);
        let to = mv.to() as u16;
        let promo = mv
            .promotion()
            .map_or(0, |role| PieceKind::from_role(role).index() as u16 + 1);
        PackedMove(from | (to << 6) | (promo << 12))
    }

    /// Whether this is [`PackedMove::NULL`].
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Whether `mv` packs to this value.
    #[inline]
    pub fn matches(self, mv: &Move) -> bool {
        !self.is_null() && PackedMove::new(mv) == self
    }
}

impl From<&Move> for PackedMove {
    fn from(mv: &Move) -> Self {
        PackedMove::new(mv)
    }
}

impl fmt::Debug for PackedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackedMove({} -> {}, promo {})",
            self.0 & 0x3F,
            (self.0 >> 6) & 0x3F,
            self.0 >> 12
        )
    }
}

/// Format a move in UCI long algebraic notation (`e2e4`, `e7e8q`, `e1g1`).
pub fn to_uci(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}
