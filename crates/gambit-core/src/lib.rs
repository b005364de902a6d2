//! Position oracle for gambit: rules, make/undo, hashing, and terminal checks.
//!
//! Move generation and legality are delegated to `shakmaty`. This crate adds
//! the mutable, stack-disciplined [`Position`] the search drives.

mod error;
mod moves;
mod perft;
mod piece_kind;
mod position;

pub use error::BoardError;
pub use moves::{PackedMove, to_uci};
pub use perft::perft;
pub use piece_kind::PieceKind;
pub use position::{MoveGuard, Position, STARTING_FEN};

pub use shakmaty::{Bitboard, Board, Color, File, Move, MoveList, Piece, Rank, Role, Square};
