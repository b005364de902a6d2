//! Mutable position with strict make/undo discipline.
//!
//! The rules engine's `Chess` value is immutable-by-convention and cheap to
//! clone, so every make pushes the previous state onto a frame stack and every
//! undo pops it. Repetition history and the Zobrist hash travel with the
//! frames, which guarantees an undo restores the position bit for bit.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use shakmaty::fen::Fen;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{
    Bitboard, Board, CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Piece, Square,
    attacks,
};
use shakmaty::Position as _;

use crate::error::BoardError;
use crate::moves::{PackedMove, to_uci};
use crate::piece_kind::PieceKind;

/// FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Saved state for one level of make/undo.
#[derive(Clone)]
struct Frame {
    chess: Chess,
    hash: u64,
    /// The move that left this state, null for a skipped turn.
    mv: PackedMove,
}

/// A chess position the search mutates in place.
#[derive(Clone)]
pub struct Position {
    chess: Chess,
    hash: u64,
    frames: Vec<Frame>,
    /// Hashes of every earlier position in the game and the current search path.
    history: Vec<u64>,
}

fn zobrist(chess: &Chess) -> u64 {
    chess.zobrist_hash::<Zobrist64>(EnPassantMode::Legal).0
}

impl Position {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_chess(Chess::default())
    }

    fn from_chess(chess: Chess) -> Self {
        let hash = zobrist(&chess);
        Self {
            chess,
            hash,
            frames: Vec::with_capacity(128),
            history: Vec::with_capacity(256),
        }
    }

    /// Parse a position from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed: Fen = fen.trim().parse().map_err(|e: shakmaty::fen::ParseFenError| {
            BoardError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            }
        })?;
        let chess: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| BoardError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_chess(chess))
    }

    // ── Move generation ─────────────────────────────────────────────────────

    /// Legal moves for the side to move, or only the legal captures.
    pub fn legal_moves(&self, captures_only: bool) -> MoveList {
        if captures_only {
            self.chess.capture_moves()
        } else {
            self.chess.legal_moves()
        }
    }

    /// Find the legal move with the given UCI spelling.
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        self.chess
            .legal_moves()
            .into_iter()
            .find(|mv| to_uci(mv) == uci)
    }

    // ── Make / undo ─────────────────────────────────────────────────────────

    /// Play `mv`, which must be legal in the current position.
    pub fn make_move(&mut self, mv: &Move) {
        self.frames.push(Frame {
            chess: self.chess.clone(),
            hash: self.hash,
            mv: PackedMove::new(mv),
        });
        self.history.push(self.hash);
        self.chess.play_unchecked(mv);
        self.hash = zobrist(&self.chess);
    }

    /// Take back `mv`, which must be the most recent [`make_move`](Self::make_move).
    pub fn undo_move(&mut self, mv: &Move) {
        debug_assert!(
            self.frames.last().is_some_and(|f| f.mv.matches(mv)),
            "undo_move({mv:?}) does not match the last make_move"
        );
        self.restore();
    }

    /// Pass the turn to the opponent without moving.
    ///
    /// Returns `false` and leaves the position untouched when the side to
    /// move is in check (a null move would be illegal).
    pub fn try_skip_turn(&mut self) -> bool {
        if self.chess.is_check() {
            return false;
        }
        let Ok(next) = self.chess.clone().swap_turn() else {
            return false;
        };
        let prev = std::mem::replace(&mut self.chess, next);
        self.frames.push(Frame {
            chess: prev,
            hash: self.hash,
            mv: PackedMove::NULL,
        });
        self.history.push(self.hash);
        self.hash = zobrist(&self.chess);
        true
    }

    /// Undo the most recent successful [`try_skip_turn`](Self::try_skip_turn).
    pub fn undo_skip_turn(&mut self) {
        debug_assert!(
            self.frames.last().is_some_and(|f| f.mv.is_null()),
            "undo_skip_turn without a matching skip"
        );
        self.restore();
    }

    /// Play `mv` and return a guard that undoes it when dropped.
    pub fn play(&mut self, mv: &Move) -> MoveGuard<'_> {
        self.make_move(mv);
        MoveGuard { pos: self }
    }

    /// Skip the turn, returning a guard that restores it when dropped.
    pub fn skip_turn(&mut self) -> Option<MoveGuard<'_>> {
        if self.try_skip_turn() {
            Some(MoveGuard { pos: self })
        } else {
            None
        }
    }

    /// Play a game move permanently.
    ///
    /// The move is recorded for repetition detection but cannot be undone.
    /// Must not be called while search frames are outstanding.
    pub fn push_uci(&mut self, uci: &str) -> Result<(), BoardError> {
        debug_assert!(self.frames.is_empty(), "push_uci inside a search");
        let mv = self.find_move(uci).ok_or_else(|| BoardError::IllegalMove {
            uci: uci.to_string(),
        })?;
        self.history.push(self.hash);
        self.chess.play_unchecked(&mv);
        self.hash = zobrist(&self.chess);
        Ok(())
    }

    fn restore(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.chess = frame.chess;
            self.hash = frame.hash;
            self.history.pop();
        }
    }

    /// Number of outstanding make/skip frames.
    pub fn ply(&self) -> usize {
        self.frames.len()
    }

    // ── Terminal state ──────────────────────────────────────────────────────

    /// Whether the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        self.chess.is_check()
    }

    /// Whether the side to move is checkmated.
    pub fn is_checkmate(&self) -> bool {
        self.chess.is_checkmate()
    }

    /// Whether the side to move has no legal moves but is not in check.
    pub fn is_stalemate(&self) -> bool {
        self.chess.is_stalemate()
    }

    /// Whether the current position occurred before with the same side to move.
    ///
    /// Only positions since the last irreversible move are considered.
    pub fn is_repetition(&self) -> bool {
        let window = self.chess.halfmoves() as usize;
        self.history
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .any(|&h| h == self.hash)
    }

    /// Whether neither side can possibly deliver mate.
    pub fn is_insufficient_material(&self) -> bool {
        self.chess.is_insufficient_material()
    }

    /// Whether 50 moves per side passed without a capture or pawn move.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.chess.halfmoves() >= 100
    }

    /// Draw by repetition, insufficient material, or the fifty-move rule.
    ///
    /// Stalemate is not included: callers detect it from an empty move list.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material() || self.is_repetition()
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    /// Zobrist hash of the current position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.chess.turn()
    }

    /// Piece placement.
    #[inline]
    pub fn board(&self) -> &Board {
        self.chess.board()
    }

    /// Squares holding pieces of `kind` owned by `color`.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        let board = self.chess.board();
        board.by_role(kind.role()) & board.by_color(color)
    }

    /// Number of pieces of `kind` owned by `color`.
    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces(color, kind).count() as u32
    }

    /// All squares occupied by `color`.
    #[inline]
    pub fn occupied(&self, color: Color) -> Bitboard {
        self.chess.board().by_color(color)
    }

    /// Square of `color`'s king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.chess.board().king_of(color)
    }

    /// Piece on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.chess.board().piece_at(sq)
    }

    /// Every square attacked by `color`'s pawns.
    pub fn pawn_attacks(&self, color: Color) -> Bitboard {
        let mut attacked = Bitboard::EMPTY;
        for sq in self.pieces(color, PieceKind::Pawn) {
            attacked |= attacks::pawn_attacks(color, sq);
        }
        attacked
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Position {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("side_to_move", &self.side_to_move())
            .field("ply", &self.frames.len())
            .field("history", &self.history.len())
            .finish()
    }
}

/// Scoped make/undo.
///
/// Dereferences to the [`Position`] after the move; dropping the guard
/// restores the position as it was before, on every exit path.
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.pos
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.pos.restore();
    }
}
