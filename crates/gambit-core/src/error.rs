//! Errors raised while setting up a position.

/// Errors that can occur when building or advancing a [`Position`](crate::Position)
/// from external input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// The FEN string could not be parsed or describes an illegal position.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The offending FEN string.
        fen: String,
        /// Why the rules engine rejected it.
        reason: String,
    },

    /// A UCI move string is malformed or not legal in the current position.
    #[error("illegal move: {uci}")]
    IllegalMove {
        /// The UCI move string that failed to match a legal move.
        uci: String,
    },
}
