//! Transposition table.
//!
//! A fixed array of slots indexed by `hash % len`. Every store overwrites
//! its slot; the full 64-bit key is kept so a probe never trusts an entry
//! that belongs to a different position sharing the slot.

use gambit_core::PackedMove;

use super::negamax::MATE_THRESHOLD;

/// How the stored score relates to the true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// Empty slot.
    #[default]
    None,
    /// Searched with a full window; the score is exact.
    Exact,
    /// Failed high; the true score is at least this.
    LowerBound,
    /// Failed low; the true score is at most this.
    UpperBound,
}

#[derive(Debug, Clone, Copy, Default)]
struct TtEntry {
    key: u64,
    score: i32,
    best_move: PackedMove,
    depth: u8,
    bound: Bound,
}

/// A hit returned by [`TranspositionTable::probe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtProbe {
    pub best_move: PackedMove,
    pub depth: u8,
    pub bound: Bound,
    /// Already converted back to distance-from-root.
    pub score: i32,
}

/// Store mate scores relative to the node instead of the root, so the
/// entry stays valid when reached along a path of different length.
pub fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Fixed-size, always-replace hash table of search results.
pub struct TranspositionTable {
    entries: Box<[TtEntry]>,
}

impl TranspositionTable {
    /// Allocate roughly `mb` megabytes of slots (at least one).
    pub fn new(mb: usize) -> Self {
        let bytes = mb.saturating_mul(1024 * 1024);
        let count = (bytes / std::mem::size_of::<TtEntry>()).max(1);
        Self::with_entries(count)
    }

    /// Allocate exactly `count` slots.
    pub fn with_entries(count: usize) -> Self {
        Self {
            entries: vec![TtEntry::default(); count.max(1)].into_boxed_slice(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a table has at least one slot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.entries.fill(TtEntry::default());
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Look up `hash`, returning `None` for empty slots and key mismatches.
    pub fn probe(&self, hash: u64, ply: u8) -> Option<TtProbe> {
        let entry = &self.entries[self.index(hash)];
        if entry.bound == Bound::None || entry.key != hash {
            return None;
        }
        Some(TtProbe {
            best_move: entry.best_move,
            depth: entry.depth,
            bound: entry.bound,
            score: score_from_tt(entry.score, ply),
        })
    }

    /// Overwrite the slot for `hash`.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, best_move: PackedMove, bound: Bound, ply: u8) {
        let idx = self.index(hash);
        self.entries[idx] = TtEntry {
            key: hash,
            score: score_to_tt(score, ply),
            best_move,
            depth,
            bound,
        };
    }

    /// Permille of slots in use.
    pub fn hashfull(&self) -> usize {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample]
            .iter()
            .filter(|e| e.bound != Bound::None)
            .count();
        used * 1000 / sample
    }
}
