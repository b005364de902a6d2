//! Killer moves: quiet moves that caused a beta cutoff at the same ply.

use gambit_core::{Move, PackedMove};

use super::negamax::MAX_PLY;

/// Two killer slots per ply, most recent first.
pub struct KillerTable {
    slots: [[PackedMove; 2]; MAX_PLY],
}

impl KillerTable {
    /// Empty table, one pair of slots per ply.
    pub fn new() -> Self {
        Self {
            slots: [[PackedMove::NULL; 2]; MAX_PLY],
        }
    }

    /// Record a cutoff move at `ply`. A move already in slot 0 is not
    /// duplicated; otherwise slot 0 shifts down to slot 1.
    pub fn store(&mut self, ply: usize, mv: &Move) {
        let Some(slots) = self.slots.get_mut(ply) else {
            return;
        };
        let packed = PackedMove::new(mv);
        if slots[0] != packed {
            slots[1] = slots[0];
            slots[0] = packed;
        }
    }

    /// Both slots at `ply`; null past the end of the table.
    pub fn at(&self, ply: usize) -> [PackedMove; 2] {
        self.slots.get(ply).copied().unwrap_or([PackedMove::NULL; 2])
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}
