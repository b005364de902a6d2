//! Move ordering.
//!
//! Each move gets one score and the list is sorted once, stably, so moves
//! with equal scores keep generation order. Tiers, best first:
//!
//! 1. the prioritized move (transposition hint or last best at this ply)
//! 2. killer moves
//! 3. promotions
//! 4. captures, most valuable victim first, cheapest attacker breaking ties
//! 5. quiet moves, penalised when the destination is attacked by an enemy pawn

use std::cmp::Reverse;

use gambit_core::{Bitboard, Move, MoveList, PackedMove, PieceKind, Position};

const PRIORITY_SCORE: i32 = 1_000_000;
const KILLER_SCORE: [i32; 2] = [900_000, 890_000];
const PROMOTION_SCORE: i32 = 800_000;
const CAPTURE_SCORE: i32 = 100_000;

/// Victim weight multiplier in MVV-LVA.
const VICTIM_SCALE: i32 = 10;

/// Ordering values indexed by [`PieceKind::index`]. A capturing king is never
/// recaptured, so it counts as the cheapest attacker.
const ORDER_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 0];

#[inline]
fn value(role: gambit_core::Role) -> i32 {
    ORDER_VALUE[PieceKind::from_role(role).index()]
}

/// Score a move without priority or killer information.
pub fn score_move(mv: &Move, enemy_pawn_attacks: Bitboard) -> i32 {
    let victim = mv.capture().map_or(0, value);

    if let Some(promo) = mv.promotion() {
        return PROMOTION_SCORE + VICTIM_SCALE * value(promo) + victim;
    }
    if mv.is_capture() {
        return CAPTURE_SCORE + VICTIM_SCALE * victim - value(mv.role());
    }
    if enemy_pawn_attacks.contains(mv.to()) {
        -value(mv.role())
    } else {
        0
    }
}

/// Yields moves in ordering-score order.
pub struct MovePicker {
    moves: std::vec::IntoIter<(i32, Move)>,
}

impl MovePicker {
    /// Order moves for the principal search.
    pub fn new(moves: MoveList, pos: &Position, priority: PackedMove, killers: [PackedMove; 2]) -> Self {
        let threats = pos.pawn_attacks(!pos.side_to_move());
        let scored = moves
            .into_iter()
            .map(|mv| {
                let score = if priority.matches(&mv) {
                    PRIORITY_SCORE
                } else if let Some(slot) = killer_slot(&mv, &killers) {
                    KILLER_SCORE[slot]
                } else {
                    score_move(&mv, threats)
                };
                (score, mv)
            })
            .collect();
        Self::from_scored(scored)
    }

    /// Order moves for quiescence: no priority move, no killers.
    pub fn new_quiescence(moves: MoveList, pos: &Position) -> Self {
        Self::new(moves, pos, PackedMove::NULL, [PackedMove::NULL; 2])
    }

    fn from_scored(mut scored: Vec<(i32, Move)>) -> Self {
        scored.sort_by_key(|&(score, _)| Reverse(score));
        Self {
            moves: scored.into_iter(),
        }
    }
}

fn killer_slot(mv: &Move, killers: &[PackedMove; 2]) -> Option<usize> {
    if mv.is_capture() || mv.is_promotion() {
        return None;
    }
    killers.iter().position(|k| k.matches(mv))
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        self.moves.next().map(|(_, mv)| mv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}

impl ExactSizeIterator for MovePicker {}

#[cfg(test)]
mod tests {
    use super::*;
    use gambit_core::to_uci;

    fn order(fen: &str, priority: Option<&str>, killers: &[&str]) -> Vec<String> {
        let pos = Position::from_fen(fen).unwrap();
        let priority = priority
            .map(|uci| PackedMove::new(&pos.find_move(uci).unwrap()))
            .unwrap_or(PackedMove::NULL);
        let mut slots = [PackedMove::NULL; 2];
        for (slot, uci) in slots.iter_mut().zip(killers) {
            *slot = PackedMove::new(&pos.find_move(uci).unwrap());
        }
        MovePicker::new(pos.legal_moves(false), &pos, priority, slots)
            .map(|mv| to_uci(&mv))
            .collect()
    }

    #[test]
    fn yields_every_move_once() {
        let pos = Position::new();
        let picker = MovePicker::new(pos.legal_moves(false), &pos, PackedMove::NULL, [PackedMove::NULL; 2]);
        assert_eq!(picker.len(), 20);
        let mut ucis: Vec<String> = picker.map(|mv| to_uci(&mv)).collect();
        ucis.sort();
        ucis.dedup();
        assert_eq!(ucis.len(), 20);
    }

    #[test]
    fn hanging_queen_capture_first() {
        let moves = order("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", None, &[]);
        assert_eq!(moves[0], "e4d5");
    }

    #[test]
    fn priority_beats_capture() {
        let moves = order("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", Some("e1f1"), &[]);
        assert_eq!(moves[0], "e1f1");
        assert_eq!(moves[1], "e4d5");
    }

    #[test]
    fn killers_after_priority_before_captures() {
        let moves = order(
            "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1",
            Some("e1f1"),
            &["e1f2", "e1e2"],
        );
        assert_eq!(&moves[..4], ["e1f1", "e1f2", "e1e2", "e4d5"]);
    }

    #[test]
    fn promotion_before_capture() {
        // Four promotions outrank Rxh5 even though it wins a queen.
        let moves = order("4k3/P7/8/7q/8/8/8/4K2R w K - 0 1", None, &[]);
        assert_eq!(moves[0], "a7a8q");
        assert_eq!(moves[4], "h1h5");
    }

    #[test]
    fn mvv_lva_prefers_cheaper_attacker() {
        // Both the pawn and the queen can take the rook on d5.
        let moves = order("4k3/8/8/3r4/4P3/8/3Q4/4K3 w - - 0 1", None, &[]);
        assert_eq!(moves[0], "e4d5");
        assert_eq!(moves[1], "d2d5");
    }

    #[test]
    fn quiet_move_into_pawn_attack_sorts_last() {
        // Nc3-b5 or d5 walks into the c6/e6 pawns.
        let pos = Position::from_fen("4k3/8/2p1p3/8/8/2N5/8/4K3 w - - 0 1").unwrap();
        let moves: Vec<String> = MovePicker::new_quiescence(pos.legal_moves(false), &pos)
            .map(|mv| to_uci(&mv))
            .collect();
        let n = moves.len();
        let tail: Vec<&str> = moves[n - 2..].iter().map(String::as_str).collect();
        assert!(tail.contains(&"c3b5"), "{moves:?}");
        assert!(tail.contains(&"c3d5"), "{moves:?}");
    }

    #[test]
    fn stable_for_equal_scores() {
        let pos = Position::new();
        let generated: Vec<String> = pos.legal_moves(false).iter().map(to_uci).collect();
        let ordered: Vec<String> = MovePicker::new_quiescence(pos.legal_moves(false), &pos)
            .map(|mv| to_uci(&mv))
            .collect();
        assert_eq!(generated, ordered);
    }
}
