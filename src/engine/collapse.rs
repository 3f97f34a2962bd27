use std::collections::HashSet;

use crate::error::ForfeitReason;

use super::board::Board;
use super::flip;
use super::moves::MoveLog;

/// One move awaiting resolution once a cycle collapses: its log index and
/// its still-unresolved pair of endpoints.
pub type PendingEntry = (usize, (usize, usize));

/// Holds the set of moves that must collapse once a cycle closes, from the
/// moment the cycle is detected until the opponent's `select` reply is
/// applied (§3 "Pending entanglement resolution set", §4.5).
#[derive(Clone, Debug, Default)]
pub struct CollapseResolver {
    pending: Vec<PendingEntry>,
}

fn canon(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl CollapseResolver {
    pub fn new() -> CollapseResolver {
        CollapseResolver { pending: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The pair offered to the opponent for the explicit choice: the pair
    /// belonging to the highest-indexed (i.e. most recently played) move in
    /// the pending set.
    pub fn head_pair(&self) -> Option<(usize, usize)> {
        self.pending.first().map(|(_, pair)| *pair)
    }

    /// Step 1 + Step 2: given the cycle's vertex sequence, computes every
    /// move that must collapse - the cycle's own edges, plus the tree of
    /// unresolved moves hanging off any cycle vertex, expanded to a
    /// fixpoint - and stores them sorted by move index descending so the
    /// move that just closed the cycle is at the head.
    pub fn build(&mut self, cycle: &[usize], log: &MoveLog) {
        let mut paths: Vec<(usize, usize)> = vec![];
        let mut entireties: Vec<usize> = cycle.to_vec();

        for w in cycle.windows(2) {
            paths.push(canon(w[0], w[1]));
        }
        if cycle.len() > 1 {
            paths.push(canon(cycle[0], cycle[cycle.len() - 1]));
        }

        let mut growing = true;
        while growing {
            growing = false;
            let snapshot = entireties.clone();
            for &c in &snapshot {
                for m in log.iter() {
                    if !m.is_unresolved() {
                        continue;
                    }
                    let pair = m.pair();
                    if (pair.0 == c || pair.1 == c) && !paths.contains(&pair) {
                        paths.push(pair);
                        let other = if pair.0 == c { pair.1 } else { pair.0 };
                        entireties.push(other);
                        growing = true;
                    }
                }
            }
        }

        self.pending = log
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_unresolved() && paths.contains(&m.pair()))
            .map(|(i, m)| (i, m.pair()))
            .collect();
        self.pending.sort_by(|a, b| b.0.cmp(&a.0));
    }

    /// Validates a raw `select` reply against the head pair without
    /// mutating anything.
    pub fn validate_choice(&self, raw: i64) -> Result<usize, ForfeitReason> {
        let (p0, p1) = self.head_pair().expect("validate_choice with no pending entanglement");
        if raw == p0 as i64 {
            Ok(p0)
        } else if raw == p1 as i64 {
            Ok(p1)
        } else {
            Err(ForfeitReason::InvalidSelect {
                offered: (p0, p1),
                got: raw,
            })
        }
    }

    /// Steps 4-6: applies the opponent's choice for the head move, then
    /// propagates by constraint to fixpoint, and writes + flips every
    /// remaining pending move in the order Step 2 produced.
    pub fn apply(&mut self, log: &mut MoveLog, board: &mut Board, choice: usize) {
        let (head_idx, _) = self.pending[0];

        // Step 4: the head resolves and is immediately written and flipped.
        log.resolve(head_idx, choice);
        let head_color = log.color_of(head_idx);
        board.set(choice, head_color.cell());
        flip::flip(board, choice, head_color);

        // Step 5: propagate by constraint to fixpoint. No board writes here -
        // only log resolution state is determined.
        let mut check: HashSet<usize> = HashSet::new();
        check.insert(choice);
        let mut changed = true;
        while changed {
            changed = false;
            for &(idx, (a, b)) in &self.pending {
                if log.get(idx).is_unresolved() {
                    let a_in = check.contains(&a);
                    let b_in = check.contains(&b);
                    if a_in != b_in {
                        let unused = if a_in { b } else { a };
                        log.resolve(idx, unused);
                        check.insert(unused);
                        changed = true;
                    }
                }
            }
        }

        // Step 6: write stones and flip for everything but the head, in
        // descending move-index order.
        for &(idx, _) in &self.pending[1..] {
            let pos = log
                .get(idx)
                .resolved_pos()
                .expect("collapse propagation left a pending move unresolved");
            let color = log.color_of(idx);
            board.set(pos, color.cell());
            flip::flip(board, pos, color);
        }

        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::board::{Cell, Color};

    #[test]
    fn two_cycle_resolves_by_explicit_choice() {
        let mut board = Board::new(6, 6);
        let mut log = MoveLog::new();
        log.push_unresolved(13, 22); // move 0, Black
        log.push_unresolved(13, 22); // move 1, White
        board.set(13, Cell::Quantum);
        board.set(22, Cell::Quantum);

        let mut resolver = CollapseResolver::new();
        resolver.build(&[13, 22], &log);
        assert_eq!(resolver.head_pair(), Some((13, 22)));

        let choice = resolver.validate_choice(13).unwrap();
        resolver.apply(&mut log, &mut board, choice);

        assert_eq!(log.color_of(1), Color::White);
        assert_eq!(board.get(13), Cell::White);
        assert_eq!(log.color_of(0), Color::Black);
        assert_eq!(board.get(22), Cell::Black);
        assert!(resolver.is_empty());
    }

    #[test]
    fn rejects_a_choice_outside_the_offered_pair() {
        let mut log = MoveLog::new();
        log.push_unresolved(13, 22);
        log.push_unresolved(13, 22);
        let mut resolver = CollapseResolver::new();
        resolver.build(&[13, 22], &log);
        assert!(resolver.validate_choice(5).is_err());
    }

    #[test]
    fn tree_hanging_move_propagates_to_its_unclaimed_endpoint() {
        let mut board = Board::new(6, 6);
        let mut log = MoveLog::new();
        log.push_unresolved(13, 22); // move 0
        log.push_unresolved(22, 23); // move 1
        log.push_unresolved(23, 13); // move 2, closes the cycle
        for pos in [13, 22, 23] {
            board.set(pos, Cell::Quantum);
        }

        let mut resolver = CollapseResolver::new();
        resolver.build(&[13, 22, 23], &log);
        assert_eq!(resolver.head_pair(), Some((13, 23)));

        let choice = resolver.validate_choice(13).unwrap();
        resolver.apply(&mut log, &mut board, choice);

        assert_eq!(log.get(2).resolved_pos(), Some(13));
        assert_eq!(log.get(0).resolved_pos(), Some(22));
        assert_eq!(log.get(1).resolved_pos(), Some(23));
        assert_eq!(board.get(13), Cell::Black); // move 2 is even-indexed -> Black
        assert_eq!(board.get(22), Cell::Black); // move 0 -> Black
        assert_eq!(board.get(23), Cell::White); // move 1 -> White
    }
}
