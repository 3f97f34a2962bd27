use super::board::{Board, Cell, Color};

/// A single superposed move: two candidate cells, canonicalized `a <= b`,
/// and a resolution state.
///
/// `r == -1` means unresolved (the move still contributes an edge to the
/// entanglement graph); `r == 0` resolves to `a`; `r == 1` resolves to `b`.
/// A "last empty cell" move is represented with `a == b` and never
/// participates in the graph (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub a: usize,
    pub b: usize,
    pub r: i8,
}

impl Move {
    /// Builds a canonical (sorted) unresolved move.
    pub fn unresolved(pos1: usize, pos2: usize) -> Move {
        let (a, b) = if pos1 <= pos2 {
            (pos1, pos2)
        } else {
            (pos2, pos1)
        };
        Move { a, b, r: -1 }
    }

    /// Builds a move that is already resolved, used to seed the initial
    /// four stones (§3, §4.6).
    pub fn seeded(pos: usize) -> Move {
        Move {
            a: pos,
            b: pos,
            r: 0,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        self.r < 0
    }

    /// Whether this move ever participates in the entanglement graph.
    /// A single-cell "last move" (`a == b`) never does.
    pub fn is_graph_edge(&self) -> bool {
        self.a != self.b
    }

    pub fn pair(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    /// The position this move resolved to, if it has.
    pub fn resolved_pos(&self) -> Option<usize> {
        match self.r {
            0 => Some(self.a),
            1 => Some(self.b),
            _ => None,
        }
    }

    /// Resolves this move to the given endpoint, once. Panics if already
    /// resolved or if `pos` is not one of the move's two endpoints -
    /// callers are expected to have validated both before calling.
    pub fn resolve_to(&mut self, pos: usize) {
        assert!(self.is_unresolved(), "move resolved more than once");
        self.r = if pos == self.a {
            0
        } else if pos == self.b {
            1
        } else {
            panic!("position {pos} is not an endpoint of ({}, {})", self.a, self.b);
        };
    }
}

/// The ordered, append-only log of every move played in the game, seeded
/// with the four pre-resolved initial stones.
#[derive(Clone, Debug, Default)]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    pub fn new() -> MoveLog {
        MoveLog { moves: vec![] }
    }

    /// Seeds the log and board with the four standard Reversi starting
    /// stones at the center of the board, Black/White/Black/White at
    /// indices 0..3 in the standard diagonal pattern.
    pub fn seed_initial(board: &mut Board) -> MoveLog {
        let x = board.width() / 2 - 1;
        let y = board.height() / 2 - 1;

        let tl = board.xy2pos(x, y);
        let tr = board.xy2pos(x + 1, y);
        let bl = board.xy2pos(x, y + 1);
        let br = board.xy2pos(x + 1, y + 1);

        let mut log = MoveLog::new();
        for (pos, cell) in [
            (tr, Cell::Black),
            (tl, Cell::White),
            (bl, Cell::Black),
            (br, Cell::White),
        ] {
            log.moves.push(Move::seeded(pos));
            board.set(pos, cell);
        }
        log
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn get(&self, i: usize) -> &Move {
        &self.moves[i]
    }

    pub fn get_mut(&mut self, i: usize) -> &mut Move {
        &mut self.moves[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    pub fn iter_unresolved(&self) -> impl Iterator<Item = (usize, &Move)> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_unresolved())
    }

    /// The color that owns move index `i`: even is Black, odd is White.
    pub fn color_of(&self, i: usize) -> Color {
        Color::of_move(i)
    }

    /// Appends a new unresolved move and returns its index. A single-cell
    /// last-move (`a == b`) is appended too, but never contributes an edge
    /// (see `Move::is_graph_edge`).
    pub fn push_unresolved(&mut self, pos1: usize, pos2: usize) -> usize {
        self.moves.push(Move::unresolved(pos1, pos2));
        self.moves.len() - 1
    }

    /// Resolves the move at `i` to `pos`, once.
    pub fn resolve(&mut self, i: usize, pos: usize) {
        self.moves[i].resolve_to(pos);
    }

    /// Wire representation of the log: `[[a, b], r]` per move (§6.1).
    pub fn to_wire(&self) -> Vec<((usize, usize), i8)> {
        self.moves.iter().map(|m| ((m.a, m.b), m.r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_endpoints() {
        let m = Move::unresolved(22, 13);
        assert_eq!(m.pair(), (13, 22));
    }

    #[test]
    fn seed_initial_places_standard_diagonal() {
        let mut board = Board::new(6, 6);
        let log = MoveLog::seed_initial(&mut board);
        assert_eq!(log.len(), 4);
        assert_eq!(board.black_count(), 2);
        assert_eq!(board.white_count(), 2);
        assert_eq!(board.get(board.xy2pos(2, 2)), Cell::White);
        assert_eq!(board.get(board.xy2pos(3, 2)), Cell::Black);
        assert_eq!(board.get(board.xy2pos(2, 3)), Cell::Black);
        assert_eq!(board.get(board.xy2pos(3, 3)), Cell::White);
    }

    #[test]
    fn resolve_picks_the_matching_endpoint() {
        let mut m = Move::unresolved(13, 22);
        m.resolve_to(22);
        assert_eq!(m.r, 1);
        assert_eq!(m.resolved_pos(), Some(22));
    }

    #[test]
    #[should_panic]
    fn resolve_twice_panics() {
        let mut m = Move::unresolved(13, 22);
        m.resolve_to(22);
        m.resolve_to(13);
    }
}
