use super::board::{Board, Cell, Color};

/// The eight compass directions, excluding the zero vector (§4.3).
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Runs the Reversi flip rule outward from `pos` in every direction for
/// `color`. QUANTUM cells are opaque barriers: they stop a scan without
/// flipping and without closing a run of opponent stones.
pub fn flip(board: &mut Board, pos: usize, color: Color) {
    let opponent = color.opponent();
    let (x0, y0) = board.pos2xy(pos);
    for (dx, dy) in DIRECTIONS {
        flip_direction(board, x0 as isize, y0 as isize, dx, dy, color, opponent);
    }
}

fn flip_direction(
    board: &mut Board,
    x0: isize,
    y0: isize,
    dx: isize,
    dy: isize,
    color: Color,
    opponent: Color,
) {
    let mut run: Vec<usize> = vec![];
    let (mut x, mut y) = (x0, y0);

    loop {
        x += dx;
        y += dy;
        if !board.in_bounds(x, y) {
            return;
        }
        let p = board.xy2pos(x as usize, y as usize);
        match board.get(p) {
            Cell::Empty | Cell::Quantum => return,
            cell if cell == opponent.cell() => run.push(p),
            cell if cell == color.cell() => {
                for p in run {
                    board.set(p, color.cell());
                }
                return;
            }
            _ => unreachable!("cell matched neither color's disc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::moves::MoveLog;

    #[test]
    fn flips_a_single_run() {
        let mut board = Board::new(6, 6);
        let _log = MoveLog::seed_initial(&mut board);
        // Standard opening: Black plays the cell left of its own stone, flipping one White.
        let x = board.width() / 2 - 1;
        let y = board.height() / 2 - 1;
        let pos = board.xy2pos(x - 1, y);
        board.set(pos, Cell::Black);
        flip(&mut board, pos, Color::Black);
        assert_eq!(board.get(board.xy2pos(x, y)), Cell::Black);
    }

    #[test]
    fn quantum_cell_blocks_the_flip() {
        let mut board = Board::new(6, 6);
        let _log = MoveLog::seed_initial(&mut board);
        let x = board.width() / 2 - 1;
        let y = board.height() / 2 - 1;
        board.set(board.xy2pos(x, y), Cell::Quantum);
        let pos = board.xy2pos(x - 1, y);
        board.set(pos, Cell::Black);
        flip(&mut board, pos, Color::Black);
        // The quantum cell is opaque: nothing beyond it flips, and it stays quantum.
        assert_eq!(board.get(board.xy2pos(x, y)), Cell::Quantum);
        assert_eq!(board.get(board.xy2pos(x + 1, y)), Cell::Black);
    }

    #[test]
    fn no_flip_without_a_terminating_same_color_disc() {
        let mut board = Board::new(6, 6);
        board.set(0, Cell::White);
        board.set(1, Cell::Black);
        flip(&mut board, 1, Color::Black);
        assert_eq!(board.get(0), Cell::White);
    }
}
