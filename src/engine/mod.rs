pub mod board;
pub mod collapse;
pub mod entanglement;
pub mod flip;
pub mod moves;
pub mod turnloop;
pub mod validate;

pub mod prelude {
    pub use super::board::{Board, Cell, Color};
    pub use super::collapse::CollapseResolver;
    pub use super::entanglement::EntanglementGraph;
    pub use super::moves::{Move, MoveLog};
    pub use super::turnloop::{Outcome, Referee, Solver, BOARD_HEIGHT, BOARD_WIDTH, TIME_LIMIT};
}
