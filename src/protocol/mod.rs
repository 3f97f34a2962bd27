pub mod transport;
pub mod wire;

pub mod prelude {
    pub use super::transport::ProcessSolver;
    pub use super::wire::{Reply, Request, WireState};
}
