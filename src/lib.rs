#![allow(dead_code)]

pub mod cli;
pub mod engine;
pub mod error;
pub mod protocol;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;
    }
}

pub mod prelude {
    pub use super::cli::prelude::*;
    pub use super::engine::prelude::*;
    pub use super::error::{Forfeit, ForfeitReason};
    pub use super::protocol::prelude::*;
    pub use super::utils::prelude::*;
}
