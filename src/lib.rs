pub mod cli;
pub mod config;
pub mod diff;
pub mod error;

pub use diff::*;
pub use error::{DiffError, Side};
