//! Command-line interface module.

mod commands;
mod purge;
mod storage;

pub use commands::{Cli, Commands};
pub use purge::{run_purge, serve};
pub use storage::{init_storage, list_bucket};
