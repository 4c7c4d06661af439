pub mod args;
pub mod commands;

pub use args::{Cli, Commands, QueryCommand};
pub use commands::run;
