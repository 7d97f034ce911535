pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod git;
pub mod layout;
pub mod logging;
pub mod model;
pub mod preview;
pub mod progress;
pub mod prompt;
pub mod prune;

#[cfg(test)]
mod testing;
