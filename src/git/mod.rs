pub mod repo;
pub mod runner;
pub mod writer;

pub use repo::{ensure_clean, init_if_missing, publish, GitRepo, PushMode, Published};
pub use runner::{Completed, Execute, Invocation, Outcome, Policy, Runner, ShellExecutor};
pub use writer::CommitWriter;
