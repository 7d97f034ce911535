use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaintError>;

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::discover::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Working tree has uncommitted changes. Please commit or stash them.")]
    DirtyWorkTree,
    #[error("Command failed (exit {exit}): {command}\n{stderr}", exit = display_code(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("No glyph for character {0:?}")]
    UnsupportedGlyph(char),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl From<gix::discover::Error> for PaintError {
    fn from(err: gix::discover::Error) -> Self {
        PaintError::Git(Box::new(err))
    }
}
