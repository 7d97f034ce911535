use crate::git::runner::{Completed, Execute, Invocation};

type Responder = Box<dyn FnMut(&Invocation) -> std::io::Result<Completed>>;

/// Records every invocation and answers with a scripted result.
pub struct ScriptedExecutor {
    calls: Vec<Invocation>,
    responder: Responder,
}

impl ScriptedExecutor {
    pub fn new<F>(responder: F) -> Self
    where
        F: FnMut(&Invocation) -> std::io::Result<Completed> + 'static,
    {
        Self {
            calls: Vec::new(),
            responder: Box::new(responder),
        }
    }

    /// Every command succeeds with empty output: a clean repository with a remote.
    pub fn succeeding() -> Self {
        Self::new(|_| Ok(Completed::ok("")))
    }

    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    pub fn calls_matching(&self, prefix: &[&str]) -> Vec<&Invocation> {
        self.calls.iter().filter(|c| c.is_git(prefix)).collect()
    }
}

impl Execute for ScriptedExecutor {
    fn execute(&mut self, invocation: &Invocation) -> std::io::Result<Completed> {
        self.calls.push(invocation.clone());
        (self.responder)(invocation)
    }
}

pub fn testing_config(year: i32) -> crate::config::Config {
    crate::config::Config {
        workdir: std::path::PathBuf::from("."),
        repository_url: Some("https://example.com/me/art".to_string()),
        branch: crate::config::DEFAULT_BRANCH.to_string(),
        target_year: year,
        min_commits_per_day: 1,
        max_commits_per_day: 1,
        commits_per_cell: 1,
        message: crate::layout::DEFAULT_MESSAGE.to_string(),
        alignment: crate::layout::GridAlignment::Computed,
        scratch_log: std::path::PathBuf::from(crate::config::DEFAULT_SCRATCH_LOG),
    }
}
