use crate::config::{DEFAULT_BRANCH, DEFAULT_SCRATCH_LOG};
use crate::layout::{GridAlignment, DEFAULT_MESSAGE};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "commitpaint")]
#[command(about = "Paint a year of the contribution calendar with backdated commits, or prune them again")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, env = "REPO_URL", help = "Remote URL added as origin when none exists")]
    pub repo_url: Option<String>,

    #[arg(long, global = true, env = "BRANCH_NAME", default_value = DEFAULT_BRANCH, help = "Branch to publish")]
    pub branch: String,

    #[arg(long, global = true, env = "TARGET_YEAR", default_value_t = 2024, help = "Calendar year to paint or prune")]
    pub year: i32,

    #[arg(long, global = true, env = "MIN_COMMITS_PER_DAY", default_value_t = 1, help = "Fewest commits per day (uniform)")]
    pub min_commits: u32,

    #[arg(long, global = true, env = "MAX_COMMITS_PER_DAY", default_value_t = 1, help = "Most commits per day (uniform)")]
    pub max_commits: u32,

    #[arg(long, global = true, env = "COMMITS_PER_X", default_value_t = 5, help = "Commits per ink cell (pattern)")]
    pub commits_per_cell: u32,

    #[arg(long, global = true, env = "MESSAGE", default_value = DEFAULT_MESSAGE, help = "Text to draw (pattern)")]
    pub message: String,

    #[arg(long, global = true, env = "GRID_ALIGNMENT", value_enum, ignore_case = true, default_value_t = GridAlignment::Computed, help = "How the grid start offset is found")]
    pub alignment: GridAlignment,

    #[arg(long, global = true, env = "SCRATCH_LOG", default_value = DEFAULT_SCRATCH_LOG, help = "File each commit appends to, relative to the repository")]
    pub scratch_log: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill every day of the year with a random number of commits
    Uniform,
    /// Draw the message into the contribution grid
    Pattern,
    /// Remove every commit authored in the year from all branches
    Prune,
    /// Show where the message would land without committing anything
    Preview {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Exit 0 when the author date lies in [start, end] (used by prune's commit filter)
    #[command(hide = true)]
    DateInRange {
        #[arg(long, allow_hyphen_values = true)]
        start: i64,

        #[arg(long, allow_hyphen_values = true)]
        end: i64,

        #[arg(long, env = "GIT_AUTHOR_DATE")]
        date: Option<String>,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<ExitCode> {
        match self.command {
            Commands::Uniform => crate::generate::uniform::exec(&self.common)?,
            Commands::Pattern => crate::generate::pattern::exec(&self.common)?,
            Commands::Prune => crate::prune::exec(&self.common)?,
            Commands::Preview { json } => crate::preview::exec(&self.common, json)?,
            Commands::DateInRange { start, end, date } => {
                return Ok(crate::prune::date_in_range(start, end, date.as_deref()));
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}
