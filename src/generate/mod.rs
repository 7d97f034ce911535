pub mod pattern;
pub mod uniform;

pub use pattern::{generate_pattern, layout, plan_cell};
pub use uniform::{generate_uniform, plan_day};

use crate::config::Config;
use crate::git::{publish, Execute, PushMode, Published, Runner};
use crate::model::GenerationReport;
use console::style;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub report: GenerationReport,
    pub published: Published,
}

fn finish_run<E: Execute>(
    config: &Config,
    runner: &mut Runner<E>,
    report: GenerationReport,
    mode: PushMode,
) -> RunSummary {
    if report.commits_failed > 0 {
        warn!(
            failed = report.commits_failed,
            created = report.commits_created,
            "some commits could not be created"
        );
    }
    let published = publish(runner, &config.branch, config.repository_url.as_deref(), mode);
    RunSummary { report, published }
}

fn print_summary(config: &Config, summary: &RunSummary) {
    let report = &summary.report;
    if report.commits_failed > 0 {
        println!(
            "{} {} of {} commits failed",
            style("[WARN]").yellow().bold(),
            report.commits_failed,
            report.attempted()
        );
    }
    match summary.published {
        Published::Pushed => println!(
            "{} {} commits pushed to: {} (branch: {})",
            style("[Done]").green().bold(),
            report.commits_created,
            config.repository_url.as_deref().unwrap_or("origin"),
            config.branch
        ),
        Published::PushFailed => println!(
            "{} {} commits created locally, but the push to {} failed",
            style("[WARN]").yellow().bold(),
            report.commits_created,
            config.branch
        ),
        Published::NoRemote => println!(
            "{} {} commits created locally on {} (no remote configured)",
            style("[Done]").green().bold(),
            report.commits_created,
            config.branch
        ),
    }
}
