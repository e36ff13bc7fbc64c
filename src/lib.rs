//! reposeed: bulk-apply CI workflow files and encrypted Actions secrets across repositories.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use adapters::{GitCommandAdapter, HttpGitHubClient, SealedBoxSealer};
use app::config::load_config;
use app::plan::Plan;
use app::workflow_source::load_workflow_files;
use app::{AppContext, Orchestrator, Progress, report};

pub use app::config::LoadOptions;
pub use domain::{AppError, BatchReport, ExitStatus, RepoStatus, RunResult};

/// Output format for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Apply workflows, permissions, and secrets to every configured repository.
///
/// Configuration and workflow-source problems abort before any repository is
/// contacted. Everything after that is recorded per repository in the report.
pub fn run(options: &LoadOptions, format: OutputFormat) -> Result<BatchReport, AppError> {
    let config = load_config(options, |key| std::env::var(key).ok())?;
    let workflows = load_workflow_files(&config.settings.workflows_dir)?;

    let github = HttpGitHubClient::new(config.token.clone(), &config.settings)?;
    let git = GitCommandAdapter::new(
        config.settings.committer_name.clone(),
        config.settings.committer_email.clone(),
    )
    .redacting(config.token.expose());
    let ctx = AppContext::new(github, git, SealedBoxSealer::new());

    let progress = match format {
        OutputFormat::Text => Progress::Stdout,
        OutputFormat::Json => Progress::Stderr,
    };
    let batch = Orchestrator::new(&ctx, &config, &workflows)?.with_progress(progress).run();

    match format {
        OutputFormat::Text => print!("{}", report::render_text(&batch)),
        OutputFormat::Json => println!("{}", report::render_json(&batch)?),
    }

    Ok(batch)
}

/// Validate configuration and print what a run would do, without network or git access.
pub fn plan(options: &LoadOptions) -> Result<Plan, AppError> {
    let config = load_config(options, |key| std::env::var(key).ok())?;
    let workflows = load_workflow_files(&config.settings.workflows_dir)?;

    let plan = Plan::build(&config, &workflows)?;
    print!("{}", plan.render());
    Ok(plan)
}
