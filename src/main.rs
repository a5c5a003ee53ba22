mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cmd::commit::{self, CommitCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::outcome::CommitOutcome;
use crate::error::AppResult;
use crate::infra::editor::ExternalEditor;
use crate::infra::git::GitCli;
use crate::infra::llm::build_registry;
use crate::infra::terminal::StdioTerminal;

#[derive(Parser)]
#[command(
    name = "commitski",
    author,
    version,
    about = "Generate a commit message for staged changes, review it, then commit and push"
)]
struct Cli {
    /// Message generator backend: ollama, openai or anthropic.
    provider: Option<String>,
    /// Override the backend's configured model for this run.
    #[arg(short, long)]
    model: Option<String>,
    /// Remote to push to.
    #[arg(long)]
    remote: Option<String>,
    /// Branch to push; defaults to the current HEAD.
    #[arg(long)]
    branch: Option<String>,
    /// Commit without pushing.
    #[arg(long)]
    no_push: bool,
    /// Commit the edited message as soon as the editor closes.
    #[arg(long)]
    commit_after_edit: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commitski=info")),
        )
        .with_target(false)
        .init();

    let code = match run().await {
        Ok(outcome) => report(&outcome),
        Err(error) => {
            eprintln!("Error: {error}");
            error.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run() -> AppResult<CommitOutcome> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let mut config = AppConfig::load(&cwd)?;

    if let Some(remote) = cli.remote {
        config.push_target.remote = remote;
    }
    if cli.branch.is_some() {
        config.push_target.branch = cli.branch;
    }
    for (label, value) in config.summary() {
        debug!("{label}: {value}");
    }

    let providers = build_registry(&config)?;
    let git = Arc::new(GitCli::new(config.workspace_root.clone()));
    let editor = Arc::new(ExternalEditor::new(config.editor.clone()));
    let context = AppContext::new(config, git, providers, Arc::new(StdioTerminal), editor);

    commit::run(
        &context,
        CommitCommandArgs {
            provider: cli.provider,
            model: cli.model,
            no_push: cli.no_push,
            commit_after_edit: cli.commit_after_edit,
        },
    )
    .await
}

fn report(outcome: &CommitOutcome) -> i32 {
    if let Some(message) = outcome.committed() {
        info!("Committed with message: {}", message.as_str().lines().next().unwrap_or_default());
    }
    match outcome {
        CommitOutcome::Pushed { .. } => {
            info!("Commit process completed successfully.");
        }
        CommitOutcome::CommittedLocally { .. } => {
            info!("Commit process completed; changes were not pushed.");
        }
        CommitOutcome::PushFailed { error, .. } => {
            eprintln!("Error: committed but push failed: {error}");
            eprintln!("The commit exists locally; push it manually once the remote is reachable.");
        }
        CommitOutcome::Cancelled => {
            eprintln!("Commit cancelled by user; no changes were committed.");
        }
    }
    outcome.exit_code()
}
