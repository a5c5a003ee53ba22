use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::message::{GenerationOptions, GenerationRequest};
use crate::domain::outcome::CommitOutcome;
use crate::error::{AppResult, PreconditionError};
use crate::workflow::review::{EditPolicy, ReviewController, ReviewOutcome};

#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Falls back to the configured default provider.
    pub provider: Option<String>,
    pub model: Option<String>,
    pub skip_push: bool,
    pub edit_policy: EditPolicy,
}

/// Stage, generate, review, commit and push, stopping at the first failure.
///
/// Staging happens before the provider name is validated, so an unknown
/// provider still leaves the working tree staged.
pub async fn commit_staged_changes(
    ctx: &AppContext,
    options: &CommitOptions,
) -> AppResult<CommitOutcome> {
    info!("Starting the commit process...");
    let vcs = &ctx.version_control;

    if !vcs.is_repository() {
        error!("Precondition failed: not a git repository");
        return Err(PreconditionError::NotARepository(ctx.config.workspace_root.clone()).into());
    }

    info!("Staging all changes...");
    vcs.stage_all()
        .await
        .inspect_err(|err| error!("Staging failed: {err}"))?;

    info!("Retrieving staged changes...");
    let changes = vcs
        .diff_staged()
        .await
        .inspect_err(|err| error!("Reading the staged diff failed: {err}"))?;
    if changes.is_empty() {
        warn!("Nothing to commit: no staged changes");
        return Err(PreconditionError::NothingToCommit.into());
    }
    info!("Found {}", changes.stats());

    let provider_name = options
        .provider
        .as_deref()
        .unwrap_or(&ctx.config.default_provider);
    let generator = ctx
        .providers
        .resolve(provider_name)
        .inspect_err(|err| error!("Provider selection failed: {err}"))?;

    let request = GenerationRequest::new(
        &changes,
        generator.name(),
        GenerationOptions {
            model: options.model.clone(),
            ..GenerationOptions::default()
        },
    );
    info!("Requesting commit message from {}...", request.provider);
    let candidate = generator
        .generate_message(&request)
        .await
        .inspect_err(|err| error!("Message generation failed: {err}"))?;
    info!("Received commit message from {}.", generator.name());

    let reviewer = ReviewController::new(
        ctx.terminal.as_ref(),
        ctx.editor.as_ref(),
        options.edit_policy,
    );
    let message = match reviewer
        .review(candidate)
        .inspect_err(|err| error!("Review failed: {err}"))?
    {
        ReviewOutcome::Accepted(message) => message,
        ReviewOutcome::Cancelled => {
            info!("Commit cancelled by user. No changes were committed; staged changes remain staged.");
            return Ok(CommitOutcome::Cancelled);
        }
    };

    info!("Committing changes...");
    vcs.commit(message.as_str())
        .await
        .inspect_err(|err| error!("Commit failed, nothing was committed: {err}"))?;
    info!("Commit created.");

    if options.skip_push {
        info!("Push skipped; the commit exists only locally.");
        return Ok(CommitOutcome::CommittedLocally { message });
    }

    let target = &ctx.config.push_target;
    info!("Pushing to {} {}...", target.remote, target.refspec());
    match vcs.push(target).await {
        Ok(()) => {
            info!("Push completed.");
            Ok(CommitOutcome::Pushed { message })
        }
        Err(err) => {
            error!("Committed locally, but push failed: {err}");
            Ok(CommitOutcome::PushFailed {
                message,
                error: err,
            })
        }
    }
}
