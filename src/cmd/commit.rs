use crate::context::AppContext;
use crate::domain::outcome::CommitOutcome;
use crate::error::AppResult;
use crate::workflow::commit::{CommitOptions, commit_staged_changes};
use crate::workflow::review::EditPolicy;

#[derive(Debug, Clone, Default)]
pub struct CommitCommandArgs {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub no_push: bool,
    pub commit_after_edit: bool,
}

impl From<CommitCommandArgs> for CommitOptions {
    fn from(args: CommitCommandArgs) -> Self {
        Self {
            provider: args.provider,
            model: args.model,
            skip_push: args.no_push,
            edit_policy: if args.commit_after_edit {
                EditPolicy::CommitImmediately
            } else {
                EditPolicy::Represent
            },
        }
    }
}

pub async fn run(ctx: &AppContext, args: CommitCommandArgs) -> AppResult<CommitOutcome> {
    commit_staged_changes(ctx, &args.into()).await
}
