use crate::domain::message::FinalMessage;
use crate::error::{EXIT_CANCELLED, EXIT_PUSH_FAILED, VcsError};

/// Terminal state of a run that got past message generation.
#[derive(Debug)]
pub enum CommitOutcome {
    /// Committed and pushed.
    Pushed { message: FinalMessage },
    /// Committed; the push step was skipped on request.
    CommittedLocally { message: FinalMessage },
    /// Committed locally, but the push failed.
    PushFailed {
        message: FinalMessage,
        error: VcsError,
    },
    /// Review was cancelled; staged changes stay staged.
    Cancelled,
}

impl CommitOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommitOutcome::Pushed { .. } | CommitOutcome::CommittedLocally { .. } => 0,
            CommitOutcome::PushFailed { .. } => EXIT_PUSH_FAILED,
            CommitOutcome::Cancelled => EXIT_CANCELLED,
        }
    }

    pub fn committed(&self) -> Option<&FinalMessage> {
        match self {
            CommitOutcome::Pushed { message }
            | CommitOutcome::CommittedLocally { message }
            | CommitOutcome::PushFailed { message, .. } => Some(message),
            CommitOutcome::Cancelled => None,
        }
    }
}
