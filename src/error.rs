use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NOTHING_TO_COMMIT: i32 = 3;
pub const EXIT_CANCELLED: i32 = 4;
pub const EXIT_PUSH_FAILED: i32 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("version control error: {0}")]
    VersionControl(#[from] VcsError),
    #[error("language model error: {0}")]
    Provider(#[from] ProviderError),
    #[error("review error: {0}")]
    Review(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Precondition(PreconditionError::NothingToCommit) => EXIT_NOTHING_TO_COMMIT,
            _ => EXIT_FAILURE,
        }
    }
}

#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),
    #[error("nothing to commit: no staged changes")]
    NothingToCommit,
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("`{command}` exited unsuccessfully: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} credential missing or rejected: {detail}")]
    Unauthenticated { provider: String, detail: String },
    #[error("{provider} unreachable: {detail}")]
    Unreachable { provider: String, detail: String },
    #[error("{provider} timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },
    #[error("unsupported provider '{name}' (expected one of: {expected})")]
    UnsupportedProvider { name: String, expected: String },
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: String },
}

pub type AppResult<T> = Result<T, AppError>;
