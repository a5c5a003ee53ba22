use async_trait::async_trait;

use crate::domain::change::ChangeSet;
use crate::error::VcsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub remote: String,
    /// `None` pushes whatever branch `HEAD` points at.
    pub branch: Option<String>,
}

impl PushTarget {
    pub fn refspec(&self) -> &str {
        self.branch.as_deref().unwrap_or("HEAD")
    }
}

impl Default for PushTarget {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: None,
        }
    }
}

#[async_trait]
pub trait VersionControlService: Send + Sync {
    fn is_repository(&self) -> bool;
    async fn stage_all(&self) -> Result<(), VcsError>;
    /// An empty diff is a valid result; callers decide what it means.
    async fn diff_staged(&self) -> Result<ChangeSet, VcsError>;
    /// `message` is recorded exactly as given.
    async fn commit(&self, message: &str) -> Result<(), VcsError>;
    async fn push(&self, target: &PushTarget) -> Result<(), VcsError>;
}
