use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::change::ChangeSet;
use crate::error::VcsError;
use crate::services::{PushTarget, VersionControlService};

/// Shells out to the system `git`, inheriting the user's config and credentials.
pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn run_git(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = describe(args);
        debug!("Running command: {command}");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::CommandFailed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Log-friendly rendering; the message argument of `commit` is elided.
fn describe(args: &[&str]) -> String {
    let shown: Vec<&str> = if args.first() == Some(&"commit") {
        args.iter()
            .take_while(|arg| **arg != "-m")
            .copied()
            .chain(["-m", "<message>"])
            .collect()
    } else {
        args.to_vec()
    };
    format!("git {}", shown.join(" "))
}

#[async_trait]
impl VersionControlService for GitCli {
    fn is_repository(&self) -> bool {
        // `.git` is a file inside linked worktrees.
        self.workspace_root.join(".git").exists()
    }

    async fn stage_all(&self) -> Result<(), VcsError> {
        self.run_git(&["add", "--all"]).await.map(|_| ())
    }

    async fn diff_staged(&self) -> Result<ChangeSet, VcsError> {
        let diff = self
            .run_git(&["diff", "--cached", "--no-color", "--no-ext-diff"])
            .await?;
        Ok(ChangeSet::new(diff))
    }

    async fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.run_git(&["commit", "--cleanup=verbatim", "-m", message])
            .await
            .map(|_| ())
    }

    async fn push(&self, target: &PushTarget) -> Result<(), VcsError> {
        self.run_git(&["push", target.remote.as_str(), target.refspec()])
            .await
            .map(|_| ())
    }
}
