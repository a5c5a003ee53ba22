use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::MessageEditor;

/// Runs the user's editor on a scratch file that is removed when the edit ends,
/// whichever way it ends.
pub struct ExternalEditor {
    command: String,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl MessageEditor for ExternalEditor {
    fn edit(&self, initial: &str) -> AppResult<String> {
        let (program, args) = split_command(&self.command)
            .ok_or_else(|| AppError::Configuration("editor command is empty".to_string()))?;

        let mut scratch = tempfile::Builder::new()
            .prefix("COMMITSKI_EDITMSG-")
            .suffix(".txt")
            .tempfile()?;
        scratch.write_all(initial.as_bytes())?;
        scratch.flush()?;
        debug!("Opening {} in {}", scratch.path().display(), self.command);

        let status = Command::new(program)
            .args(args)
            .arg(scratch.path())
            .status()
            .map_err(|err| AppError::Review(format!("failed to launch editor `{program}`: {err}")))?;

        if !status.success() {
            return Err(AppError::Review(format!(
                "editor `{program}` exited with {status}"
            )));
        }

        read_back(&scratch)
    }
}

/// Splits `VISUAL`/`EDITOR` into program and arguments. A value naming an
/// existing file is the program on its own, so paths with spaces still work.
fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }
    if Path::new(command).is_file() {
        return Some((command, Vec::new()));
    }
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

// Editors often save by renaming a new file over the old one, so re-open by path.
fn read_back(scratch: &NamedTempFile) -> AppResult<String> {
    Ok(fs::read_to_string(scratch.path())?)
}
