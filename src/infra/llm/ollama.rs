//! Local inference through the `ollama` CLI.

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::{LocalSettings, OLLAMA_PROVIDER};
use crate::domain::message::{CandidateMessage, GenerationRequest};
use crate::error::ProviderError;
use crate::services::MessageGenerator;

pub struct OllamaGenerator {
    settings: LocalSettings,
}

impl OllamaGenerator {
    pub fn new(settings: LocalSettings) -> Self {
        Self { settings }
    }

    fn unreachable(detail: String) -> ProviderError {
        ProviderError::Unreachable {
            provider: OLLAMA_PROVIDER.to_string(),
            detail,
        }
    }
}

#[async_trait]
impl MessageGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        OLLAMA_PROVIDER
    }

    async fn generate_message(
        &self,
        request: &GenerationRequest,
    ) -> Result<CandidateMessage, ProviderError> {
        let model = request
            .options
            .model
            .as_deref()
            .unwrap_or(&self.settings.model);
        debug!(
            "Invoking {} run {} (timeout {}s)",
            self.settings.program,
            model,
            self.settings.timeout.as_secs()
        );

        // The diff can exceed the per-argument size limit, so the prompt goes through stdin.
        let mut child = Command::new(&self.settings.program)
            .arg("run")
            .arg(model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => Self::unreachable(format!(
                    "`{}` not found; install Ollama or set COMMITSKI_OLLAMA_BIN",
                    self.settings.program
                )),
                _ => Self::unreachable(format!(
                    "failed to spawn `{}`: {err}",
                    self.settings.program
                )),
            })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| {
                Self::unreachable("stdin of the local model was not captured".to_string())
            })?;
        let prompt = request.prompt();

        let send_prompt = async move {
            let written = stdin.write_all(prompt.as_bytes()).await;
            drop(stdin);
            written
        };
        let (written, output) = timeout(
            self.settings.timeout,
            async { tokio::join!(send_prompt, child.wait_with_output()) },
        )
        .await
        .map_err(|_| ProviderError::Timeout {
            provider: OLLAMA_PROVIDER.to_string(),
            seconds: self.settings.timeout.as_secs(),
        })?;

        let output = output.map_err(|err| {
            Self::unreachable(format!("failed to wait for `{}`: {err}", self.settings.program))
        })?;
        // A process that exits without reading its input closes the pipe early.
        match written {
            Err(err) if err.kind() != ErrorKind::BrokenPipe => {
                return Err(Self::unreachable(format!(
                    "failed to send prompt to `{}`: {err}",
                    self.settings.program
                )));
            }
            _ => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            return Err(Self::unreachable(format!(
                "`{}` exited with code {code}: {stderr}",
                self.settings.program
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        CandidateMessage::from_raw(OLLAMA_PROVIDER, &stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::domain::change::ChangeSet;
    use crate::domain::message::GenerationOptions;

    fn script(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-ollama");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn generator(program: String, timeout: Duration) -> OllamaGenerator {
        OllamaGenerator::new(LocalSettings {
            program,
            model: "deepseek-r1:8b".to_string(),
            timeout,
        })
    }

    fn request(model: Option<&str>) -> GenerationRequest {
        GenerationRequest::new(
            &ChangeSet::new("added line X"),
            OLLAMA_PROVIDER,
            GenerationOptions {
                model: model.map(str::to_string),
                ..GenerationOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn returns_cleaned_model_output() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "printf '<think>pondering</think>\\n\\nAdd X\\n'");

        let candidate = generator(program, Duration::from_secs(10))
            .generate_message(&request(None))
            .await
            .unwrap();
        assert_eq!(candidate.as_str(), "Add X");
    }

    #[tokio::test]
    async fn passes_model_as_argument_and_prompt_on_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo \"$1|$2|$3\"");

        let candidate = generator(program, Duration::from_secs(10))
            .generate_message(&request(Some("llama3")))
            .await
            .unwrap();
        assert_eq!(candidate.as_str(), "run|llama3|");
    }

    #[tokio::test]
    async fn large_diff_is_sent_through_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "cat");
        let diff = format!("{}\nEND-OF-DIFF", "+added line X\n".repeat(12_000));
        let request = GenerationRequest::new(
            &ChangeSet::new(diff.as_str()),
            OLLAMA_PROVIDER,
            GenerationOptions::default(),
        );

        let candidate = generator(program, Duration::from_secs(10))
            .generate_message(&request)
            .await
            .unwrap();
        assert!(candidate.as_str().len() > 128 * 1024);
        assert!(candidate.as_str().starts_with("Analyze the following changes"));
        assert!(candidate.as_str().ends_with("END-OF-DIFF"));
    }

    #[tokio::test]
    async fn process_ignoring_stdin_still_answers() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo 'Add X'");
        let diff = "+added line X\n".repeat(12_000);
        let request = GenerationRequest::new(
            &ChangeSet::new(diff),
            OLLAMA_PROVIDER,
            GenerationOptions::default(),
        );

        let candidate = generator(program, Duration::from_secs(10))
            .generate_message(&request)
            .await
            .unwrap();
        assert_eq!(candidate.as_str(), "Add X");
    }

    #[tokio::test]
    async fn slow_process_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "sleep 5");

        let error = generator(program, Duration::from_millis(200))
            .generate_message(&request(None))
            .await
            .unwrap_err();
        assert!(matches!(error, ProviderError::Timeout { .. }));
    }

    #[tokio::test]
    async fn failing_process_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo 'model not found' >&2; exit 1");

        let error = generator(program, Duration::from_secs(10))
            .generate_message(&request(None))
            .await
            .unwrap_err();
        assert!(
            matches!(error, ProviderError::Unreachable { detail, .. } if detail.contains("model not found"))
        );
    }

    #[tokio::test]
    async fn missing_binary_is_unreachable() {
        let error = generator(
            "commitski-no-such-binary".to_string(),
            Duration::from_secs(1),
        )
        .generate_message(&request(None))
        .await
        .unwrap_err();
        assert!(matches!(error, ProviderError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn blank_output_is_empty_response() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo ''");

        let error = generator(program, Duration::from_secs(10))
            .generate_message(&request(None))
            .await
            .unwrap_err();
        assert!(matches!(error, ProviderError::EmptyResponse { .. }));
    }
}
