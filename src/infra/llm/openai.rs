//! Completion-style backend (`/v1/completions`).

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{missing_credential, send_error, status_error};
use crate::config::{OPENAI_PROVIDER, RemoteSettings};
use crate::domain::message::{CandidateMessage, GenerationRequest};
use crate::error::ProviderError;
use crate::services::MessageGenerator;

pub struct OpenAiGenerator {
    http: Client,
    settings: RemoteSettings,
}

impl OpenAiGenerator {
    pub fn new(http: Client, settings: RemoteSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl MessageGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        OPENAI_PROVIDER
    }

    async fn generate_message(
        &self,
        request: &GenerationRequest,
    ) -> Result<CandidateMessage, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| missing_credential(OPENAI_PROVIDER, "OPENAI_API_KEY"))?;

        let body = CompletionRequest {
            model: request
                .options
                .model
                .as_deref()
                .unwrap_or(&self.settings.model),
            prompt: request.prompt(),
            max_tokens: request.options.max_output_tokens,
        };

        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| send_error(OPENAI_PROVIDER, err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(status_error(OPENAI_PROVIDER, status, &text));
        }

        let payload: CompletionResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Unreachable {
                    provider: OPENAI_PROVIDER.to_string(),
                    detail: format!("failed to parse response: {err}"),
                })?;

        let text = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .unwrap_or_default();
        CandidateMessage::from_raw(OPENAI_PROVIDER, &text)
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}
