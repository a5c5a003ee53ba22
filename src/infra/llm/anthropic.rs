//! Chat-style backend (`/v1/messages`).

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use super::{missing_credential, send_error, status_error};
use crate::config::{ANTHROPIC_PROVIDER, RemoteSettings};
use crate::domain::message::{CandidateMessage, GenerationRequest};
use crate::error::ProviderError;
use crate::services::MessageGenerator;

const API_VERSION: &str = "2023-06-01";

pub struct AnthropicGenerator {
    http: Client,
    settings: RemoteSettings,
}

impl AnthropicGenerator {
    pub fn new(http: Client, settings: RemoteSettings) -> Self {
        Self { http, settings }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/messages",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl MessageGenerator for AnthropicGenerator {
    fn name(&self) -> &str {
        ANTHROPIC_PROVIDER
    }

    async fn generate_message(
        &self,
        request: &GenerationRequest,
    ) -> Result<CandidateMessage, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| missing_credential(ANTHROPIC_PROVIDER, "ANTHROPIC_API_KEY"))?;

        let body = MessagesRequest {
            model: request
                .options
                .model
                .as_deref()
                .unwrap_or(&self.settings.model),
            max_tokens: request.options.max_output_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt(),
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| send_error(ANTHROPIC_PROVIDER, err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(status_error(ANTHROPIC_PROVIDER, status, &text));
        }

        let payload: MessagesResponse =
            response
                .json()
                .await
                .map_err(|err| ProviderError::Unreachable {
                    provider: ANTHROPIC_PROVIDER.to_string(),
                    detail: format!("failed to parse response: {err}"),
                })?;

        let text = payload
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        CandidateMessage::from_raw(ANTHROPIC_PROVIDER, &text)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}
