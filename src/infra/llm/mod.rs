//! Message generator backends and the registry built from configuration.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ProviderError};
use crate::services::ProviderRegistry;

pub use anthropic::AnthropicGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);
const ERROR_BODY_LIMIT: usize = 300;

pub fn build_registry(config: &AppConfig) -> AppResult<ProviderRegistry> {
    let http = reqwest::Client::builder()
        .timeout(REMOTE_TIMEOUT)
        .build()
        .map_err(|err| AppError::Configuration(format!("failed to build HTTP client: {err}")))?;

    Ok(ProviderRegistry::new()
        .with(Arc::new(OllamaGenerator::new(config.ollama.clone())))
        .with(Arc::new(OpenAiGenerator::new(
            http.clone(),
            config.openai.clone(),
        )))
        .with(Arc::new(AnthropicGenerator::new(
            http,
            config.anthropic.clone(),
        ))))
}

pub(crate) fn missing_credential(provider: &str, variable: &str) -> ProviderError {
    ProviderError::Unauthenticated {
        provider: provider.to_string(),
        detail: format!("{variable} is not set"),
    }
}

pub(crate) fn send_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            seconds: REMOTE_TIMEOUT.as_secs(),
        }
    } else {
        ProviderError::Unreachable {
            provider: provider.to_string(),
            detail: err.to_string(),
        }
    }
}

pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> ProviderError {
    let detail = format!("{status}: {}", error_detail(body));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthenticated {
            provider: provider.to_string(),
            detail,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderError::Timeout {
            provider: provider.to_string(),
            seconds: REMOTE_TIMEOUT.as_secs(),
        },
        _ => ProviderError::Unreachable {
            provider: provider.to_string(),
            detail,
        },
    }
}

/// Pulls `error.message` out of a JSON error body, falling back to the raw text.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(ERROR_BODY_LIMIT).collect())
}
