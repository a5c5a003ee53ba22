use crate::domain::change::ChangeSet;
use crate::error::ProviderError;

pub const COMMIT_MESSAGE_INSTRUCTIONS: &str = "Analyze the following changes and write a concise, detailed commit message. \
Start with a short summary line, optionally followed by a blank line and a brief body. \
Respond only with the commit message, nothing else.";

/// Output budget shared by every remote backend.
pub const MAX_OUTPUT_TOKENS: u32 = 200;

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Overrides the backend's configured model for this request.
    pub model: Option<String>,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub diff: String,
    pub provider: String,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(changes: &ChangeSet, provider: &str, options: GenerationOptions) -> Self {
        Self {
            diff: changes.as_str().to_string(),
            provider: provider.to_string(),
            options,
        }
    }

    pub fn prompt(&self) -> String {
        format!("{COMMIT_MESSAGE_INSTRUCTIONS}\n\n{}", self.diff)
    }
}

/// Unreviewed generator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMessage(String);

impl CandidateMessage {
    /// Cleans raw backend output, dropping any reasoning trace a local model
    /// prints before its answer.
    pub fn from_raw(provider: &str, raw: &str) -> Result<Self, ProviderError> {
        let cleaned = strip_reasoning(raw).trim();
        if cleaned.is_empty() {
            return Err(ProviderError::EmptyResponse {
                provider: provider.to_string(),
            });
        }
        Ok(Self(cleaned.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn strip_reasoning(raw: &str) -> &str {
    let after_close = match raw.rfind(THINK_CLOSE) {
        Some(index) => &raw[index + THINK_CLOSE.len()..],
        None => raw,
    };
    match after_close.find(THINK_OPEN) {
        Some(index) => &after_close[..index],
        None => after_close,
    }
}

/// Reviewed text that goes into the commit verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalMessage(String);

impl FinalMessage {
    /// Returns `None` when nothing but whitespace remains.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
