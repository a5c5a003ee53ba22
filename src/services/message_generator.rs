use async_trait::async_trait;

use crate::domain::message::{CandidateMessage, GenerationRequest};
use crate::error::ProviderError;

/// A backend that turns a staged diff into a candidate commit message.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_message(
        &self,
        request: &GenerationRequest,
    ) -> Result<CandidateMessage, ProviderError>;
}
