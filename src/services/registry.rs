use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ProviderError;
use crate::services::MessageGenerator;

/// Name-to-backend mapping, assembled once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn MessageGenerator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, generator: Arc<dyn MessageGenerator>) -> Self {
        self.providers
            .insert(generator.name().to_lowercase(), generator);
        self
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn MessageGenerator>, ProviderError> {
        self.providers
            .get(&name.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| ProviderError::UnsupportedProvider {
                name: name.to_string(),
                expected: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }
}
