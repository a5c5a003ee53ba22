use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{MessageEditor, ProviderRegistry, ReviewTerminal, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub providers: ProviderRegistry,
    pub terminal: Arc<dyn ReviewTerminal>,
    pub editor: Arc<dyn MessageEditor>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        providers: ProviderRegistry,
        terminal: Arc<dyn ReviewTerminal>,
        editor: Arc<dyn MessageEditor>,
    ) -> Self {
        Self {
            config,
            version_control,
            providers,
            terminal,
            editor,
        }
    }
}
