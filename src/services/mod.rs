pub mod message_generator;
pub mod registry;
pub mod review;
pub mod version_control;

pub use message_generator::MessageGenerator;
pub use registry::ProviderRegistry;
pub use review::{MessageEditor, ReviewTerminal};
pub use version_control::{PushTarget, VersionControlService};
