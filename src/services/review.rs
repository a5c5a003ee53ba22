use crate::error::AppResult;

/// Interactive surface of the review step.
pub trait ReviewTerminal: Send + Sync {
    fn present(&self, message: &str) -> AppResult<()>;
    /// Returns `None` once input is exhausted.
    fn read_decision(&self) -> AppResult<Option<String>>;
}

/// Hands a message to the user's editor and returns the saved text.
pub trait MessageEditor: Send + Sync {
    fn edit(&self, initial: &str) -> AppResult<String>;
}
