use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("no option '{option}' in control {control}")]
    OptionNotFound { control: String, option: String },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("script evaluation failed: {0}")]
    ScriptError(String),

    #[error("session error: {0}")]
    SessionError(String),
}

impl BrowserError {
    /// Whether the error is a bounded wait that ran out or an element that never showed up.
    #[must_use]
    pub fn is_missing_element(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::SelectorNotFound(_))
    }
}
