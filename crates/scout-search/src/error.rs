use scout_core::{FilterCategory, FilterValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no {category} option matches '{value}'")]
    Selection {
        category: FilterCategory,
        value: FilterValue,
    },

    #[error("search form did not render: {0}")]
    FormTimeout(String),

    #[error("results table did not render: {0}")]
    ResultsTimeout(String),

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(#[from] scout_browser::BrowserError),

    #[error("CSV export error: {0}")]
    Export(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// True when a requested value had no matching dropdown option.
    #[must_use]
    pub fn is_selection_failure(&self) -> bool {
        matches!(
            self,
            Self::Selection { .. }
                | Self::Browser(scout_browser::BrowserError::OptionNotFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
