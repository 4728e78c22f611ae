//! Scout Core - Foundation crate for herdscout.
//!
//! This crate provides the shared domain types, error handling and
//! configuration management that every other herdscout crate depends on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Filter categories, filter sets and directory result records
//!
//! # Example
//!
//! ```rust
//! use scout_core::{FilterCategory, FilterSet, FilterValue};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let filters = FilterSet::new()
//!     .with(FilterCategory::Location, FilterValue::new("Texas")?);
//!
//! assert_eq!(filters.to_string(), "{location: Texas}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, FormSelectors, LlmConfig, OutputConfig, SearchConfig,
};
pub use error::{ConfigError, ConfigResult, ScoutError};
pub use types::{
    FilterCategory, FilterSet, FilterValue, MatchMode, RawFilterMapping, RawFilterValue,
    ResultRecord,
};
