//! Scout LLM - natural-language filter extraction.
//!
//! This crate turns a free-text request such as
//! "find members A and B in Kansas and Texas" into a raw filter mapping the
//! search engine can plan from.
//!
//! # Features
//!
//! - **Provider Abstraction**: a small trait the interpreter is written against
//! - **Gemini Provider**: Google's `generateContent` API with JSON output
//! - **Failure Isolation**: extraction errors degrade to "no filters"
//!
//! # Example
//!
//! ```rust,no_run
//! use scout_llm::{FilterInterpreter, GeminiProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = GeminiProvider::new("api-key")?;
//! let interpreter = FilterInterpreter::new(Arc::new(provider));
//!
//! let filters = interpreter.interpret("find members in Kansas and Texas").await;
//! println!("{filters:?}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod interpreter;
pub mod provider;
pub mod providers;

// Re-export commonly used types
pub use error::{LlmError, Result};
pub use interpreter::FilterInterpreter;
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, Message, Role, Usage};
pub use providers::GeminiProvider;
