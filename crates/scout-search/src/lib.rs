//! Scout Search - directory search orchestration.
//!
//! This crate turns extracted filter criteria into a set of concrete searches,
//! runs each one against the directory's search form and merges the results.
//!
//! # Features
//!
//! - Normalization of scalar-or-list filter values into per-category slots
//! - Deterministic Cartesian-product planning of filter combinations
//! - A paginated retrieval state machine with per-combination failure isolation
//! - Order-preserving deduplication of the combined dataset
//! - CSV export of the final dataset
//!
//! # Example
//!
//! ```rust,ignore
//! use scout_search::{plan_from_raw, SearchOrchestrator};
//! use scout_browser::ChromiumLauncher;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let plan = plan_from_raw(&filters);
//! let orchestrator = SearchOrchestrator::new(
//!     Arc::new(ChromiumLauncher::new(config.browser.clone())),
//!     config.search.clone(),
//! )?;
//!
//! let report = orchestrator.run(&plan, &CancellationToken::new()).await;
//! println!("{}", report.summary());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
#[allow(missing_docs)]
pub mod error;
pub mod export;
#[allow(missing_docs)]
pub mod filter;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
pub mod planner;
pub mod retriever;

// Re-export commonly used types
pub use aggregator::aggregate;
pub use error::{Result, SearchError};
pub use export::{output_path, write_csv};
pub use filter::{normalize, FilterSlot, NormalizedFilters};
pub use orchestrator::{RunSummary, SearchOrchestrator, SearchReport};
pub use parser::ResultParser;
pub use planner::{plan, plan_from_raw};
pub use retriever::{CombinationOutcome, CombinationRun, PaginatedRetriever, RetrievalState};
