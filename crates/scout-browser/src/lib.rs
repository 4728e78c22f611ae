//! Browser automation for the directory search form.
//!
//! Provides headless Chromium control behind the [`BrowserActions`] trait so
//! the search engine can be driven against a real browser or a scripted fake.

pub mod actions;
pub mod engine;
pub mod error;
pub mod script;

pub use actions::{control_selector, BrowserActions, BrowserSession, SessionLauncher};
pub use engine::{BrowserEngine, ChromiumLauncher};
pub use error::{BrowserError, Result};
