use crate::error::Result;
use std::time::Duration;

/// Browser actions for automation
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Visible labels of a dropdown's options, in document order
    async fn list_options(&self, selector: &str) -> Result<Vec<String>>;

    /// Select the dropdown option whose label is exactly `label`
    async fn select_option(&self, selector: &str, label: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Read an attribute of the first element matching a selector
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Current rendered page HTML
    async fn page_content(&self) -> Result<String>;
}

/// One exclusively owned browser instance.
///
/// Must be released exactly once; `release` consumes the session so a
/// released session cannot be driven again.
#[async_trait::async_trait]
pub trait BrowserSession: BrowserActions {
    /// Shut the browser down
    async fn release(self: Box<Self>) -> Result<()>;
}

/// Starts fresh browser sessions.
#[async_trait::async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Launch a new, isolated session
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// CSS selector for a form control given by `name` or `id`.
#[must_use]
pub fn control_selector(identifier: &str) -> String {
    let quoted = css_string(identifier);
    format!("select[name={quoted}], select[id={quoted}]")
}

/// Quote a value for use inside a CSS attribute selector.
fn css_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
