//! JavaScript snippets evaluated in the page for dropdown handling.
//!
//! Selectors and labels are embedded as JSON string literals, which are
//! valid JavaScript string literals.

use serde::Deserialize;

/// Outcome reported by [`select_option`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectOutcome {
    Selected,
    NoOption,
    Missing,
}

fn literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Result of [`list_options`].
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsListing {
    pub found: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Reports whether the control exists and, if so, its trimmed option labels.
pub fn list_options(selector: &str) -> String {
    format!(
        r"(() => {{
  const el = document.querySelector({sel});
  if (!el || !el.options) return {{ found: false, options: [] }};
  return {{ found: true, options: Array.from(el.options).map(o => o.text.trim()) }};
}})()",
        sel = literal(selector)
    )
}

/// Selects by exact label and fires the events a user selection would.
///
/// Dependent dropdowns on the form listen for `change`.
pub fn select_option(selector: &str, label: &str) -> String {
    format!(
        r"(() => {{
  const el = document.querySelector({sel});
  if (!el || !el.options) return 'missing';
  const idx = Array.from(el.options).findIndex(o => o.text.trim() === {label});
  if (idx < 0) return 'no-option';
  el.selectedIndex = idx;
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return 'selected';
}})()",
        sel = literal(selector),
        label = literal(label.trim())
    )
}
