//! Configuration management for herdscout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::FilterCategory;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/herdscout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search form and pagination settings
    pub search: SearchConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Filter extraction (LLM) settings
    pub llm: LlmConfig,
    /// Output artifact settings
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `HERDSCOUT_ENDPOINT_URL`: Override the directory search URL
    /// - `HERDSCOUT_HEADLESS`: Override browser headless mode (true/false)
    /// - `HERDSCOUT_OUTPUT_DIR`: Override the CSV output directory
    /// - `HERDSCOUT_GEMINI_MODEL`: Override the Gemini model name
    /// - `GEMINI_API_KEY`: API key for filter extraction
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides to an already loaded config.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("HERDSCOUT_ENDPOINT_URL") {
            tracing::debug!("Override search.endpoint_url from env: {}", val);
            self.search.endpoint_url = val;
        }

        if let Ok(val) = std::env::var("HERDSCOUT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("HERDSCOUT_OUTPUT_DIR") {
            tracing::debug!("Override output.directory from env: {}", val);
            self.output.directory = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("HERDSCOUT_GEMINI_MODEL") {
            tracing::debug!("Override llm.model from env: {}", val);
            self.llm.model = val;
        }

        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            if !val.trim().is_empty() {
                self.llm.api_key = Some(val.trim().to_string());
            }
        }
    }

    /// Check values that would otherwise fail deep inside a run.
    pub fn validate(&self) -> ConfigResult<()> {
        url::Url::parse(&self.search.endpoint_url).map_err(|e| ConfigError::InvalidValue {
            field: "search.endpoint_url".to_string(),
            reason: e.to_string(),
        })?;

        if self.search.step_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.step_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.output.file_stem.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.file_stem".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/herdscout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "herdscout", "herdscout").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Directory search form settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// URL of the directory search form
    pub endpoint_url: String,
    /// Upper bound for every wait on a form control or results table
    pub step_timeout_secs: u64,
    /// Settle delay after a member or breed selection
    pub settle_delay_ms: u64,
    /// Settle delay after the location selection, which repopulates later dropdowns
    pub dependent_settle_delay_ms: u64,
    /// Settle delay after submitting the form
    pub submit_settle_delay_ms: u64,
    /// Settle delay after moving to the next results page
    pub page_settle_delay_ms: u64,
    /// Form and result element identifiers
    pub selectors: FormSelectors,
}

impl SearchConfig {
    /// Bounded wait for a single step.
    #[must_use]
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "https://www.amgr.org/frm_directorySearch.cfm".to_string(),
            step_timeout_secs: 10,
            settle_delay_ms: 1000,
            dependent_settle_delay_ms: 2000,
            submit_settle_delay_ms: 3000,
            page_settle_delay_ms: 2000,
            selectors: FormSelectors::default(),
        }
    }
}

/// Identifiers of the search form controls and the results view.
///
/// Dropdown controls are given by `name`/`id`; everything else is a CSS selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSelectors {
    /// Location (state) dropdown name
    pub location_control: String,
    /// Member dropdown name
    pub member_control: String,
    /// Breed dropdown name
    pub breed_control: String,
    /// Submit button
    pub submit_button: String,
    /// Element whose presence means results have rendered
    pub results_table: String,
    /// Data rows of the results table
    pub result_rows: String,
    /// Container of the next-page control, carries the disabled class
    pub next_page: String,
    /// Clickable part of the next-page control
    pub next_page_link: String,
    /// Class marking the next-page control as disabled
    pub disabled_class: String,
}

impl FormSelectors {
    /// Dropdown control name for a filter category.
    #[must_use]
    pub fn control_for(&self, category: FilterCategory) -> &str {
        match category {
            FilterCategory::Location => &self.location_control,
            FilterCategory::Member => &self.member_control,
            FilterCategory::BreedType => &self.breed_control,
        }
    }
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            location_control: "stateID".to_string(),
            member_control: "memberID".to_string(),
            breed_control: "breedID".to_string(),
            submit_button: "#submitButton".to_string(),
            results_table: "table".to_string(),
            result_rows: "table.table tbody tr".to_string(),
            next_page: "#example_next".to_string(),
            next_page_link: "#example_next a".to_string(),
            disabled_class: "disabled".to_string(),
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Browser launch and CDP request timeout in seconds
    pub launch_timeout_secs: u64,
    /// How often a bounded wait re-checks its condition
    pub poll_interval_ms: u64,
}

impl BrowserConfig {
    /// Poll interval for bounded waits.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Launch and CDP request timeout.
    #[must_use]
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_secs(self.launch_timeout_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            launch_timeout_secs: 30,
            poll_interval_ms: 250,
        }
    }
}

/// Filter extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini model name
    pub model: String,
    /// Gemini API key (read from `GEMINI_API_KEY`, never written to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for completions
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            timeout_secs: 60,
            temperature: 0.0,
        }
    }
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the CSV is written to
    pub directory: PathBuf,
    /// File name without extension or timestamp
    pub file_stem: String,
    /// Append a generation timestamp to the file name
    pub timestamped: bool,
    /// Rows echoed to the terminal after a run
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_stem: "amgr_search_results".to_string(),
            timestamped: true,
            preview_rows: 5,
        }
    }
}
