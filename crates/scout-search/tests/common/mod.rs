//! Scripted in-memory stand-in for the directory search site.

#![allow(dead_code)]

use async_trait::async_trait;
use scout_browser::{BrowserActions, BrowserError, BrowserSession, Result, SessionLauncher};
use scout_core::{ResultRecord, SearchConfig};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Control name to selected label.
pub type Selections = BTreeMap<String, String>;

type PageFn = dyn Fn(&Selections) -> Vec<Vec<ResultRecord>> + Send + Sync;

const SUBMIT: &str = "#submitButton";
const NEXT: &str = "#example_next";
const NEXT_LINK: &str = "#example_next a";
const TABLE: &str = "table";

/// Search config with every delay removed.
pub fn fast_config() -> SearchConfig {
    SearchConfig {
        endpoint_url: "https://directory.example.com/search".to_string(),
        step_timeout_secs: 1,
        settle_delay_ms: 0,
        dependent_settle_delay_ms: 0,
        submit_settle_delay_ms: 0,
        page_settle_delay_ms: 0,
        ..SearchConfig::default()
    }
}

pub fn record(name: &str, location: &str) -> ResultRecord {
    ResultRecord {
        action: "View".to_string(),
        location: location.to_string(),
        name: name.to_string(),
        organization: format!("{name} Farm"),
        phone: "(555) 010-0101".to_string(),
        website_url: format!("https://{}.example.com", name.to_lowercase().replace(' ', "")),
    }
}

/// The site every fake session talks to, plus counters the tests inspect.
pub struct FakeSite {
    options: HashMap<String, Vec<String>>,
    pages: Box<PageFn>,
    form_missing: bool,
    broken_page: Option<usize>,
    pager_missing: bool,
    failing_launches: Vec<usize>,
    launches: AtomicUsize,
    releases: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
            pages: Box::new(|_| Vec::new()),
            form_missing: false,
            broken_page: None,
            pager_missing: false,
            failing_launches: Vec::new(),
            launches: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Dropdown labels for a control, in document order.
    pub fn with_options(mut self, control: &str, labels: &[&str]) -> Self {
        self.options.insert(
            control.to_string(),
            labels.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Result pages served for a given set of selections.
    pub fn with_pages<F>(mut self, pages: F) -> Self
    where
        F: Fn(&Selections) -> Vec<Vec<ResultRecord>> + Send + Sync + 'static,
    {
        self.pages = Box::new(pages);
        self
    }

    /// The search form never renders.
    pub fn without_form(mut self) -> Self {
        self.form_missing = true;
        self
    }

    /// The table never renders on this 1-based page.
    pub fn with_broken_page(mut self, page: usize) -> Self {
        self.broken_page = Some(page);
        self
    }

    /// Result pages render without a next-page control.
    pub fn without_pager(mut self) -> Self {
        self.pager_missing = true;
        self
    }

    /// The `n`th launch (0-based) fails.
    pub fn with_failing_launch(mut self, n: usize) -> Self {
        self.failing_launches.push(n);
        self
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record_action(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

/// Launches sessions against a shared [`FakeSite`].
pub struct FakeLauncher(pub Arc<FakeSite>);

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let n = self.0.launches.fetch_add(1, Ordering::SeqCst);
        if self.0.failing_launches.contains(&n) {
            return Err(BrowserError::ChromiumError("browser crashed on start".to_string()));
        }
        Ok(Box::new(FakeSession::new(self.0.clone())))
    }
}

#[derive(Default)]
struct SessionState {
    navigated: bool,
    selections: Selections,
    pages: Vec<Vec<ResultRecord>>,
    /// Current 1-based page, 0 before submit
    page: usize,
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    state: Mutex<SessionState>,
}

impl FakeSession {
    pub fn new(site: Arc<FakeSite>) -> Self {
        Self {
            site,
            state: Mutex::new(SessionState::default()),
        }
    }
}

/// Control name out of `select[name="X"], select[id="X"]`.
fn control_name(selector: &str) -> Option<&str> {
    selector
        .strip_prefix("select[name=\"")
        .and_then(|rest| rest.split('"').next())
}

fn render_page(records: &[ResultRecord]) -> String {
    let mut html = String::from(
        "<html><body><table class=\"table\"><thead><tr><th>Action</th><th>State</th>\
         <th>Name</th><th>Farm</th><th>Phone</th><th>Website</th></tr></thead><tbody>",
    );
    for r in records {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}\">site</a></td></tr>",
            r.action, r.location, r.name, r.organization, r.phone, r.website_url
        );
    }
    html.push_str("</tbody></table></body></html>");
    html
}

#[async_trait]
impl BrowserActions for FakeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.site.record_action(format!("navigate {url}"));
        self.state.lock().unwrap().navigated = true;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<()> {
        let state = self.state.lock().unwrap();
        let ready = if control_name(selector).is_some() {
            state.navigated && !self.site.form_missing
        } else if selector == TABLE {
            state.page > 0 && self.site.broken_page != Some(state.page)
        } else {
            true
        };

        if ready {
            Ok(())
        } else {
            Err(BrowserError::Timeout(format!("waiting for {selector}")))
        }
    }

    async fn list_options(&self, selector: &str) -> Result<Vec<String>> {
        control_name(selector)
            .and_then(|name| self.site.options.get(name))
            .cloned()
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        let name = control_name(selector)
            .ok_or_else(|| BrowserError::SelectorNotFound(selector.to_string()))?;
        let known = self
            .site
            .options
            .get(name)
            .is_some_and(|labels| labels.iter().any(|l| l == label));
        if !known {
            return Err(BrowserError::OptionNotFound {
                control: name.to_string(),
                option: label.to_string(),
            });
        }

        self.site.record_action(format!("select {name}={label}"));
        self.state
            .lock()
            .unwrap()
            .selections
            .insert(name.to_string(), label.to_string());
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match selector {
            SUBMIT if state.navigated => {
                let pages = (self.site.pages)(&state.selections);
                state.pages = pages;
                state.page = 1;
                self.site.record_action("submit".to_string());
                Ok(())
            }
            NEXT_LINK if state.page > 0 && !self.site.pager_missing => {
                state.page += 1;
                self.site.record_action(format!("next {}", state.page));
                Ok(())
            }
            _ => Err(BrowserError::SelectorNotFound(selector.to_string())),
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if selector != NEXT || state.page == 0 || self.site.pager_missing {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        if name != "class" {
            return Ok(None);
        }
        let class = if state.page >= state.pages.len() {
            "paginate_button next disabled"
        } else {
            "paginate_button next"
        };
        Ok(Some(class.to_string()))
    }

    async fn page_content(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        let records = state
            .page
            .checked_sub(1)
            .and_then(|i| state.pages.get(i))
            .map_or(&[][..], Vec::as_slice);
        Ok(render_page(records))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn release(self: Box<Self>) -> Result<()> {
        self.site.releases.fetch_add(1, Ordering::SeqCst);
        self.site.record_action("release".to_string());
        Ok(())
    }
}
