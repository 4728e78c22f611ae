use crate::actions::{BrowserActions, BrowserSession, SessionLauncher};
use crate::error::{BrowserError, Result};
use crate::script::{self, OptionsListing, SelectOutcome};
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::Page;
use futures_util::stream::StreamExt;
use scout_core::BrowserConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Browser automation engine.
///
/// Each engine owns one Chromium process and one page. Dropping the engine
/// without calling [`BrowserSession::release`] still kills the process, but
/// skips the graceful shutdown.
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    poll_interval: Duration,
}

impl BrowserEngine {
    /// Launch a new browser with default settings
    pub async fn new() -> Result<Self> {
        Self::launch(&BrowserConfig::default()).await
    }

    /// Launch a new browser and open a blank page
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = ChromiumConfig::builder()
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .request_timeout(config.launch_timeout());
        if !config.headless {
            builder = builder.with_head();
        }
        let chromium_config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chromium_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error (continuing): {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::ChromiumError(e.to_string()));
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
            poll_interval: config.poll_interval(),
        })
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, js: String) -> Result<T> {
        self.page
            .evaluate(js)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::ScriptError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {e}")))?;
        tracing::debug!(
            "Navigating to {}",
            parsed.host_str().unwrap_or(parsed.scheme())
        );

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "{selector} not present after {timeout:?}"
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn list_options(&self, selector: &str) -> Result<Vec<String>> {
        let listing: OptionsListing = self.evaluate(script::list_options(selector)).await?;
        if listing.found {
            Ok(listing.options)
        } else {
            Err(BrowserError::SelectorNotFound(selector.to_string()))
        }
    }

    async fn select_option(&self, selector: &str, label: &str) -> Result<()> {
        match self.evaluate(script::select_option(selector, label)).await? {
            SelectOutcome::Selected => Ok(()),
            SelectOutcome::NoOption => Err(BrowserError::OptionNotFound {
                control: selector.to_string(),
                option: label.to_string(),
            }),
            SelectOutcome::Missing => Err(BrowserError::SelectorNotFound(selector.to_string())),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .attribute(name)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn page_content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BrowserSession for BrowserEngine {
    async fn release(self: Box<Self>) -> Result<()> {
        let Self {
            mut browser,
            page,
            handler,
            ..
        } = *self;
        drop(page);

        let closed = browser
            .close()
            .await
            .map_err(|e| BrowserError::SessionError(e.to_string()));
        if let Err(e) = browser.wait().await {
            tracing::debug!("Waiting for browser exit failed: {}", e);
        }
        handler.abort();

        closed.map(|_| ())
    }
}

/// Launches one Chromium instance per session.
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    config: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let engine = BrowserEngine::launch(&self.config).await?;
        Ok(Box::new(engine))
    }
}
