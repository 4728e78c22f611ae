//! Paginated retrieval of one filter combination.
//!
//! The retriever drives a single browser session through the directory form:
//! open the form, apply each filter, submit, then read result pages until the
//! next-page control is disabled or absent. Failures before the first page discard the
//! combination; failures while paging keep the pages already read.

use crate::error::{Result, SearchError};
use crate::parser::ResultParser;
use scout_browser::{control_selector, BrowserActions, BrowserSession};
use scout_core::{FilterCategory, FilterSet, ResultRecord, SearchConfig};
use serde::Serialize;
use std::time::Duration;

/// Where a combination is in the form workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalState {
    /// Nothing done yet
    Idle,
    /// Search form rendered
    FormReady,
    /// Every requested filter selected
    FiltersApplied,
    /// Search submitted
    Submitted,
    /// Result page `page` (1-based) read
    PageLoaded {
        /// Pages read so far
        page: usize,
    },
    /// Finished, records kept
    Done,
    /// Aborted, records discarded
    Failed,
}

impl RetrievalState {
    /// Whether the combination has stopped.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// An error in this state ends paging but keeps what was read.
    fn keeps_partial(self) -> bool {
        matches!(self, Self::PageLoaded { .. })
    }
}

/// How one combination ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CombinationOutcome {
    /// At least one record was read
    Retrieved {
        /// Result pages read
        pages: usize,
        /// Paging stopped on a page that failed to load
        truncated: bool,
    },
    /// The search ran and matched nothing
    Empty,
    /// The combination was abandoned before any page was read
    Failed {
        /// Error description
        reason: String,
        /// A requested value had no dropdown option
        selection: bool,
    },
    /// The run was aborted before this combination started
    Skipped,
}

/// One filter set together with what it produced.
#[derive(Debug, Clone, Serialize)]
pub struct CombinationRun {
    /// The searched combination
    pub filters: FilterSet,
    /// Records in page order, then row order
    pub records: Vec<ResultRecord>,
    /// How the combination ended
    pub outcome: CombinationOutcome,
}

impl CombinationRun {
    /// A combination whose session could not be used at all.
    #[must_use]
    pub fn failed(filters: FilterSet, error: &SearchError) -> Self {
        Self {
            filters,
            records: Vec::new(),
            outcome: CombinationOutcome::Failed {
                reason: error.to_string(),
                selection: error.is_selection_failure(),
            },
        }
    }

    /// A combination that never started.
    #[must_use]
    pub fn skipped(filters: FilterSet) -> Self {
        Self {
            filters,
            records: Vec::new(),
            outcome: CombinationOutcome::Skipped,
        }
    }

    /// True if the combination produced records.
    #[must_use]
    pub fn has_results(&self) -> bool {
        matches!(self.outcome, CombinationOutcome::Retrieved { .. })
    }
}

/// Drives the directory search form for one combination at a time.
pub struct PaginatedRetriever {
    config: SearchConfig,
    parser: ResultParser,
}

impl PaginatedRetriever {
    /// Create a retriever for the configured form.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let parser = ResultParser::new(&config.selectors.result_rows)?;
        Ok(Self { config, parser })
    }

    /// Form settings in use.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Retrieve one combination on a session it owns, releasing the session
    /// exactly once whatever the outcome.
    pub async fn run(
        &self,
        session: Box<dyn BrowserSession>,
        filters: &FilterSet,
    ) -> CombinationRun {
        let run = self.retrieve(session.as_ref(), filters).await;

        if let Err(e) = session.release().await {
            tracing::warn!("Failed to release browser session for {}: {}", filters, e);
        }

        run
    }

    /// Retrieve one combination on a borrowed session.
    pub async fn retrieve<S>(&self, session: &S, filters: &FilterSet) -> CombinationRun
    where
        S: BrowserActions + ?Sized,
    {
        let mut state = RetrievalState::Idle;
        let mut records = Vec::new();
        let mut pages = 0;
        let mut truncated = false;
        let mut failure = None;

        while !state.is_terminal() {
            state = match self.advance(session, filters, state, &mut records).await {
                Ok(next) => next,
                Err(e) if state.keeps_partial() => {
                    tracing::warn!(
                        "Stopping pagination for {} after {} page(s): {}",
                        filters,
                        pages,
                        e
                    );
                    truncated = true;
                    RetrievalState::Done
                }
                Err(e) => {
                    tracing::warn!("Search failed for {} while {:?}: {}", filters, state, e);
                    failure = Some(e);
                    RetrievalState::Failed
                }
            };

            if let RetrievalState::PageLoaded { page } = state {
                pages = page;
            }
        }

        if let Some(error) = failure {
            return CombinationRun::failed(filters.clone(), &error);
        }

        let outcome = if records.is_empty() {
            tracing::info!("No results for {}", filters);
            CombinationOutcome::Empty
        } else {
            tracing::info!(
                "Retrieved {} record(s) over {} page(s) for {}",
                records.len(),
                pages,
                filters
            );
            CombinationOutcome::Retrieved { pages, truncated }
        };

        CombinationRun {
            filters: filters.clone(),
            records,
            outcome,
        }
    }

    /// Perform the single transition out of `state`.
    async fn advance<S>(
        &self,
        session: &S,
        filters: &FilterSet,
        state: RetrievalState,
        records: &mut Vec<ResultRecord>,
    ) -> Result<RetrievalState>
    where
        S: BrowserActions + ?Sized,
    {
        let selectors = &self.config.selectors;

        match state {
            RetrievalState::Idle => {
                self.open_form(session).await?;
                Ok(RetrievalState::FormReady)
            }
            RetrievalState::FormReady => {
                self.apply_filters(session, filters).await?;
                Ok(RetrievalState::FiltersApplied)
            }
            RetrievalState::FiltersApplied => {
                session.click(&selectors.submit_button).await?;
                settle(self.config.submit_settle_delay_ms).await;
                Ok(RetrievalState::Submitted)
            }
            RetrievalState::Submitted => {
                let first = self.read_page(session).await?;
                if first.is_empty() {
                    return Ok(RetrievalState::Done);
                }
                tracing::debug!("Page 1: {} record(s)", first.len());
                records.extend(first);
                Ok(RetrievalState::PageLoaded { page: 1 })
            }
            RetrievalState::PageLoaded { page } => {
                if self.next_page_disabled(session).await? {
                    return Ok(RetrievalState::Done);
                }

                session.click(&selectors.next_page_link).await?;
                settle(self.config.page_settle_delay_ms).await;

                let next = self.read_page(session).await?;
                if next.is_empty() {
                    return Ok(RetrievalState::Done);
                }
                tracing::debug!("Page {}: {} record(s)", page + 1, next.len());
                records.extend(next);
                Ok(RetrievalState::PageLoaded { page: page + 1 })
            }
            RetrievalState::Done | RetrievalState::Failed => Ok(state),
        }
    }

    async fn open_form<S>(&self, session: &S) -> Result<()>
    where
        S: BrowserActions + ?Sized,
    {
        session.navigate(&self.config.endpoint_url).await?;

        let form = control_selector(&self.config.selectors.location_control);
        session
            .wait_for_selector(&form, self.config.step_timeout())
            .await
            .map_err(|e| SearchError::FormTimeout(e.to_string()))
    }

    /// Select every requested value, in category order.
    ///
    /// Later dropdowns may be repopulated by earlier selections, so each
    /// selection is followed by its settle delay before the next one.
    async fn apply_filters<S>(&self, session: &S, filters: &FilterSet) -> Result<()>
    where
        S: BrowserActions + ?Sized,
    {
        for (category, value) in filters.iter() {
            let control = control_selector(self.config.selectors.control_for(category));
            session
                .wait_for_selector(&control, self.config.step_timeout())
                .await
                .map_err(|e| SearchError::FormTimeout(e.to_string()))?;

            let options = session.list_options(&control).await?;
            let label = category
                .match_mode()
                .find(value.as_str(), &options)
                .ok_or_else(|| SearchError::Selection {
                    category,
                    value: value.clone(),
                })?;

            tracing::debug!("Selecting {} '{}' for '{}'", category, label, value);
            session.select_option(&control, label).await?;

            let delay = match category {
                FilterCategory::Location => self.config.dependent_settle_delay_ms,
                FilterCategory::Member | FilterCategory::BreedType => self.config.settle_delay_ms,
            };
            settle(delay).await;
        }
        Ok(())
    }

    /// Wait for the results table and parse the current page.
    async fn read_page<S>(&self, session: &S) -> Result<Vec<ResultRecord>>
    where
        S: BrowserActions + ?Sized,
    {
        session
            .wait_for_selector(&self.config.selectors.results_table, self.config.step_timeout())
            .await
            .map_err(|e| SearchError::ResultsTimeout(e.to_string()))?;

        let html = session.page_content().await?;
        Ok(self.parser.parse(&html))
    }

    /// True when there is no further page: the next-page control is
    /// disabled or absent.
    async fn next_page_disabled<S>(&self, session: &S) -> Result<bool>
    where
        S: BrowserActions + ?Sized,
    {
        let selectors = &self.config.selectors;
        let classes = match session.attribute(&selectors.next_page, "class").await {
            Ok(classes) => classes,
            Err(e) if e.is_missing_element() => {
                tracing::debug!("No next-page control ({}), treating as last page", e);
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(classes.is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| class == selectors.disabled_class)
        }))
    }
}

async fn settle(millis: u64) {
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(RetrievalState::Done.is_terminal());
        assert!(RetrievalState::Failed.is_terminal());
        assert!(!RetrievalState::Idle.is_terminal());
        assert!(!RetrievalState::PageLoaded { page: 3 }.is_terminal());
    }

    #[test]
    fn test_only_paging_keeps_partial_results() {
        assert!(RetrievalState::PageLoaded { page: 1 }.keeps_partial());
        assert!(!RetrievalState::Submitted.keeps_partial());
        assert!(!RetrievalState::FormReady.keeps_partial());
    }

    #[test]
    fn test_failed_run_records_selection_flag() {
        let error = SearchError::Selection {
            category: FilterCategory::Member,
            value: scout_core::FilterValue::new("Nobody").unwrap(),
        };
        let run = CombinationRun::failed(FilterSet::new(), &error);
        assert!(!run.has_results());
        assert_eq!(
            run.outcome,
            CombinationOutcome::Failed {
                reason: "no member option matches 'Nobody'".to_string(),
                selection: true,
            }
        );
    }

    #[test]
    fn test_retriever_rejects_bad_row_selector() {
        let mut config = SearchConfig::default();
        config.selectors.result_rows = "tr[[".to_string();
        assert!(PaginatedRetriever::new(config).is_err());
    }
}
