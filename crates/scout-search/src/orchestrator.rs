//! Search orchestrator for running a combination plan.
//!
//! This module provides the `SearchOrchestrator` which runs every planned
//! filter combination in order, each on its own freshly launched browser
//! session, and merges the results into one deduplicated dataset.

use crate::aggregator::aggregate;
use crate::error::{Result, SearchError};
use crate::retriever::{CombinationOutcome, CombinationRun, PaginatedRetriever};
use scout_browser::SessionLauncher;
use scout_core::{FilterSet, ResultRecord, SearchConfig};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    /// One entry per planned combination, in plan order
    pub runs: Vec<CombinationRun>,
    /// Deduplicated records across all combinations
    pub dataset: Vec<ResultRecord>,
}

impl SearchReport {
    /// Build a report from finished combinations.
    #[must_use]
    pub fn from_runs(runs: Vec<CombinationRun>) -> Self {
        let dataset = aggregate(runs.iter().map(|run| run.records.as_slice()));
        Self { runs, dataset }
    }

    /// Outcome counts for the final user-facing message.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            combinations: self.runs.len(),
            unique_records: self.dataset.len(),
            ..RunSummary::default()
        };

        for run in &self.runs {
            match run.outcome {
                CombinationOutcome::Retrieved { .. } => summary.with_results += 1,
                CombinationOutcome::Empty => summary.empty += 1,
                CombinationOutcome::Failed { .. } => summary.failed += 1,
                CombinationOutcome::Skipped => summary.skipped += 1,
            }
        }

        summary
    }
}

/// Per-outcome combination counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Planned combinations
    pub combinations: usize,
    /// Combinations that returned records
    pub with_results: usize,
    /// Combinations that matched nothing
    pub empty: usize,
    /// Combinations abandoned on an error
    pub failed: usize,
    /// Combinations not started because the run was aborted
    pub skipped: usize,
    /// Records left after deduplication
    pub unique_records: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} combination(s): {} with results, {} empty, {} failed",
            self.combinations, self.with_results, self.empty, self.failed
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        write!(f, "; {} unique record(s)", self.unique_records)
    }
}

/// Runs combination plans one combination at a time.
pub struct SearchOrchestrator {
    /// Starts one browser session per combination
    launcher: Arc<dyn SessionLauncher>,
    /// Form workflow for a single combination
    retriever: PaginatedRetriever,
}

impl SearchOrchestrator {
    /// Create a new orchestrator.
    pub fn new(launcher: Arc<dyn SessionLauncher>, config: SearchConfig) -> Result<Self> {
        Ok(Self {
            launcher,
            retriever: PaginatedRetriever::new(config)?,
        })
    }

    /// Run every combination in `plan`, strictly in order.
    ///
    /// A failing combination never stops the run. Once `cancel` fires, the
    /// combination in progress finishes and the remaining ones are reported
    /// as skipped.
    pub async fn run(&self, plan: &[FilterSet], cancel: &CancellationToken) -> SearchReport {
        let total = plan.len();
        let mut runs = Vec::with_capacity(total);

        for (index, filters) in plan.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    "Run aborted, skipping {} remaining combination(s)",
                    total - index
                );
                runs.extend(plan[index..].iter().cloned().map(CombinationRun::skipped));
                break;
            }

            tracing::info!("[{}/{}] Searching {}", index + 1, total, filters);
            runs.push(self.run_combination(filters).await);
        }

        SearchReport::from_runs(runs)
    }

    /// Launch a fresh session and retrieve one combination on it.
    async fn run_combination(&self, filters: &FilterSet) -> CombinationRun {
        match self.launcher.launch().await {
            Ok(session) => self.retriever.run(session, filters).await,
            Err(e) => {
                tracing::warn!("Could not start a browser for {}: {}", filters, e);
                CombinationRun::failed(filters.clone(), &SearchError::Browser(e))
            }
        }
    }
}
