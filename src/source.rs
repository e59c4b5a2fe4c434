use std::time::Duration;

use log::debug;

use crate::error::{PostingError, ScrapeError};
use crate::greenhouse::GreenhouseSource;
use crate::lever::LeverSource;
use crate::models::{Job, Source};
use crate::workday::WorkdaySource;

/// Result of one adapter run: the postings that normalized cleanly plus
/// diagnostics for the ones that were skipped. A batch with zero jobs and
/// zero skips is a valid empty board, not an error.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub jobs: Vec<Job>,
    pub skipped: Vec<PostingError>,
}

impl ScrapeOutcome {
    /// Appends a job unless one with the same URL is already in the batch.
    /// Boards sometimes list the same posting under several departments;
    /// the first occurrence wins and later copies are dropped silently.
    pub fn push_job(&mut self, job: Job) {
        if self.jobs.iter().any(|existing| existing.url == job.url) {
            debug!("Dropping duplicate posting {}", job.url);
            return;
        }
        self.jobs.push(job);
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// One ATS adapter. `scrape` is best-effort per posting: malformed entries
/// are skipped and counted, and only a board-wide fetch failure raises
/// [`ScrapeError::SourceUnreachable`].
pub trait JobSource {
    fn source_name(&self) -> Source;
    fn scrape(&self) -> Result<ScrapeOutcome, ScrapeError>;
}

/// Platform selector. Each variant maps to one adapter constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Greenhouse,
    Lever,
    Workday,
}

impl SourceKind {
    /// Builds the adapter for this platform. Greenhouse and Lever derive
    /// their board URL from the company slug; Workday deployments have no
    /// stable URL pattern, so an explicit base URL is required.
    pub fn build(
        self,
        company: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Box<dyn JobSource>, ScrapeError> {
        if company.trim().is_empty() {
            return Err(ScrapeError::InvalidCriteria(
                "company must not be empty".to_string(),
            ));
        }
        match self {
            SourceKind::Greenhouse => Ok(Box::new(GreenhouseSource::new(company, timeout))),
            SourceKind::Lever => Ok(Box::new(LeverSource::new(company, timeout))),
            SourceKind::Workday => {
                let url = base_url.ok_or_else(|| {
                    ScrapeError::InvalidCriteria(
                        "workday requires an explicit board URL".to_string(),
                    )
                })?;
                if !url.starts_with("http") {
                    return Err(ScrapeError::InvalidCriteria(format!(
                        "workday URL must be absolute, got '{}'",
                        url
                    )));
                }
                Ok(Box::new(WorkdaySource::new(company, url, timeout)))
            }
        }
    }
}
