use std::time::Duration;

use log::{info, warn};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{PostingError, ScrapeError};
use crate::extractor::Extractor;
use crate::models::{Job, RawPosting, Source};
use crate::session::Session;
use crate::source::{JobSource, ScrapeOutcome};

/// Greenhouse boards live at https://boards.greenhouse.io/{company} and
/// usually expose the same listing as JSON at {board}.json.
pub struct GreenhouseSource {
    company: String,
    base_url: String,
    session: Session,
    extractor: Extractor,
}

impl GreenhouseSource {
    pub fn new(company: &str, timeout: Duration) -> Self {
        GreenhouseSource {
            company: company.to_string(),
            base_url: format!("https://boards.greenhouse.io/{}", company),
            session: Session::with_timeout(timeout),
            extractor: Extractor::new(),
        }
    }

    fn parse_json(&self, data: &Value) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();

        let listings = data["jobs"].as_array().cloned().unwrap_or_default();
        for entry in &listings {
            let raw = RawPosting {
                title: entry["title"].as_str().unwrap_or_default().to_string(),
                location: entry["location"]["name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
                url: entry["absolute_url"].as_str().unwrap_or_default().to_string(),
                description: entry["content"].as_str().unwrap_or_default().to_string(),
                posted_date: entry["updated_at"].as_str().map(str::to_string),
                context: entry["departments"]
                    .as_array()
                    .map(|deps| {
                        deps.iter()
                            .filter_map(|d| d["name"].as_str())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_default(),
            };

            match Job::from_raw(raw, &self.company, Source::Greenhouse, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping greenhouse posting: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }

        outcome
    }

    fn parse_html(&self, html: &str) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();
        let document = Html::parse_document(html);
        let opening_sel = Selector::parse("section.level-0 div.opening, div.opening").unwrap();
        let link_sel = Selector::parse("a").unwrap();
        let location_sel = Selector::parse("span.location").unwrap();

        for listing in document.select(&opening_sel) {
            let link = match listing.select(&link_sel).next() {
                Some(l) => l,
                None => {
                    let e = PostingError::Malformed("opening without a link".to_string());
                    warn!("Skipping greenhouse posting: {}", e);
                    outcome.skipped.push(e);
                    continue;
                }
            };

            let title = link.text().collect::<String>().trim().to_string();
            let mut url = link.value().attr("href").unwrap_or_default().to_string();
            if !url.is_empty() && !url.starts_with("http") {
                url = format!("https://boards.greenhouse.io{}", url);
            }

            let location = listing
                .select(&location_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let raw = RawPosting {
                title,
                location,
                url,
                ..RawPosting::default()
            };

            match Job::from_raw(raw, &self.company, Source::Greenhouse, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping greenhouse posting: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }

        outcome
    }

    fn scrape_html(&self) -> Result<ScrapeOutcome, ScrapeError> {
        match self.session.get(&self.base_url) {
            Ok((status, body)) if status.is_success() => Ok(self.parse_html(&body)),
            Ok((status, _)) => Err(ScrapeError::SourceUnreachable {
                platform: "greenhouse",
                reason: format!("{} returned {}", self.base_url, status),
            }),
            Err(e) => Err(ScrapeError::SourceUnreachable {
                platform: "greenhouse",
                reason: e.to_string(),
            }),
        }
    }
}

impl JobSource for GreenhouseSource {
    fn source_name(&self) -> Source {
        Source::Greenhouse
    }

    /// JSON endpoint first; falls back to the rendered board on a
    /// non-success status, a malformed payload, or an empty result set.
    fn scrape(&self) -> Result<ScrapeOutcome, ScrapeError> {
        let json_url = format!("{}.json", self.base_url);

        match self.session.get(&json_url) {
            Ok((status, body)) if status.is_success() => {
                match serde_json::from_str::<Value>(&body) {
                    Ok(data) => {
                        let outcome = self.parse_json(&data);
                        if !outcome.jobs.is_empty() || !outcome.skipped.is_empty() {
                            return Ok(outcome);
                        }
                        info!("Greenhouse JSON board for {} is empty, trying HTML", self.company);
                    }
                    Err(e) => {
                        warn!("Greenhouse JSON payload unusable ({}), trying HTML", e);
                    }
                }
            }
            Ok((status, _)) => {
                info!("Greenhouse JSON endpoint returned {}, trying HTML", status);
            }
            Err(e) => {
                warn!("Greenhouse JSON fetch failed ({}), trying HTML", e);
            }
        }

        self.scrape_html()
    }
}
