use std::time::Duration;

use log::{info, warn};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{PostingError, ScrapeError};
use crate::extractor::Extractor;
use crate::models::{Job, RawPosting, Source};
use crate::session::Session;
use crate::source::{JobSource, ScrapeOutcome};

/// Lever boards live at https://jobs.lever.co/{company} and return the
/// posting list as a JSON array when queried with ?mode=json.
pub struct LeverSource {
    company: String,
    base_url: String,
    session: Session,
    extractor: Extractor,
}

impl LeverSource {
    pub fn new(company: &str, timeout: Duration) -> Self {
        LeverSource {
            company: company.to_string(),
            base_url: format!("https://jobs.lever.co/{}", company),
            session: Session::with_timeout(timeout),
            extractor: Extractor::new(),
        }
    }

    fn parse_json(&self, data: &Value) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();

        let listings = data.as_array().cloned().unwrap_or_default();
        for entry in &listings {
            let categories = &entry["categories"];
            let description = entry["descriptionPlain"]
                .as_str()
                .or_else(|| entry["description"].as_str())
                .unwrap_or_default()
                .to_string();

            let raw = RawPosting {
                title: entry["text"].as_str().unwrap_or_default().to_string(),
                location: categories["location"].as_str().unwrap_or_default().to_string(),
                url: entry["hostedUrl"].as_str().unwrap_or_default().to_string(),
                description,
                // Epoch millis on the wire; preserved as-is, no cross-platform
                // date normalization.
                posted_date: entry["createdAt"].as_i64().map(|ms| ms.to_string()),
                context: format!(
                    "{} {}",
                    categories["team"].as_str().unwrap_or_default(),
                    categories["commitment"].as_str().unwrap_or_default()
                ),
            };

            match Job::from_raw(raw, &self.company, Source::Lever, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping lever posting: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }

        outcome
    }

    fn parse_html(&self, html: &str) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();
        let document = Html::parse_document(html);
        let posting_sel = Selector::parse("div.posting").unwrap();
        let title_sel = Selector::parse("h5").unwrap();
        let apply_sel = Selector::parse("a.posting-btn-submit").unwrap();
        let link_sel = Selector::parse("a").unwrap();
        let location_sel = Selector::parse("span.sort-by-location").unwrap();
        let commitment_sel = Selector::parse("span.sort-by-commitment").unwrap();

        for listing in document.select(&posting_sel) {
            let title = match listing.select(&title_sel).next() {
                Some(el) => el.text().collect::<String>().trim().to_string(),
                None => {
                    let e = PostingError::Malformed("posting without a title element".to_string());
                    warn!("Skipping lever posting: {}", e);
                    outcome.skipped.push(e);
                    continue;
                }
            };

            let link = listing
                .select(&apply_sel)
                .next()
                .or_else(|| listing.select(&link_sel).next());
            let mut url = link
                .and_then(|l| l.value().attr("href"))
                .unwrap_or_default()
                .to_string();
            if !url.is_empty() && !url.starts_with("http") {
                url = format!("https://jobs.lever.co{}", url);
            }

            let location = listing
                .select(&location_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let commitment = listing
                .select(&commitment_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let raw = RawPosting {
                title,
                location,
                url,
                context: commitment,
                ..RawPosting::default()
            };

            match Job::from_raw(raw, &self.company, Source::Lever, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping lever posting: {}", e);
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
                platform: "lever",
                reason: format!("{} returned {}", self.base_url, status),
            }),
            Err(e) => Err(ScrapeError::SourceUnreachable {
                platform: "lever",
                reason: e.to_string(),
            }),
        }
    }
}

impl JobSource for LeverSource {
    fn source_name(&self) -> Source {
        Source::Lever
    }

    fn scrape(&self) -> Result<ScrapeOutcome, ScrapeError> {
        let json_url = format!("{}?mode=json", self.base_url);

        match self.session.get(&json_url) {
            Ok((status, body)) if status.is_success() => {
                match serde_json::from_str::<Value>(&body) {
                    Ok(data) => {
                        let outcome = self.parse_json(&data);
                        if !outcome.jobs.is_empty() || !outcome.skipped.is_empty() {
                            return Ok(outcome);
                        }
                        info!("Lever JSON board for {} is empty, trying HTML", self.company);
                    }
                    Err(e) => {
                        warn!("Lever JSON payload unusable ({}), trying HTML", e);
                    }
                }
            }
            Ok((status, _)) => {
                info!("Lever JSON endpoint returned {}, trying HTML", status);
            }
            Err(e) => {
                warn!("Lever JSON fetch failed ({}), trying HTML", e);
            }
        }

        self.scrape_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, WorkMode};
    use crate::session::DEFAULT_TIMEOUT;
    use serde_json::json;

    fn source() -> LeverSource {
        LeverSource::new("acme", DEFAULT_TIMEOUT)
    }

    #[test]
    fn parses_json_board_with_salary_and_keywords() {
        let data = json!([{
            "text": "Senior Python Engineer",
            "categories": {
                "location": "Remote - US",
                "team": "Platform",
                "commitment": "Full-time"
            },
            "hostedUrl": "https://jobs.lever.co/acme/1",
            "descriptionPlain": "Build services in Python on AWS. Pay: $120,000 - $150,000.",
            "createdAt": 1714089600000i64
        }]);

        let outcome = source().parse_json(&data);
        assert_eq!(outcome.jobs.len(), 1);

        let job = &outcome.jobs[0];
        assert_eq!(job.work_mode, WorkMode::Remote);
        assert_eq!(job.experience_level, ExperienceLevel::Senior);
        assert_eq!(job.salary_min, Some(120_000.0));
        assert_eq!(job.salary_max, Some(150_000.0));
        assert_eq!(job.salary_currency.as_deref(), Some("USD"));
        assert_eq!(job.posted_date.as_deref(), Some("1714089600000"));
        assert!(job.keywords.contains(&"python".to_string()));
        assert!(job.keywords.contains(&"aws".to_string()));
    }

    #[test]
    fn unparseable_salary_leaves_fields_absent() {
        let data = json!([{
            "text": "Engineer",
            "categories": {"location": "NYC"},
            "hostedUrl": "https://jobs.lever.co/acme/2",
            "descriptionPlain": "Salary: competitive, DOE"
        }]);

        let outcome = source().parse_json(&data);
        let job = &outcome.jobs[0];
        assert_eq!(job.salary_min, None);
        assert_eq!(job.salary_max, None);
        assert_eq!(job.salary_currency, None);
    }

    #[test]
    fn postings_without_url_are_skipped() {
        let data = json!([
            {"text": "Engineer", "categories": {"location": "NYC"},
             "hostedUrl": "https://jobs.lever.co/acme/3"},
            {"text": "Phantom", "categories": {"location": "NYC"}}
        ]);

        let outcome = source().parse_json(&data);
        assert_eq!(outcome.jobs.len(), 1);
        assert_eq!(outcome.skipped_count(), 1);
        assert_eq!(outcome.skipped[0], PostingError::MissingField("url"));
    }

    #[test]
    fn parses_html_board() {
        let html = r#"
            <div class="posting">
              <h5>Senior Backend Engineer</h5>
              <a class="posting-btn-submit" href="/acme/1/apply"></a>
              <span class="sort-by-location">Remote (US)</span>
              <span class="sort-by-commitment">Full-time</span>
            </div>
        "#;

        let outcome = source().parse_html(html);
        assert_eq!(outcome.jobs.len(), 1);

        let job = &outcome.jobs[0];
        assert_eq!(job.url, "https://jobs.lever.co/acme/1/apply");
        assert_eq!(job.work_mode, WorkMode::Remote);
        assert_eq!(job.experience_level, ExperienceLevel::Senior);
    }

    #[test]
    fn json_and_html_paths_classify_identically() {
        let data = json!([{
            "text": "Senior Backend Engineer",
            "categories": {"location": "Remote (US)"},
            "hostedUrl": "https://jobs.lever.co/acme/1"
        }]);
        let html = r#"
            <div class="posting">
              <h5>Senior Backend Engineer</h5>
              <a href="https://jobs.lever.co/acme/1"></a>
              <span class="sort-by-location">Remote (US)</span>
            </div>
        "#;

        let via_json = &source().parse_json(&data).jobs[0];
        let via_html = &source().parse_html(html).jobs[0];
        assert_eq!(via_json.work_mode, via_html.work_mode);
        assert_eq!(via_json.experience_level, via_html.experience_level);
    }
}
