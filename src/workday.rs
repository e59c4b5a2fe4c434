use std::time::Duration;

use log::{info, warn};
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

use crate::error::{PostingError, ScrapeError};
use crate::extractor::Extractor;
use crate::models::{Job, RawPosting, Source};
use crate::session::Session;
use crate::source::{JobSource, ScrapeOutcome};

/// Workday deployments have no stable per-company URL pattern, so the
/// caller supplies the full board URL (e.g.
/// https://acme.wd1.myworkdayjobs.com/careers). The same URL is tried as a
/// JSON endpoint first, then as a rendered page.
pub struct WorkdaySource {
    company: String,
    board_url: String,
    session: Session,
    extractor: Extractor,
}

impl WorkdaySource {
    pub fn new(company: &str, board_url: &str, timeout: Duration) -> Self {
        WorkdaySource {
            company: company.to_string(),
            board_url: board_url.trim_end_matches('/').to_string(),
            session: Session::with_timeout(timeout),
            extractor: Extractor::new(),
        }
    }

    fn origin(&self) -> Option<String> {
        let parsed = Url::parse(&self.board_url).ok()?;
        Some(format!("{}://{}", parsed.scheme(), parsed.host_str()?))
    }

    fn posting_url(&self, entry: &Value) -> String {
        if let Some(url) = entry["url"].as_str() {
            return url.to_string();
        }
        if let Some(path) = entry["externalPath"].as_str() {
            if let Some(origin) = self.origin() {
                return format!("{}{}", origin, path);
            }
        }
        let id = entry["id"]
            .as_str()
            .map(str::to_string)
            .or_else(|| entry["jobId"].as_str().map(str::to_string));
        match id {
            Some(id) if !id.is_empty() => format!("{}/{}", self.board_url, id),
            _ => String::new(),
        }
    }

    fn parse_json(&self, data: &Value) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();

        // Workday payload shapes vary per deployment; try the common keys.
        let listings = data["jobPostings"]
            .as_array()
            .or_else(|| data["jobs"].as_array())
            .or_else(|| data["results"].as_array())
            .or_else(|| data.as_array())
            .cloned()
            .unwrap_or_default();

        for entry in &listings {
            let title = entry["title"]
                .as_str()
                .or_else(|| entry["jobTitle"].as_str())
                .unwrap_or_default()
                .to_string();
            let location = entry["locationsText"]
                .as_str()
                .or_else(|| entry["locationName"].as_str())
                .or_else(|| entry["location"].as_str())
                .unwrap_or_default()
                .to_string();
            let description = entry["description"]
                .as_str()
                .or_else(|| entry["jobDescription"].as_str())
                .unwrap_or_default()
                .to_string();
            let posted_date = entry["postedOn"]
                .as_str()
                .or_else(|| entry["postingDate"].as_str())
                .map(str::to_string);

            let raw = RawPosting {
                title,
                location,
                url: self.posting_url(entry),
                description,
                posted_date,
                context: String::new(),
            };

            match Job::from_raw(raw, &self.company, Source::Workday, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping workday posting: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }

        outcome
    }

    fn parse_html(&self, html: &str) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome::default();
        let document = Html::parse_document(html);

        // Workday markup varies per deployment; try selectors in order of
        // how specific they are.
        let listing_sels = [
            Selector::parse("li.css-1q2dra3").unwrap(),
            Selector::parse(r#"div[data-automation-id="compositeContainer"]"#).unwrap(),
            Selector::parse("article").unwrap(),
        ];
        let title_sels = [
            Selector::parse(r#"a[data-automation-id="jobTitle"]"#).unwrap(),
            Selector::parse("h3 a").unwrap(),
            Selector::parse("a").unwrap(),
        ];
        let location_sels = [
            Selector::parse(r#"dd[data-automation-id="location"]"#).unwrap(),
            Selector::parse("span.location").unwrap(),
        ];
        let date_sel = Selector::parse(r#"dd[data-automation-id="postedOn"]"#).unwrap();

        let listings: Vec<_> = listing_sels
            .iter()
            .map(|sel| document.select(sel).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        for listing in listings {
            let link = title_sels.iter().find_map(|sel| listing.select(sel).next());
            let link = match link {
                Some(l) => l,
                None => {
                    let e = PostingError::Malformed("listing without a title link".to_string());
                    warn!("Skipping workday posting: {}", e);
                    outcome.skipped.push(e);
                    continue;
                }
            };

            let title = link.text().collect::<String>().trim().to_string();
            let mut url = link.value().attr("href").unwrap_or_default().to_string();
            if !url.is_empty() && !url.starts_with("http") {
                if let Some(origin) = self.origin() {
                    url = format!("{}{}", origin, url);
                }
            }

            let location = location_sels
                .iter()
                .find_map(|sel| listing.select(sel).next())
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let posted_date = listing
                .select(&date_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());

            let raw = RawPosting {
                title,
                location,
                url,
                posted_date,
                ..RawPosting::default()
            };

            match Job::from_raw(raw, &self.company, Source::Workday, &self.extractor) {
                Ok(job) => outcome.push_job(job),
                Err(e) => {
                    warn!("Skipping workday posting: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }

        outcome
    }
}

impl JobSource for WorkdaySource {
    fn source_name(&self) -> Source {
        Source::Workday
    }

    fn scrape(&self) -> Result<ScrapeOutcome, ScrapeError> {
        // Some deployments answer with JSON when asked for it.
        match self.session.get_json(&self.board_url) {
            Ok((status, body)) if status.is_success() => {
                if let Ok(data) = serde_json::from_str::<Value>(&body) {
                    let outcome = self.parse_json(&data);
                    if !outcome.jobs.is_empty() || !outcome.skipped.is_empty() {
                        return Ok(outcome);
                    }
                }
                info!("Workday JSON attempt for {} came back empty, trying HTML", self.company);
            }
            Ok((status, _)) => {
                info!("Workday JSON attempt returned {}, trying HTML", status);
            }
            Err(e) => {
                warn!("Workday JSON fetch failed ({}), trying HTML", e);
            }
        }

        match self.session.get(&self.board_url) {
            Ok((status, body)) if status.is_success() => Ok(self.parse_html(&body)),
            Ok((status, _)) => Err(ScrapeError::SourceUnreachable {
                platform: "workday",
                reason: format!("{} returned {}", self.board_url, status),
            }),
            Err(e) => Err(ScrapeError::SourceUnreachable {
                platform: "workday",
                reason: e.to_string(),
            }),
        }
    }
}
