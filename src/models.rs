use serde::Serialize;

use crate::error::PostingError;
use crate::extractor::Extractor;

/// Where a posting came from. One tag per supported ATS platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Greenhouse,
    Lever,
    Workday,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Greenhouse => "greenhouse",
            Source::Lever => "lever",
            Source::Workday => "workday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Unknown,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Onsite => "onsite",
            WorkMode::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for WorkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(WorkMode::Remote),
            "hybrid" => Ok(WorkMode::Hybrid),
            "onsite" => Ok(WorkMode::Onsite),
            "unknown" => Ok(WorkMode::Unknown),
            other => Err(format!(
                "invalid work mode '{}'. Valid options: remote, hybrid, onsite, unknown",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Internship,
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
    #[default]
    Unknown,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "internship",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "internship" => Ok(ExperienceLevel::Internship),
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            "executive" => Ok(ExperienceLevel::Executive),
            "unknown" => Ok(ExperienceLevel::Unknown),
            other => Err(format!(
                "invalid experience level '{}'. Valid options: internship, entry, mid, senior, lead, executive",
                other
            )),
        }
    }
}

/// What an adapter managed to pull out of one raw posting before
/// normalization. `context` carries extra text (department, team,
/// commitment) that feeds the work-mode classifier but is not stored.
#[derive(Debug, Default, Clone)]
pub struct RawPosting {
    pub title: String,
    pub location: String,
    pub url: String,
    pub description: String,
    pub posted_date: Option<String>,
    pub context: String,
}

/// Normalized job posting. Built exactly once per raw posting via
/// [`Job::from_raw`], immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    pub source: Source,
    pub description: String,
    pub work_mode: WorkMode,
    pub experience_level: ExperienceLevel,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub posted_date: Option<String>,
    pub linkedin_url: String,
    pub keywords: Vec<String>,
}

/// Stored descriptions are capped; enough context for classification
/// without dragging whole HTML bodies into the output.
const MAX_DESCRIPTION_CHARS: usize = 500;

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

impl Job {
    /// Single construction point shared by every adapter and both of the
    /// JSON/HTML paths, so classification outcomes converge no matter
    /// which path produced the raw data.
    pub fn from_raw(
        raw: RawPosting,
        company: &str,
        source: Source,
        extractor: &Extractor,
    ) -> Result<Job, PostingError> {
        let title = raw.title.trim();
        if title.is_empty() {
            return Err(PostingError::MissingField("title"));
        }
        if company.trim().is_empty() {
            return Err(PostingError::MissingField("company"));
        }
        let url = raw.url.trim();
        if url.is_empty() {
            return Err(PostingError::MissingField("url"));
        }

        let location = if raw.location.trim().is_empty() {
            "Unknown".to_string()
        } else {
            raw.location.trim().to_string()
        };

        let mode_text = format!("{} {} {}", location, raw.context, raw.description);
        let work_mode = extractor.detect_work_mode(&mode_text);
        let experience_level = extractor.detect_experience_level(title, &raw.description);

        let salary = extractor.extract_salary(&raw.description);
        let (mut salary_min, mut salary_max, salary_currency) = match salary {
            Some(s) => (s.min, s.max, Some(s.currency)),
            None => (None, None, None),
        };
        // Normalize inverted ranges rather than rejecting the posting.
        if let (Some(lo), Some(hi)) = (salary_min, salary_max) {
            if lo > hi {
                salary_min = Some(hi);
                salary_max = Some(lo);
            }
        }

        let keywords = extractor.extract_keywords(title, &raw.description);
        let linkedin_url = extractor.linkedin_search_url(title, company.trim());

        Ok(Job {
            title: title.to_string(),
            company: company.trim().to_string(),
            location,
            url: url.to_string(),
            source,
            description: truncate_chars(&raw.description, MAX_DESCRIPTION_CHARS).to_string(),
            work_mode,
            experience_level,
            salary_min,
            salary_max,
            salary_currency,
            posted_date: raw.posted_date,
            linkedin_url,
            keywords,
        })
    }
}
