use std::collections::BTreeSet;

use regex::Regex;

use crate::models::{ExperienceLevel, WorkMode};

/// Salary figures pulled out of free text. `min`/`max` are annual amounts;
/// a single stated figure sets both, "up to X" sets only `max`, "from X"
/// only `min`.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

/// Heuristic classifiers over posting free text. All regexes are compiled
/// once up front; every method is a pure function of its input.
pub struct Extractor {
    range_re: Regex,
    ceiling_re: Regex,
    floor_re: Regex,
    plus_re: Regex,
    symbol_re: Regex,
    bare_k_re: Regex,
    currency_code_re: Regex,
    level_res: Vec<(ExperienceLevel, Regex)>,
    keyword_res: Vec<(&'static str, Regex)>,
}

// Figures that expand below this are treated as non-annual (hourly rates,
// "2-3 years experience") and ignored.
const MIN_ANNUAL_SALARY: f64 = 1000.0;

const HYBRID_MARKERS: [&str; 2] = ["hybrid", "flexible"];
const REMOTE_MARKERS: [&str; 3] = ["remote", "work from home", "wfh"];
const ONSITE_MARKERS: [&str; 4] = ["on-site", "onsite", "in-office", "in office"];

// Fixed tech vocabulary for keyword tagging.
const KEYWORD_VOCAB: [&str; 37] = [
    "python", "java", "javascript", "typescript", "react", "angular", "vue",
    "node", "django", "flask", "spring", "rust", "aws", "azure", "gcp",
    "docker", "kubernetes", "sql", "nosql", "mongodb", "postgresql", "redis",
    "machine learning", "ml", "ai", "data science", "analytics", "frontend",
    "backend", "fullstack", "full-stack", "devops", "cloud", "microservices",
    "api", "rest", "graphql",
];

// A number like 120,000 or 120000 or 85.5, with an optional k suffix.
const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s*([kK])?";

impl Extractor {
    pub fn new() -> Self {
        let level_res = vec![
            (
                ExperienceLevel::Internship,
                Regex::new(r"(?i)\b(?:intern|internship|co-?op)\b").unwrap(),
            ),
            // Checked before senior/lead so "Senior Director" lands here.
            (
                ExperienceLevel::Executive,
                Regex::new(
                    r"(?i)\b(?:vice president|vp|svp|ceo|cto|cfo|coo|chief|director|head of|executive)\b",
                )
                .unwrap(),
            ),
            (
                ExperienceLevel::Lead,
                Regex::new(r"(?i)\b(?:lead|principal|architect)\b").unwrap(),
            ),
            (
                ExperienceLevel::Senior,
                Regex::new(r"(?i)\b(?:senior|sr|staff)\b").unwrap(),
            ),
            (
                ExperienceLevel::Entry,
                Regex::new(r"(?i)\b(?:junior|jr|entry[- ]level|graduate|new grad|associate)\b")
                    .unwrap(),
            ),
            (
                ExperienceLevel::Mid,
                Regex::new(r"(?i)\b(?:mid[- ]level|intermediate)\b").unwrap(),
            ),
        ];

        let keyword_res = KEYWORD_VOCAB
            .iter()
            .map(|kw| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(kw));
                (*kw, Regex::new(&pattern).unwrap())
            })
            .collect();

        Extractor {
            range_re: Regex::new(&format!(
                r"(?i)[$€£]?\s*{a}(?:\s*[-–—]\s*|\s+to\s+)[$€£]?\s*{a}",
                a = AMOUNT
            ))
            .unwrap(),
            ceiling_re: Regex::new(&format!(
                r"(?i)\b(?:up to|maximum of)\s+[$€£]?\s*{}",
                AMOUNT
            ))
            .unwrap(),
            floor_re: Regex::new(&format!(
                r"(?i)\b(?:from|starting at)\s+[$€£]?\s*{}",
                AMOUNT
            ))
            .unwrap(),
            plus_re: Regex::new(&format!(r"(?i)[$€£]\s*{}\s*\+", AMOUNT)).unwrap(),
            symbol_re: Regex::new(&format!(r"(?i)[$€£]\s*{}", AMOUNT)).unwrap(),
            bare_k_re: Regex::new(r"\b(\d{1,3}(?:,\d{3})*(?:\.\d+)?)\s*([kK])\b").unwrap(),
            currency_code_re: Regex::new(r"(?i)\b(usd|eur|gbp|cad|aud)\b").unwrap(),
            level_res,
            keyword_res,
        }
    }

    /// Work-mode detection over location + description text. When markers
    /// co-occur the narrowest mode wins: hybrid beats remote beats onsite.
    /// No marker at all yields `Unknown`, never a guessed default.
    pub fn detect_work_mode(&self, text: &str) -> WorkMode {
        let text = text.to_lowercase();
        if HYBRID_MARKERS.iter().any(|m| text.contains(m)) {
            WorkMode::Hybrid
        } else if REMOTE_MARKERS.iter().any(|m| text.contains(m)) {
            WorkMode::Remote
        } else if ONSITE_MARKERS.iter().any(|m| text.contains(m)) {
            WorkMode::Onsite
        } else {
            WorkMode::Unknown
        }
    }

    /// Experience-level detection. Titles are the reliable signal, so the
    /// title is scanned first and the description only as a fallback.
    /// Matches whole words only ("seniority" is not "senior") and checks
    /// executive markers before senior/lead ones so "Senior Director"
    /// classifies as executive.
    pub fn detect_experience_level(&self, title: &str, description: &str) -> ExperienceLevel {
        if let Some(level) = self.match_level(title) {
            return level;
        }
        if let Some(level) = self.match_level(description) {
            return level;
        }
        ExperienceLevel::Unknown
    }

    fn match_level(&self, text: &str) -> Option<ExperienceLevel> {
        self.level_res
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(level, _)| *level)
    }

    /// Salary extraction from description text. Handles comma-grouped
    /// thousands, "k" shorthand, explicit ranges, ceiling-only ("up to X"),
    /// floor-only ("from X", "$X+") and single figures. Returns `None`
    /// when nothing salary-like is present.
    pub fn extract_salary(&self, text: &str) -> Option<SalaryRange> {
        if let Some(caps) = self.range_re.captures(text) {
            let lo = parse_amount(&caps[1], caps.get(2).is_some());
            let hi = parse_amount(&caps[3], caps.get(4).is_some());
            let matched = caps.get(0).unwrap().as_str();
            let evidence = self.has_salary_evidence(
                text,
                matched,
                caps.get(2).is_some() || caps.get(4).is_some(),
            );
            if evidence && lo >= MIN_ANNUAL_SALARY && hi >= MIN_ANNUAL_SALARY {
                return Some(SalaryRange {
                    min: Some(lo),
                    max: Some(hi),
                    currency: self.detect_currency(text, matched),
                });
            }
        }

        if let Some(caps) = self.ceiling_re.captures(text) {
            let hi = parse_amount(&caps[1], caps.get(2).is_some());
            let matched = caps.get(0).unwrap().as_str();
            if self.has_salary_evidence(text, matched, caps.get(2).is_some())
                && hi >= MIN_ANNUAL_SALARY
            {
                return Some(SalaryRange {
                    min: None,
                    max: Some(hi),
                    currency: self.detect_currency(text, matched),
                });
            }
        }

        for floor in [&self.floor_re, &self.plus_re] {
            if let Some(caps) = floor.captures(text) {
                let lo = parse_amount(&caps[1], caps.get(2).is_some());
                let matched = caps.get(0).unwrap().as_str();
                if self.has_salary_evidence(text, matched, caps.get(2).is_some())
                    && lo >= MIN_ANNUAL_SALARY
                {
                    return Some(SalaryRange {
                        min: Some(lo),
                        max: None,
                        currency: self.detect_currency(text, matched),
                    });
                }
            }
        }

        // Single figure: needs a currency symbol or a k suffix to count.
        for single in [&self.symbol_re, &self.bare_k_re] {
            if let Some(caps) = single.captures(text) {
                let value = parse_amount(&caps[1], caps.get(2).is_some());
                if value >= MIN_ANNUAL_SALARY {
                    let matched = caps.get(0).unwrap().as_str();
                    return Some(SalaryRange {
                        min: Some(value),
                        max: Some(value),
                        currency: self.detect_currency(text, matched),
                    });
                }
            }
        }

        None
    }

    // A bare number is not a salary. "from 2020" or "up to 5" need a
    // currency symbol in the match, a k suffix, or a currency code
    // somewhere in the text to count.
    fn has_salary_evidence(&self, text: &str, matched: &str, k_suffix: bool) -> bool {
        matched.contains(['$', '€', '£']) || k_suffix || self.currency_code_re.is_match(text)
    }

    fn detect_currency(&self, text: &str, matched: &str) -> String {
        if let Some(code) = self.currency_code_re.find(text) {
            return code.as_str().to_uppercase();
        }
        if matched.contains('€') {
            "EUR".to_string()
        } else if matched.contains('£') {
            "GBP".to_string()
        } else {
            "USD".to_string()
        }
    }

    /// Keyword tagging against the fixed vocabulary: whole-word matches,
    /// case-insensitive, returned sorted and deduplicated.
    pub fn extract_keywords(&self, title: &str, description: &str) -> Vec<String> {
        let text = format!("{} {}", title, description);
        let found: BTreeSet<&str> = self
            .keyword_res
            .iter()
            .filter(|(_, re)| re.is_match(&text))
            .map(|(kw, _)| *kw)
            .collect();
        found.into_iter().map(str::to_string).collect()
    }

    /// LinkedIn job-search URL from title + company. Advisory only: no
    /// network call, no guarantee a matching listing exists.
    pub fn linkedin_search_url(&self, title: &str, company: &str) -> String {
        let query = format!("{} {}", title, company);
        format!(
            "https://www.linkedin.com/jobs/search/?keywords={}",
            urlencoding::encode(&query)
        )
    }
}

fn parse_amount(digits: &str, thousands: bool) -> f64 {
    let value: f64 = digits.replace(',', "").parse().unwrap_or(0.0);
    if thousands {
        value * 1000.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex() -> Extractor {
        Extractor::new()
    }

    #[test]
    fn work_mode_remote() {
        assert_eq!(ex().detect_work_mode("Remote (US)"), WorkMode::Remote);
        assert_eq!(ex().detect_work_mode("100% remote team"), WorkMode::Remote);
        assert_eq!(ex().detect_work_mode("Work From Home friendly"), WorkMode::Remote);
    }

    #[test]
    fn work_mode_hybrid_beats_remote() {
        // Narrowest mode wins on co-occurring markers.
        assert_eq!(
            ex().detect_work_mode("Hybrid role, remote two days a week"),
            WorkMode::Hybrid
        );
    }

    #[test]
    fn work_mode_onsite_and_unknown() {
        assert_eq!(ex().detect_work_mode("On-site in Austin, TX"), WorkMode::Onsite);
        assert_eq!(ex().detect_work_mode("Berlin, Germany"), WorkMode::Unknown);
        assert_eq!(ex().detect_work_mode(""), WorkMode::Unknown);
    }

    #[test]
    fn experience_from_title() {
        let e = ex();
        assert_eq!(
            e.detect_experience_level("Senior Backend Engineer", ""),
            ExperienceLevel::Senior
        );
        assert_eq!(
            e.detect_experience_level("Software Engineering Intern", ""),
            ExperienceLevel::Internship
        );
        assert_eq!(
            e.detect_experience_level("Junior Developer", ""),
            ExperienceLevel::Entry
        );
        assert_eq!(
            e.detect_experience_level("Principal Engineer", ""),
            ExperienceLevel::Lead
        );
        assert_eq!(
            e.detect_experience_level("Mid-Level Analyst", ""),
            ExperienceLevel::Mid
        );
    }

    #[test]
    fn executive_outranks_senior() {
        assert_eq!(
            ex().detect_experience_level("Senior Director of Engineering", ""),
            ExperienceLevel::Executive
        );
        assert_eq!(
            ex().detect_experience_level("VP, Platform", ""),
            ExperienceLevel::Executive
        );
    }

    #[test]
    fn experience_matches_whole_words_only() {
        let e = ex();
        assert_eq!(
            e.detect_experience_level("Seniority Review Specialist", ""),
            ExperienceLevel::Unknown
        );
        assert_eq!(
            e.detect_experience_level("Sr. Platform Engineer", ""),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn experience_falls_back_to_description() {
        assert_eq!(
            ex().detect_experience_level(
                "Backend Engineer",
                "We are hiring a senior engineer to own our API layer."
            ),
            ExperienceLevel::Senior
        );
    }

    #[test]
    fn experience_defaults_to_unknown() {
        assert_eq!(
            ex().detect_experience_level("Software Engineer", "Build things."),
            ExperienceLevel::Unknown
        );
    }

    #[test]
    fn salary_comma_grouped_range() {
        let s = ex().extract_salary("Pay: $120,000 - $150,000 per year").unwrap();
        assert_eq!(s.min, Some(120_000.0));
        assert_eq!(s.max, Some(150_000.0));
        assert_eq!(s.currency, "USD");
    }

    #[test]
    fn salary_k_shorthand_range() {
        let s = ex().extract_salary("120k-150k depending on experience").unwrap();
        assert_eq!(s.min, Some(120_000.0));
        assert_eq!(s.max, Some(150_000.0));
    }

    #[test]
    fn salary_single_figure_sets_both_bounds() {
        let s = ex().extract_salary("Compensation: 140k").unwrap();
        assert_eq!(s.min, Some(140_000.0));
        assert_eq!(s.max, Some(140_000.0));
        assert_eq!(s.currency, "USD");
    }

    #[test]
    fn salary_ceiling_only() {
        let s = ex().extract_salary("Earn up to $150k in your first year").unwrap();
        assert_eq!(s.min, None);
        assert_eq!(s.max, Some(150_000.0));
    }

    #[test]
    fn salary_floor_only() {
        let s = ex().extract_salary("Base starting at $110,000").unwrap();
        assert_eq!(s.min, Some(110_000.0));
        assert_eq!(s.max, None);

        let s = ex().extract_salary("$95,000+ plus equity").unwrap();
        assert_eq!(s.min, Some(95_000.0));
        assert_eq!(s.max, None);
    }

    #[test]
    fn salary_explicit_currency_code_wins() {
        let s = ex().extract_salary("60,000 - 70,000 EUR annually").unwrap();
        assert_eq!(s.min, Some(60_000.0));
        assert_eq!(s.max, Some(70_000.0));
        assert_eq!(s.currency, "EUR");
    }

    #[test]
    fn salary_pound_symbol_maps_to_gbp() {
        let s = ex().extract_salary("£60,000 - £70,000").unwrap();
        assert_eq!(s.currency, "GBP");
    }

    #[test]
    fn salary_ignores_year_ranges_and_hourly_rates() {
        assert_eq!(ex().extract_salary("Requires 2-3 years of experience"), None);
        assert_eq!(ex().extract_salary("$30 - $45 per hour"), None);
    }

    #[test]
    fn salary_ignores_bare_numbers_after_floor_and_ceiling_phrases() {
        // "from"/"up to" followed by a plain number is prose, not pay.
        assert_eq!(
            ex().extract_salary("Serving employees here from 2020 onwards"),
            None
        );
        assert_eq!(
            ex().extract_salary("Teams scale up to 5000 requests per second"),
            None
        );
        // With a symbol or k suffix the same phrasing still extracts.
        assert_eq!(
            ex().extract_salary("up to 150k").unwrap().max,
            Some(150_000.0)
        );
        assert_eq!(
            ex().extract_salary("starting at $110,000").unwrap().min,
            Some(110_000.0)
        );
    }

    #[test]
    fn salary_absent_on_plain_text() {
        assert_eq!(ex().extract_salary("Competitive compensation and benefits"), None);
        assert_eq!(ex().extract_salary(""), None);
    }

    #[test]
    fn salary_is_deterministic() {
        let text = "We pay $100,000 - $130,000 USD";
        assert_eq!(ex().extract_salary(text), ex().extract_salary(text));
    }

    #[test]
    fn keywords_whole_word_and_sorted() {
        let kws = ex().extract_keywords(
            "Senior Python Engineer",
            "You will build REST services in Python on AWS with Docker.",
        );
        assert_eq!(kws, vec!["aws", "docker", "python", "rest"]);
    }

    #[test]
    fn keywords_include_api() {
        let kws = ex().extract_keywords("Backend Engineer", "Design a public API in Python.");
        assert_eq!(kws, vec!["api", "backend", "python"]);
    }

    #[test]
    fn keywords_html_does_not_match_ml() {
        let kws = ex().extract_keywords("Frontend Engineer", "Strong HTML and CSS skills");
        assert!(!kws.contains(&"ml".to_string()));
        assert!(kws.contains(&"frontend".to_string()));
    }

    #[test]
    fn keywords_empty_without_vocab_hits() {
        assert!(ex().extract_keywords("Accountant", "Ledger reconciliation").is_empty());
    }

    #[test]
    fn linkedin_url_is_percent_encoded() {
        let url = ex().linkedin_search_url("Senior Backend Engineer", "Acme Corp");
        assert_eq!(
            url,
            "https://www.linkedin.com/jobs/search/?keywords=Senior%20Backend%20Engineer%20Acme%20Corp"
        );
    }
}
