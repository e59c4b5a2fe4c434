use crate::error::ScrapeError;
use crate::models::{ExperienceLevel, Job, WorkMode};

/// Optional filter criteria applied to scraped jobs. Categories combine
/// with AND; multiple values within one category combine with OR. An
/// empty/absent criterion is always satisfied.
#[derive(Debug, Default, Clone)]
pub struct JobFilter {
    pub title_keywords: Vec<String>,
    pub locations: Vec<String>,
    pub work_modes: Vec<WorkMode>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub min_salary: Option<f64>,
}

impl JobFilter {
    /// Structural validation, run before any fetch starts.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if let Some(min) = self.min_salary {
            if !min.is_finite() || min < 0.0 {
                return Err(ScrapeError::InvalidCriteria(format!(
                    "min salary must be a non-negative number, got {}",
                    min
                )));
            }
        }
        if self.title_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ScrapeError::InvalidCriteria(
                "title keywords must not be blank".to_string(),
            ));
        }
        if self.locations.iter().any(|l| l.trim().is_empty()) {
            return Err(ScrapeError::InvalidCriteria(
                "locations must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `job` satisfies every provided criterion.
    pub fn matches(&self, job: &Job) -> bool {
        if !self.title_keywords.is_empty() {
            let title = job.title.to_lowercase();
            if !self
                .title_keywords
                .iter()
                .any(|kw| title.contains(&kw.to_lowercase()))
            {
                return false;
            }
        }

        if !self.locations.is_empty() {
            let location = job.location.to_lowercase();
            if !self
                .locations
                .iter()
                .any(|loc| location.contains(&loc.to_lowercase()))
            {
                return false;
            }
        }

        if !self.work_modes.is_empty() && !self.work_modes.contains(&job.work_mode) {
            return false;
        }

        if !self.experience_levels.is_empty()
            && !self.experience_levels.contains(&job.experience_level)
        {
            return false;
        }

        if let Some(min) = self.min_salary {
            // Prefer the stated ceiling; a record with no salary data at
            // all never matches a salary criterion.
            match job.salary_max.or(job.salary_min) {
                Some(best) => {
                    if best < min {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Extractor;
    use crate::models::{RawPosting, Source};

    fn job(title: &str, location: &str, description: &str) -> Job {
        let ex = Extractor::new();
        Job::from_raw(
            RawPosting {
                title: title.to_string(),
                location: location.to_string(),
                url: "https://example.com/j/1".to_string(),
                description: description.to_string(),
                ..RawPosting::default()
            },
            "Acme",
            Source::Greenhouse,
            &ex,
        )
        .unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = JobFilter::default();
        assert!(f.matches(&job("Senior Engineer", "Remote", "")));
        assert!(f.matches(&job("Accountant", "Berlin", "")));
    }

    #[test]
    fn title_keywords_are_case_insensitive_substrings() {
        let j = job("Senior Python Engineer", "Remote", "");
        let f = JobFilter {
            title_keywords: vec!["python".to_string()],
            ..JobFilter::default()
        };
        assert!(f.matches(&j));

        let f = JobFilter {
            title_keywords: vec!["java".to_string(), "ruby".to_string()],
            ..JobFilter::default()
        };
        assert!(!f.matches(&j));
    }

    #[test]
    fn or_within_category_and_between_categories() {
        let j = job("Senior Python Engineer", "San Francisco, CA", "");

        let only_a = JobFilter {
            locations: vec!["san francisco".to_string()],
            ..JobFilter::default()
        };
        let only_b = JobFilter {
            locations: vec!["new york".to_string()],
            ..JobFilter::default()
        };
        let either = JobFilter {
            locations: vec!["san francisco".to_string(), "new york".to_string()],
            ..JobFilter::default()
        };
        // OR law: matching either single-value filter matches the combined one.
        assert_eq!(
            either.matches(&j),
            only_a.matches(&j) || only_b.matches(&j)
        );

        // AND across categories: a failing second category rejects.
        let and = JobFilter {
            locations: vec!["san francisco".to_string()],
            work_modes: vec![WorkMode::Remote],
            ..JobFilter::default()
        };
        assert!(!and.matches(&j));
    }

    #[test]
    fn work_mode_and_experience_are_set_membership() {
        let j = job("Senior Engineer", "Remote (US)", "");
        let f = JobFilter {
            work_modes: vec![WorkMode::Remote, WorkMode::Hybrid],
            experience_levels: vec![ExperienceLevel::Senior],
            ..JobFilter::default()
        };
        assert!(f.matches(&j));

        let f = JobFilter {
            work_modes: vec![WorkMode::Onsite],
            ..JobFilter::default()
        };
        assert!(!f.matches(&j));
    }

    #[test]
    fn min_salary_prefers_ceiling() {
        let j = job("Engineer", "Remote", "Pay: $120,000 - $150,000");
        let f = JobFilter {
            min_salary: Some(140_000.0),
            ..JobFilter::default()
        };
        // salary_max (150k) clears the bar even though salary_min does not.
        assert!(f.matches(&j));

        let f = JobFilter {
            min_salary: Some(160_000.0),
            ..JobFilter::default()
        };
        assert!(!f.matches(&j));
    }

    #[test]
    fn min_salary_rejects_records_without_salary_data() {
        let j = job("Engineer", "Remote", "Competitive pay");
        assert_eq!(j.salary_min, None);
        let f = JobFilter {
            min_salary: Some(150_000.0),
            ..JobFilter::default()
        };
        assert!(!f.matches(&j));
    }

    #[test]
    fn filtering_is_idempotent() {
        let jobs = vec![
            job("Senior Engineer", "Remote", ""),
            job("Junior Engineer", "NYC", ""),
        ];
        let f = JobFilter {
            experience_levels: vec![ExperienceLevel::Senior],
            ..JobFilter::default()
        };
        let once: Vec<&Job> = jobs.iter().filter(|j| f.matches(j)).collect();
        let twice: Vec<&Job> = once.iter().filter(|j| f.matches(j)).copied().collect();
        assert_eq!(once.len(), 1);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn validate_rejects_negative_min_salary() {
        let f = JobFilter {
            min_salary: Some(-1.0),
            ..JobFilter::default()
        };
        assert!(matches!(
            f.validate(),
            Err(ScrapeError::InvalidCriteria(_))
        ));
    }

    #[test]
    fn validate_rejects_blank_keywords() {
        let f = JobFilter {
            title_keywords: vec!["  ".to_string()],
            ..JobFilter::default()
        };
        assert!(f.validate().is_err());

        let ok = JobFilter {
            title_keywords: vec!["rust".to_string()],
            min_salary: Some(100_000.0),
            ..JobFilter::default()
        };
        assert!(ok.validate().is_ok());
    }
}
