use crate::error::ScrapeError;
use crate::models::Job;

const CSV_HEADERS: [&str; 13] = [
    "title",
    "company",
    "location",
    "url",
    "source",
    "work_mode",
    "experience_level",
    "salary_min",
    "salary_max",
    "salary_currency",
    "posted_date",
    "linkedin_url",
    "keywords",
];

pub fn to_json(jobs: &[Job]) -> Result<String, ScrapeError> {
    serde_json::to_string_pretty(jobs)
        .map_err(|e| ScrapeError::Output(std::io::Error::other(e)))
}

pub fn to_csv(jobs: &[Job]) -> Result<String, ScrapeError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for job in jobs {
        let fmt_salary = |v: Option<f64>| v.map(|s| s.to_string()).unwrap_or_default();
        let salary_min = fmt_salary(job.salary_min);
        let salary_max = fmt_salary(job.salary_max);
        let keywords = job.keywords.join(",");
        writer.write_record([
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.url.as_str(),
            job.source.as_str(),
            job.work_mode.as_str(),
            job.experience_level.as_str(),
            salary_min.as_str(),
            salary_max.as_str(),
            job.salary_currency.as_deref().unwrap_or_default(),
            job.posted_date.as_deref().unwrap_or_default(),
            job.linkedin_url.as_str(),
            keywords.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Output(std::io::Error::other(e)))?;
    String::from_utf8(bytes).map_err(|e| ScrapeError::Output(std::io::Error::other(e)))
}

pub fn to_console(jobs: &[Job], verbose: bool) -> String {
    if jobs.is_empty() {
        return "No jobs found.".to_string();
    }

    let mut out = Vec::new();
    let rule = "=".repeat(80);
    out.push(format!("\n{}", rule));
    out.push(format!("Found {} job(s)", jobs.len()));
    out.push(format!("{}\n", rule));

    for (i, job) in jobs.iter().enumerate() {
        out.push(format!("{}. {}", i + 1, job.title));
        out.push(format!("   Company: {}", job.company));
        out.push(format!("   Location: {}", job.location));
        out.push(format!("   Work Mode: {}", job.work_mode.as_str()));
        out.push(format!("   Experience: {}", job.experience_level.as_str()));

        if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
            out.push(format!(
                "   Salary: {} - {} {}",
                min,
                max,
                job.salary_currency.as_deref().unwrap_or("USD")
            ));
        }

        out.push(format!("   URL: {}", job.url));
        out.push(format!("   LinkedIn Search: {}", job.linkedin_url));

        if verbose {
            if !job.keywords.is_empty() {
                out.push(format!("   Keywords: {}", job.keywords.join(", ")));
            }
            if !job.description.is_empty() {
                out.push(format!("   Description: {}", job.description));
            }
        }

        out.push(format!("   Source: {}", job.source.as_str()));
        out.push(String::new());
    }

    out.join("\n")
}
