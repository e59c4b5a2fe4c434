use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use jobscout::{formatter, logger, ExperienceLevel, JobFilter, SourceKind, WorkMode};

#[derive(Parser)]
#[command(
    name = "jobscout",
    version,
    about = "Scrape job postings from ATS platforms, filter them, and export the results"
)]
struct Cli {
    #[command(subcommand)]
    platform: Platform,
}

#[derive(Subcommand)]
enum Platform {
    /// Scrape a Greenhouse board
    Greenhouse {
        /// Company identifier from the Greenhouse board URL
        #[arg(long)]
        company: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Scrape a Lever board
    Lever {
        /// Company identifier from the Lever board URL
        #[arg(long)]
        company: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Scrape a Workday board
    Workday {
        /// Company name for display
        #[arg(long)]
        company_name: String,
        /// Full Workday board URL (deployments have no stable URL pattern)
        #[arg(long)]
        url: String,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Keywords to match in the job title (any match passes)
    #[arg(long = "keywords", num_args = 1..)]
    keywords: Vec<String>,

    /// Locations to filter by (any match passes)
    #[arg(long = "location", num_args = 1..)]
    locations: Vec<String>,

    /// Work mode filter: remote, hybrid, onsite, unknown
    #[arg(long = "work-mode", num_args = 1..)]
    work_modes: Vec<WorkMode>,

    /// Experience level filter: internship, entry, mid, senior, lead, executive
    #[arg(long = "experience", num_args = 1..)]
    experience_levels: Vec<ExperienceLevel>,

    /// Minimum salary filter
    #[arg(long = "min-salary")]
    min_salary: Option<f64>,

    /// Network timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    format: OutputFormat,

    /// Show descriptions and keywords in console output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Console,
    Json,
    Csv,
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    let cli = Cli::parse();

    let (kind, company, base_url, common) = match &cli.platform {
        Platform::Greenhouse { company, common } => {
            (SourceKind::Greenhouse, company.clone(), None, common)
        }
        Platform::Lever { company, common } => (SourceKind::Lever, company.clone(), None, common),
        Platform::Workday {
            company_name,
            url,
            common,
        } => (
            SourceKind::Workday,
            company_name.clone(),
            Some(url.clone()),
            common,
        ),
    };

    let filter = JobFilter {
        title_keywords: common.keywords.clone(),
        locations: common.locations.clone(),
        work_modes: common.work_modes.clone(),
        experience_levels: common.experience_levels.clone(),
        min_salary: common.min_salary,
    };
    // Criteria problems surface before any fetch starts.
    filter.validate()?;

    let source = kind.build(
        &company,
        base_url.as_deref(),
        Duration::from_secs(common.timeout),
    )?;

    info!("Scraping {} jobs for {}...", source.source_name().as_str(), company);
    let outcome = source.scrape()?;
    info!(
        "Found {} jobs ({} skipped as malformed)",
        outcome.jobs.len(),
        outcome.skipped_count()
    );

    let filtered: Vec<_> = outcome
        .jobs
        .iter()
        .filter(|j| filter.matches(j))
        .cloned()
        .collect();
    if filtered.len() < outcome.jobs.len() {
        info!("Filtered to {} jobs", filtered.len());
    }

    let rendered = match common.format {
        OutputFormat::Json => formatter::to_json(&filtered)?,
        OutputFormat::Csv => formatter::to_csv(&filtered)?,
        OutputFormat::Console => formatter::to_console(&filtered, common.verbose),
    };

    match &common.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Results written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
