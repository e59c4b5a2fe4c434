pub mod error;
pub mod extractor;
pub mod filter;
pub mod formatter;
pub mod greenhouse;
pub mod lever;
pub mod logger;
pub mod models;
pub mod session;
pub mod source;
pub mod workday;

// Exporting types for convenience
pub use error::{PostingError, ScrapeError};
pub use extractor::{Extractor, SalaryRange};
pub use filter::JobFilter;
pub use greenhouse::GreenhouseSource;
pub use lever::LeverSource;
pub use models::{ExperienceLevel, Job, RawPosting, Source, WorkMode};
pub use session::Session;
pub use source::{JobSource, ScrapeOutcome, SourceKind};
pub use workday::WorkdaySource;
