use thiserror::Error;

/// Fatal errors for one adapter invocation. Per-posting problems are
/// [`PostingError`] and never abort a batch.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Every candidate endpoint failed (network-level failure or non-success
    /// status across the board). Distinct from an empty-but-valid board,
    /// which is a successful scrape with zero jobs.
    #[error("{platform} unreachable: {reason}")]
    SourceUnreachable { platform: &'static str, reason: String },

    /// A filter criterion is structurally invalid. Raised before any fetch.
    #[error("invalid filter criteria: {0}")]
    InvalidCriteria(String),

    /// Writing results to the requested sink failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Per-posting parse failures. Recovered locally: the posting is skipped,
/// counted in the scrape outcome, and the batch continues.
#[derive(Debug, Error, PartialEq)]
pub enum PostingError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed posting: {0}")]
    Malformed(String),
}
