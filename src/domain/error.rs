use std::time::Duration;

use super::scrape_job::JobId;

/// Everything that can go wrong on the live scraping path.
///
/// None of these reach a caller of the reconciler; they are reported through
/// its fallback hook and the static catalog is served instead.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("could not reach provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected provider response: {0}")]
    Decode(String),
    #[error("scrape job {job} failed")]
    Failed { job: JobId },
    #[error("scrape job {job} timed out after {waited:?}")]
    TimedOut { job: JobId, waited: Duration },
    #[error("live scraping requested but no provider credential is configured")]
    Configuration,
}

/// Caller input problems. The only error kind surfaced to API consumers.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}
