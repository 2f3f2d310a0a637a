// Error types for every layer of the pipeline.
use thiserror::Error;

/// Failures of the series analytics. All of them are terminal for a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("percent change is undefined for a first price of {first_price}")]
    DivisionUndefined { first_price: f64 },

    #[error("window {window} is too small (minimum {min})")]
    InvalidWindow { window: usize, min: usize },

    #[error("dates must be strictly ascending (violated at index {index})")]
    UnorderedDates { index: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("bad timestamp: {0}")]
    BadTimestamp(i64),

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("rate limited by provider")]
    RateLimited,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No data found for the selected ticker & date range ({ticker}).")]
    NoData { ticker: String },

    #[error("fetch failed: {0}")]
    Source(#[from] SourceError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}
