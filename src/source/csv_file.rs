use crate::error::{ParseError, SourceError};
use crate::model::{FetchRequest, RawQuote};
use crate::source::PriceSource;
use crate::utils::parse_date;
use csv::StringRecord;
use std::path::PathBuf;
use tracing::info;

/// Daily closes from a local CSV export with `Date` and `Close` columns.
/// Other columns (`Open`, `High`, `Volume`, ...) are ignored.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PriceSource for CsvSource {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawQuote>, SourceError> {
        info!("Reading {} from {}", req.ticker, self.path.display());
        let content = tokio::fs::read(&self.path).await?;
        let rows = parse_csv(&content)?
            .into_iter()
            .filter(|q| q.date >= req.start && q.date < req.end)
            .collect::<Vec<_>>();
        info!("Kept {} rows for {} in range", rows.len(), req.ticker);
        Ok(rows)
    }
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or(ParseError::MissingField(name))
}

fn parse_csv(content: &[u8]) -> Result<Vec<RawQuote>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content);
    let headers = reader.headers()?.clone();
    let date_idx = column(&headers, "Date")?;
    let close_idx = column(&headers, "Close")?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| ParseError::InvalidRow {
            line,
            reason: format!("bad date '{}'", raw_date),
        })?;

        let close = match record.get(close_idx).unwrap_or_default() {
            "" | "null" | "NaN" | "nan" => None,
            raw => Some(raw.parse::<f64>().map_err(|e| ParseError::InvalidRow {
                line,
                reason: format!("bad close '{}': {}", raw, e),
            })?),
        };

        rows.push(RawQuote { date, close });
    }
    Ok(rows)
}
