// Price sources: the data-acquisition side of a request.

pub mod csv_file;
pub mod yahoo;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::model::{FetchRequest, RawQuote};

pub use csv_file::CsvSource;
pub use yahoo::YahooSource;

/// Supplies raw daily rows for a ticker and date range. Rows may be
/// unordered and may lack a close; the normalizer deals with both.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawQuote>, SourceError>;
}

/// Builds the source selected in the config.
pub fn build_source(cfg: &SourceConfig) -> Result<Box<dyn PriceSource>, SourceError> {
    let source: Box<dyn PriceSource> = match cfg {
        SourceConfig::Yahoo {
            base_url,
            timeout_seconds,
        } => Box::new(YahooSource::new(base_url, *timeout_seconds)?),
        SourceConfig::Csv { path } => Box::new(CsvSource::new(path)),
    };
    Ok(source)
}
