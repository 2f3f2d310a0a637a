use crate::error::SourceError;
use crate::model::{FetchRequest, RawQuote};
use crate::parser::{ChartParser, Parser};
use crate::source::PriceSource;
use crate::utils::date_to_timestamp;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{info, warn};

/// Daily closes from a Yahoo-style `/v8/finance/chart` endpoint.
pub struct YahooSource {
    client: Client,
    base_url: String,
    parser: ChartParser,
}

impl YahooSource {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) StockTrend/0.1")
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: ChartParser::new(),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, ticker.trim())
    }

    /// `period2` is exclusive: the end date itself is not requested.
    fn query_params(req: &FetchRequest) -> [(&'static str, String); 3] {
        [
            ("period1", date_to_timestamp(req.start).to_string()),
            ("period2", date_to_timestamp(req.end).to_string()),
            ("interval", "1d".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl PriceSource for YahooSource {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawQuote>, SourceError> {
        let url = self.chart_url(&req.ticker);
        info!("Fetching {} ({} .. {}) from {}", req.ticker, req.start, req.end, url);

        let response = self
            .client
            .get(&url)
            .query(&Self::query_params(req))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited while fetching {}", req.ticker);
            return Err(SourceError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            // The chart endpoint explains unknown symbols in a JSON body.
            if status == StatusCode::NOT_FOUND {
                self.parser.parse(&body)?;
            }
            warn!("Chart API responded [{}] for {}", status, req.ticker);
            return Err(SourceError::BadStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let rows = self.parser.parse(&body)?;
        info!("Received {} rows for {}", rows.len(), req.ticker);
        Ok(rows)
    }
}
