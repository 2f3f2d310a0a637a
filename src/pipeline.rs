use crate::analyzer::{Analyzer, AnalyzerImpl};
use crate::error::{AnalysisError, PipelineError};
use crate::model::FetchRequest;
use crate::normalizer::normalize;
use crate::report::Report;
use crate::source::PriceSource;
use tracing::{info, warn};

/// Runs one request end to end: fetch, normalize, analyze, build the report.
/// Any failure ends the request; nothing partial is returned.
pub async fn run_request(
    source: &dyn PriceSource,
    analyzer: &AnalyzerImpl,
    request: &FetchRequest,
) -> Result<Report, PipelineError> {
    info!("Processing {} ({} .. {})", request.ticker, request.start, request.end);

    let raw = source.fetch(request).await?;
    let series = normalize(raw);
    info!("{}: {} daily closes", request.ticker, series.len());

    let outcome = analyzer.analyze(&series).map_err(|e| match e {
        AnalysisError::EmptySeries => {
            warn!("No data for {}", request.ticker);
            PipelineError::NoData {
                ticker: request.ticker.clone(),
            }
        }
        other => other.into(),
    })?;

    info!(
        "{}: latest = {:.2}, change = {:.2} ({:.2}%)",
        request.ticker,
        outcome.summary.latest_price,
        outcome.summary.absolute_change,
        outcome.summary.percent_change
    );

    Ok(Report::build(&request.ticker, &outcome, analyzer.config())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::model::RawQuote;
    use chrono::NaiveDate;

    struct FixedSource(Vec<RawQuote>);

    #[async_trait::async_trait]
    impl PriceSource for FixedSource {
        async fn fetch(&self, _req: &FetchRequest) -> Result<Vec<RawQuote>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn request() -> FetchRequest {
        FetchRequest {
            ticker: "AAPL".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_empty_fetch_is_no_data() {
        let source = FixedSource(vec![RawQuote {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            close: None,
        }]);
        let err = run_request(&source, &AnalyzerImpl::default(), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoData { ref ticker } if ticker == "AAPL"));
        assert!(err.to_string().starts_with("No data found"));
    }

    #[tokio::test]
    async fn test_zero_first_price_is_terminal() {
        let source = FixedSource(vec![
            RawQuote { date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), close: Some(0.0) },
            RawQuote { date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(), close: Some(1.0) },
        ]);
        let err = run_request(&source, &AnalyzerImpl::default(), &request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Analysis(AnalysisError::DivisionUndefined { .. })
        ));
    }
}
