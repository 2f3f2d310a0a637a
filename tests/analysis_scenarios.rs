use chrono::{Duration, NaiveDate};
use stock_trend::analyzer::{
    compute_default_summary, compute_moving_average, compute_rolling_volatility, trailing_window,
    Analyzer, AnalyzerImpl,
};
use stock_trend::config::AnalysisConfig;
use stock_trend::error::{AnalysisError, PipelineError, SourceError};
use stock_trend::model::{FetchRequest, PricePoint, PriceSeries, RawQuote};
use stock_trend::pipeline::run_request;
use stock_trend::source::{CsvSource, PriceSource};
use std::io::Write;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series_of(closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(start() + Duration::days(i as i64), c))
        .collect();
    PriceSeries::new(points).unwrap()
}

/// Deterministic pseudo-random walk so the properties run over a spread of inputs.
fn walk(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut price = 100.0;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let step = ((state >> 33) % 1000) as f64 / 100.0 - 5.0;
            price = f64::max(1.0, price + step);
            price
        })
        .collect()
}

#[test]
fn moving_average_defined_count_and_values() {
    for (len, window) in [(1, 1), (5, 2), (19, 20), (20, 20), (73, 20), (40, 7)] {
        let closes = walk(len, len as u64 * 31 + window as u64);
        let series = series_of(&closes);
        let ma = compute_moving_average(&series, window).unwrap();

        assert_eq!(ma.len(), len);
        assert_eq!(ma.iter().flatten().count(), (len + 1).saturating_sub(window));
        for (i, value) in ma.iter().enumerate() {
            if i + 1 < window {
                assert!(value.is_none());
            } else {
                let slice = &closes[i + 1 - window..=i];
                let expected = slice.iter().sum::<f64>() / window as f64;
                assert!((value.unwrap() - expected).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn volatility_alignment_matches_moving_average() {
    for len in [2, 10, 20, 21, 64] {
        let series = series_of(&walk(len, 7 + len as u64));
        let ma = compute_moving_average(&series, 5).unwrap();
        let vol = compute_rolling_volatility(&series, 5).unwrap();
        let ma_defined: Vec<bool> = ma.iter().map(Option::is_some).collect();
        let vol_defined: Vec<bool> = vol.iter().map(Option::is_some).collect();
        assert_eq!(ma_defined, vol_defined);
    }
}

#[test]
fn trailing_window_returns_whole_series_when_large() {
    let series = series_of(&walk(12, 3));
    for n in [12, 13, 500] {
        let window = trailing_window(&series, n).unwrap();
        assert_eq!(window.points, series.points().to_vec());
    }
    let ten = trailing_window(&series, 10).unwrap();
    assert_eq!(ten.points.as_slice(), &series.points()[2..]);
}

#[test]
fn summary_is_pure() {
    let series = series_of(&walk(45, 11));
    let a = compute_default_summary(&series).unwrap();
    let b = compute_default_summary(&series).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_series_fails_every_operation() {
    let empty = PriceSeries::empty();
    assert_eq!(compute_moving_average(&empty, 20), Err(AnalysisError::EmptySeries));
    assert_eq!(compute_rolling_volatility(&empty, 20), Err(AnalysisError::EmptySeries));
    assert_eq!(compute_default_summary(&empty), Err(AnalysisError::EmptySeries));
    assert_eq!(trailing_window(&empty, 50), Err(AnalysisError::EmptySeries));
}

#[test]
fn degenerate_first_price_is_rejected_consistently() {
    let series = series_of(&[0.0, 5.0, 6.0]);
    let analyzer = AnalyzerImpl::new(AnalysisConfig::default());
    for _ in 0..3 {
        assert_eq!(
            analyzer.compute_summary(&series),
            Err(AnalysisError::DivisionUndefined { first_price: 0.0 })
        );
    }
}

struct VecSource(Vec<RawQuote>);

#[async_trait::async_trait]
impl PriceSource for VecSource {
    async fn fetch(&self, _req: &FetchRequest) -> Result<Vec<RawQuote>, SourceError> {
        Ok(self.0.clone())
    }
}

fn request(end_day: i64) -> FetchRequest {
    FetchRequest {
        ticker: "AAPL".into(),
        start: start(),
        end: start() + Duration::days(end_day),
    }
}

#[tokio::test]
async fn pipeline_builds_report_from_unordered_rows() {
    let closes = walk(30, 5);
    let mut raw: Vec<RawQuote> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| RawQuote {
            date: start() + Duration::days(i as i64),
            close: Some(c),
        })
        .collect();
    raw.reverse();
    raw.push(RawQuote { date: start() + Duration::days(30), close: None });

    let report = run_request(&VecSource(raw), &AnalyzerImpl::default(), &request(31))
        .await
        .unwrap();

    assert_eq!(report.ticker, "AAPL");
    assert_eq!(report.price_trend.series[0].points.len(), 30);
    assert_eq!(report.recent_trend.series[0].points.len(), 30);
    assert_eq!(report.table.rows.len(), 10);
    assert_eq!(report.metrics[0].value, format!("${:.2}", closes[29]));
    assert_ne!(report.metrics[2].value, "n/a");
}

#[tokio::test]
async fn pipeline_reports_no_data() {
    let err = run_request(&VecSource(Vec::new()), &AnalyzerImpl::default(), &request(10))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoData { .. }));
}

#[tokio::test]
async fn pipeline_over_csv_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Date,Close").unwrap();
    for (i, price) in [100.0, 110.0, 90.0, 120.0, 130.0].iter().enumerate() {
        let date = start() + Duration::days(i as i64);
        writeln!(file, "{},{}", date.format("%Y-%m-%d"), price).unwrap();
    }

    let analyzer = AnalyzerImpl::new(AnalysisConfig {
        ma_window: 2,
        volatility_window: 2,
        ..AnalysisConfig::default()
    });
    let report = run_request(&CsvSource::new(file.path()), &analyzer, &request(5))
        .await
        .unwrap();

    let ma: Vec<f64> = report.price_trend.series[1]
        .points
        .iter()
        .filter_map(|p| p.value)
        .collect();
    assert_eq!(ma, vec![105.0, 100.0, 105.0, 125.0]);
    assert_eq!(report.metrics[1].value, "30.00 USD");
    assert_eq!(report.metrics[1].delta.as_deref(), Some("30.00%"));
}
