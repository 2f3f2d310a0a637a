use crate::analyzer::indicators;
use crate::config::{AnalysisConfig, DEFAULT_WINDOW};
use crate::error::AnalysisError;
use crate::model::{AnalysisOutcome, DerivedSeries, PriceSeries, SummaryStats, Window};

/// Trait defining the interface for a price series analyzer.
pub trait Analyzer {
    fn compute_moving_average(&self, series: &PriceSeries) -> Result<Vec<Option<f64>>, AnalysisError>;
    fn compute_rolling_volatility(&self, series: &PriceSeries) -> Result<Vec<Option<f64>>, AnalysisError>;
    fn compute_summary(&self, series: &PriceSeries) -> Result<SummaryStats, AnalysisError>;
    fn trailing_window(&self, series: &PriceSeries, n: usize) -> Result<Window, AnalysisError>;

    /// Both windowed series aligned to the series dates.
    fn compute_derived(&self, series: &PriceSeries) -> Result<DerivedSeries, AnalysisError> {
        Ok(DerivedSeries {
            dates: series.dates(),
            moving_average: self.compute_moving_average(series)?,
            rolling_volatility: self.compute_rolling_volatility(series)?,
        })
    }

    fn analyze(&self, series: &PriceSeries) -> Result<AnalysisOutcome, AnalysisError> {
        let derived = self.compute_derived(series)?;
        let summary = self.compute_summary(series)?;
        Ok(AnalysisOutcome {
            series: series.clone(),
            derived,
            summary,
        })
    }
}

/// Stateless analyzer parameterized by the configured window sizes.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerImpl {
    config: AnalysisConfig,
}

impl AnalyzerImpl {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

impl Analyzer for AnalyzerImpl {
    fn compute_moving_average(&self, series: &PriceSeries) -> Result<Vec<Option<f64>>, AnalysisError> {
        compute_moving_average(series, self.config.ma_window)
    }

    fn compute_rolling_volatility(&self, series: &PriceSeries) -> Result<Vec<Option<f64>>, AnalysisError> {
        compute_rolling_volatility(series, self.config.volatility_window)
    }

    fn compute_summary(&self, series: &PriceSeries) -> Result<SummaryStats, AnalysisError> {
        compute_summary(series, self.config.volatility_window)
    }

    fn trailing_window(&self, series: &PriceSeries, n: usize) -> Result<Window, AnalysisError> {
        trailing_window(series, n)
    }
}

fn ensure_non_empty(series: &PriceSeries) -> Result<(), AnalysisError> {
    if series.is_empty() {
        Err(AnalysisError::EmptySeries)
    } else {
        Ok(())
    }
}

fn ensure_window(window: usize, min: usize) -> Result<(), AnalysisError> {
    if window < min {
        Err(AnalysisError::InvalidWindow { window, min })
    } else {
        Ok(())
    }
}

/// Trailing simple moving average of the closes. Positions before the first
/// full window are `None`.
pub fn compute_moving_average(
    series: &PriceSeries,
    window: usize,
) -> Result<Vec<Option<f64>>, AnalysisError> {
    ensure_non_empty(series)?;
    ensure_window(window, 1)?;
    Ok(indicators::moving_average(&series.closes(), window))
}

/// Trailing sample standard deviation of the closes, aligned like
/// [`compute_moving_average`].
pub fn compute_rolling_volatility(
    series: &PriceSeries,
    window: usize,
) -> Result<Vec<Option<f64>>, AnalysisError> {
    ensure_non_empty(series)?;
    ensure_window(window, 2)?;
    Ok(indicators::rolling_volatility(&series.closes(), window))
}

/// Endpoint statistics of the series.
///
/// A first price that makes the percent change non-finite (zero, subnormal,
/// NaN or infinite) is rejected with [`AnalysisError::DivisionUndefined`].
pub fn compute_summary(
    series: &PriceSeries,
    volatility_window: usize,
) -> Result<SummaryStats, AnalysisError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.close, last.close),
        _ => return Err(AnalysisError::EmptySeries),
    };
    let absolute_change = last - first;
    let percent_change = absolute_change / first * 100.0;
    if first == 0.0 || !percent_change.is_finite() {
        return Err(AnalysisError::DivisionUndefined { first_price: first });
    }
    let latest_volatility = compute_rolling_volatility(series, volatility_window)?
        .last()
        .copied()
        .flatten();

    Ok(SummaryStats {
        latest_price: last,
        first_price: first,
        absolute_change,
        percent_change,
        latest_volatility,
    })
}

/// Summary using the default 20-row volatility window.
pub fn compute_default_summary(series: &PriceSeries) -> Result<SummaryStats, AnalysisError> {
    compute_summary(series, DEFAULT_WINDOW)
}

/// The last `min(n, len)` rows in original order.
pub fn trailing_window(series: &PriceSeries, n: usize) -> Result<Window, AnalysisError> {
    ensure_non_empty(series)?;
    let offset = series.len().saturating_sub(n);
    Ok(Window {
        offset,
        points: series.points()[offset..].to_vec(),
    })
}
