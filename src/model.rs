// Core structs: PriceSeries, DerivedSeries, SummaryStats
use crate::error::AnalysisError;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Daily closes for one instrument, strictly ascending by date.
///
/// Closing prices are not validated: zero and negative values are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, rejecting out-of-order or duplicate dates.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, AnalysisError> {
        if let Some(pos) = points.windows(2).position(|w| w[0].date >= w[1].date) {
            return Err(AnalysisError::UnorderedDates { index: pos + 1 });
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// A provider row before normalization. `close` is `None` when the provider
/// had no close for that day.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Windowed series aligned index-for-index with the source `PriceSeries`.
/// The first `window - 1` entries are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub dates: Vec<NaiveDate>,
    pub moving_average: Vec<Option<f64>>,
    pub rolling_volatility: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub latest_price: f64,
    pub first_price: f64,
    pub absolute_change: f64,
    pub percent_change: f64,
    pub latest_volatility: Option<f64>,
}

/// Trailing slice of a `PriceSeries`. `offset` is the index of the first row
/// in the source series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    pub offset: usize,
    pub points: Vec<PricePoint>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Joins the window with the derived values at the same positions.
    pub fn rows(&self, derived: &DerivedSeries) -> Vec<WindowRow> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let idx = self.offset + i;
                WindowRow {
                    date: p.date,
                    close: p.close,
                    moving_average: derived.moving_average.get(idx).copied().flatten(),
                    rolling_volatility: derived.rolling_volatility.get(idx).copied().flatten(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRow {
    pub date: NaiveDate,
    pub close: f64,
    pub moving_average: Option<f64>,
    pub rolling_volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub series: PriceSeries,
    pub derived: DerivedSeries,
    pub summary: SummaryStats,
}
