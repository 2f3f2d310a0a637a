use crate::model::{PricePoint, PriceSeries, RawQuote};
use std::collections::BTreeMap;
use tracing::debug;

/// Turns provider rows into a valid series: rows without a finite close are
/// dropped, dates end up ascending, and a repeated date keeps its last row.
pub fn normalize(raw: Vec<RawQuote>) -> PriceSeries {
    let total = raw.len();
    let mut by_date: BTreeMap<_, f64> = BTreeMap::new();

    for quote in raw {
        if let Some(close) = quote.close.filter(|c| c.is_finite()) {
            by_date.insert(quote.date, close);
        }
    }

    let points: Vec<PricePoint> = by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect();

    if points.len() != total {
        debug!("Normalized {} raw rows into {} points", total, points.len());
    }

    // BTreeMap keys are unique and sorted, so construction cannot fail.
    PriceSeries::new(points).unwrap_or_default()
}
