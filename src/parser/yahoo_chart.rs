// Yahoo chart API response parsing
use crate::error::ParseError;
use crate::model::RawQuote;
use crate::utils::timestamp_to_date;
use serde::Deserialize;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<Vec<RawQuote>, ParseError>;
}

// Minimal response structs (only what we need)
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Exchange offset from UTC in seconds; bars are dated in exchange time.
#[derive(Debug, Default, Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct ChartParser;

impl ChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChartParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for ChartParser {
    fn parse(&self, body: &str) -> Result<Vec<RawQuote>, ParseError> {
        parse_chart(body)
    }
}

/// Parses a chart body into raw daily rows dated in the exchange's timezone.
/// The adjusted close is used when the body carries one, otherwise the raw
/// close. Closes align with timestamps by index; a missing close becomes `None`.
pub fn parse_chart(body: &str) -> Result<Vec<RawQuote>, ParseError> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = response.chart.error {
        let msg = match (err.code, err.description) {
            (Some(code), Some(desc)) => format!("{code}: {desc}"),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => "unknown error".to_string(),
        };
        return Err(ParseError::Provider(msg));
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or(ParseError::MissingField("chart.result"))?;

    // No timestamps is how the provider reports an empty range.
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };

    let indicators = result.indicators;
    let raw_closes = indicators
        .quote
        .into_iter()
        .next()
        .ok_or(ParseError::MissingField("indicators.quote"))?
        .close;
    let closes = indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|a| !a.is_empty())
        .unwrap_or(raw_closes);
    let offset = result.meta.gmtoffset;

    timestamps
        .iter()
        .enumerate()
        .map(|(i, &ts)| {
            let date = ts
                .checked_add(offset)
                .and_then(timestamp_to_date)
                .ok_or(ParseError::BadTimestamp(ts))?;
            let close = closes.get(i).copied().flatten();
            Ok(RawQuote { date, close })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "AAPL", "currency": "USD" },
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [187.15, 184.22, 182.15],
                        "close": [185.64, null, 181.91]
                    }],
                    "adjclose": [{ "adjclose": [184.93, 183.56, 181.21] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_rows() {
        let rows = ChartParser::new().parse(BODY).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[0].close, Some(184.93));
        assert_eq!(rows[1].close, Some(183.56));
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_raw_close_without_adjclose_block() {
        let body = r#"{ "chart": { "result": [{
            "timestamp": [1704205800, 1704292200],
            "indicators": { "quote": [{ "close": [185.64, null] }] } }], "error": null } }"#;
        let rows = parse_chart(body).unwrap();
        assert_eq!(rows[0].close, Some(185.64));
        assert_eq!(rows[1].close, None);
    }

    #[test]
    fn test_dates_follow_exchange_offset() {
        // ASX open, Tue 2024-01-02 10:00 AEDT, is 23:00 UTC the day before
        let body = r#"{ "chart": { "result": [{
            "meta": { "symbol": "BHP.AX", "gmtoffset": 39600 },
            "timestamp": [1704150000, 1704236400],
            "indicators": { "quote": [{ "close": [45.1, 45.6] }] } }], "error": null } }"#;
        let rows = parse_chart(body).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_dates_west_of_utc() {
        // NYSE open, 2024-01-02 09:30 EST
        let body = r#"{ "chart": { "result": [{
            "meta": { "gmtoffset": -18000 },
            "timestamp": [1704205800],
            "indicators": { "quote": [{ "close": [185.64] }] } }], "error": null } }"#;
        let rows = parse_chart(body).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{ "chart": { "result": null, "error": {
            "code": "Not Found", "description": "No data found, symbol may be delisted" } } }"#;
        match parse_chart(body) {
            Err(ParseError::Provider(msg)) => assert!(msg.starts_with("Not Found")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_range() {
        let body = r#"{ "chart": { "result": [{ "meta": {}, "indicators": { "quote": [{}] } }], "error": null } }"#;
        assert!(parse_chart(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_missing_result() {
        let body = r#"{ "chart": { "result": [], "error": null } }"#;
        assert!(matches!(
            parse_chart(body),
            Err(ParseError::MissingField("chart.result"))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse_chart("<html>"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_short_close_column_pads_with_none() {
        let body = r#"{ "chart": { "result": [{
            "timestamp": [1704205800, 1704292200],
            "indicators": { "quote": [{ "close": [185.64] }] } }], "error": null } }"#;
        let rows = parse_chart(body).unwrap();
        assert_eq!(rows[1].close, None);
    }
}
