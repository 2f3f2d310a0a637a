// Chart- and table-ready view of one analysis, plus text/JSON dumps of it.
use crate::analyzer::trailing_window;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::model::{AnalysisOutcome, WindowRow};
use crate::utils::format_date;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub series: Vec<ChartSeries>,
}

/// Row index of the maximum of each column, ignoring absent values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMax {
    pub close: Option<usize>,
    pub moving_average: Option<usize>,
    pub rolling_volatility: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    pub rows: Vec<WindowRow>,
    pub column_max: ColumnMax,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub ticker: String,
    pub metrics: Vec<Metric>,
    pub price_trend: Chart,
    pub volatility_trend: Chart,
    pub recent_trend: Chart,
    pub table: Table,
}

impl Report {
    pub fn build(
        ticker: &str,
        outcome: &AnalysisOutcome,
        cfg: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        let summary = &outcome.summary;
        let derived = &outcome.derived;
        let dates = &derived.dates;

        let metrics = vec![
            Metric {
                label: format!("{} Latest Price", ticker),
                value: format!("${:.2}", summary.latest_price),
                delta: None,
            },
            Metric {
                label: "Change".into(),
                value: format!("{:.2} USD", summary.absolute_change),
                delta: Some(format!("{:.2}%", summary.percent_change)),
            },
            Metric {
                label: "Volatility".into(),
                value: fmt_opt(summary.latest_volatility),
                delta: None,
            },
        ];

        let closes: Vec<Option<f64>> = outcome.series.closes().into_iter().map(Some).collect();
        let price_trend = Chart {
            title: format!("{} Closing Price", ticker),
            series: vec![
                chart_series("Close", dates, &closes),
                chart_series(&format!("{}-Day MA", cfg.ma_window), dates, &derived.moving_average),
            ],
        };

        let volatility_trend = Chart {
            title: "Volatility Over Time".into(),
            series: vec![chart_series("Volatility", dates, &derived.rolling_volatility)],
        };

        let recent = trailing_window(&outcome.series, cfg.trend_window)?;
        let recent_trend = Chart {
            title: format!("Last {} Days Closing Prices ({})", cfg.trend_window, ticker),
            series: vec![ChartSeries {
                name: "Close".into(),
                points: recent
                    .points
                    .iter()
                    .map(|p| ChartPoint { date: p.date, value: Some(p.close) })
                    .collect(),
            }],
        };

        let rows = trailing_window(&outcome.series, cfg.table_rows)?.rows(derived);
        let column_max = ColumnMax {
            close: max_index(rows.iter().map(|r| Some(r.close))),
            moving_average: max_index(rows.iter().map(|r| r.moving_average)),
            rolling_volatility: max_index(rows.iter().map(|r| r.rolling_volatility)),
        };
        let table = Table {
            title: format!("Stock Data (Last {} rows)", cfg.table_rows),
            rows,
            column_max,
        };

        Ok(Self {
            ticker: ticker.to_string(),
            metrics,
            price_trend,
            volatility_trend,
            recent_trend,
            table,
        })
    }
}

fn chart_series(name: &str, dates: &[NaiveDate], values: &[Option<f64>]) -> ChartSeries {
    ChartSeries {
        name: name.to_string(),
        points: dates
            .iter()
            .zip(values)
            .map(|(&date, &value)| ChartPoint { date, value })
            .collect(),
    }
}

/// First index holding the largest defined value.
fn max_index(values: impl Iterator<Item = Option<f64>>) -> Option<usize> {
    values
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| !x.is_nan()).map(|x| (i, x)))
        .fold(None, |best: Option<(usize, f64)>, (i, x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn fmt_cell(value: Option<f64>, is_max: bool) -> String {
    let mark = if is_max { "*" } else { "" };
    format!("{}{}", fmt_opt(value), mark)
}

fn describe_chart(out: &mut String, chart: &Chart) {
    writeln!(out, "{}", chart.title).ok();
    for series in &chart.series {
        let defined = series.points.iter().filter(|p| p.value.is_some()).count();
        let span = match (series.points.first(), series.points.last()) {
            (Some(first), Some(last)) => {
                format!("{} .. {}", format_date(first.date), format_date(last.date))
            }
            _ => "empty".to_string(),
        };
        writeln!(
            out,
            "  {}: {} points, {} defined ({})",
            series.name,
            series.points.len(),
            defined,
            span
        )
        .ok();
    }
}

/// Plain-text dump: metrics, chart outlines, and the table with column
/// maxima marked by `*`.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    for metric in &report.metrics {
        match &metric.delta {
            Some(delta) => {
                writeln!(out, "{}: {} ({})", metric.label, metric.value, delta).ok();
            }
            None => {
                writeln!(out, "{}: {}", metric.label, metric.value).ok();
            }
        }
    }
    out.push('\n');

    for chart in [&report.price_trend, &report.volatility_trend, &report.recent_trend] {
        describe_chart(&mut out, chart);
    }
    out.push('\n');

    let table = &report.table;
    writeln!(out, "{}", table.title).ok();
    writeln!(
        out,
        "{:<12}{:>12}{:>12}{:>12}",
        "Date", "Close", "MA", "Volatility"
    )
    .ok();
    for (i, row) in table.rows.iter().enumerate() {
        let max = &table.column_max;
        writeln!(
            out,
            "{:<12}{:>12}{:>12}{:>12}",
            format_date(row.date),
            fmt_cell(Some(row.close), max.close == Some(i)),
            fmt_cell(row.moving_average, max.moving_average == Some(i)),
            fmt_cell(row.rolling_volatility, max.rolling_volatility == Some(i)),
        )
        .ok();
    }

    out
}

pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
