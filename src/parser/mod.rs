pub mod yahoo_chart;

pub use yahoo_chart::{parse_chart, ChartParser, Parser};
