// Analyzer module: windowed indicators and the series analyzer built on them.

pub mod indicators;
pub mod price_analysis;

// Re-export the main Analyzer implementation for ease of use.
pub use price_analysis::{
    compute_default_summary, compute_moving_average, compute_rolling_volatility,
    compute_summary, trailing_window, Analyzer, AnalyzerImpl,
};
