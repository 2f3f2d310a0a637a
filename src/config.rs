use crate::error::ConfigError;
use crate::model::FetchRequest;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_TREND_WINDOW: usize = 50;
pub const DEFAULT_TABLE_ROWS: usize = 10;

/// Window sizes used by the analyzer and the report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ma_window: usize,
    pub volatility_window: usize,
    pub trend_window: usize,
    pub table_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_window: DEFAULT_WINDOW,
            volatility_window: DEFAULT_WINDOW,
            trend_window: DEFAULT_TREND_WINDOW,
            table_rows: DEFAULT_TABLE_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Yahoo {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_seconds: u64,
    },
    Csv {
        path: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Yahoo {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    /// Defaults to today when absent.
    pub end_date: Option<NaiveDate>,
}

impl RequestConfig {
    pub fn to_request(&self, today: NaiveDate) -> FetchRequest {
        FetchRequest {
            ticker: self.ticker.trim().to_string(),
            start: self.start_date,
            end: self.end_date.unwrap_or(today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub requests: Vec<RequestConfig>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests.is_empty() {
            return Err(ConfigError::Invalid("no requests configured".into()));
        }
        if let Some(req) = self.requests.iter().find(|r| r.ticker.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "empty ticker in request starting {}",
                req.start_date
            )));
        }
        if self.analysis.ma_window == 0 {
            return Err(ConfigError::Invalid("ma_window must be at least 1".into()));
        }
        if self.analysis.volatility_window < 2 {
            return Err(ConfigError::Invalid(
                "volatility_window must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
