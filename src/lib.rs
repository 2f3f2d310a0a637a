pub mod analyzer;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod utils;
