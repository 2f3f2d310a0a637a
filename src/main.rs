use futures::future::join_all;
use stock_trend::analyzer::AnalyzerImpl;
use stock_trend::config::{load_config, AppConfig, OutputFormat};
use stock_trend::logging::init_logging;
use stock_trend::pipeline::run_request;
use stock_trend::report::{render_json, render_text, Report};
use stock_trend::source::build_source;
use stock_trend::utils::today_utc;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());

    // Load configuration from file
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config load error ({}): {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("Logging init error: {}", e);
        return ExitCode::FAILURE;
    }

    let source = match build_source(&config.source) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize price source: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let analyzer = AnalyzerImpl::new(config.analysis.clone());

    let today = today_utc();
    let requests: Vec<_> = config.requests.iter().map(|r| r.to_request(today)).collect();
    info!("Requests to process: {}", requests.len());

    // Requests are independent; run them side by side.
    let results = join_all(
        requests
            .iter()
            .map(|req| run_request(source.as_ref(), &analyzer, req)),
    )
    .await;

    let mut failures = 0;
    for (req, result) in requests.iter().zip(results) {
        match result {
            Ok(report) => print_report(&report, config.output),
            Err(e) => {
                failures += 1;
                error!("{}: {}", req.ticker, e);
                eprintln!("⚠️ {}: {}", req.ticker, e);
            }
        }
    }

    info!("Finished: {} ok, {} failed", requests.len() - failures, failures);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", render_text(report)),
        OutputFormat::Json => match render_json(report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize report for {}: {}", report.ticker, e),
        },
    }
}
