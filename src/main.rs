use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ai::GeminiClient;
use config::AppConfig;
use extractor::StructuredExtractor;
use fetcher::{FETCH_TIMEOUT, HttpAssetFetcher};
use pipeline::Pipeline;
use renderer::ChromeRenderer;
use report::ReportBuilder;

mod ai;
mod config;
mod discovery;
mod extractor;
mod fetcher;
mod models;
mod pipeline;
mod processor;
mod renderer;
mod report;

#[tokio::main]
async fn main() {
    let _guard = init_logging();
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        // Full detail goes to the log file; the run produced no reports.
        error!("fatal error, aborting run: {e:#}");
        std::process::exit(1);
    }
}

/// Console shows progress at INFO; the rolling file keeps DEBUG detail.
fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "scraper.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(console_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG),
        )
        .init();

    guard
}

async fn run() -> Result<()> {
    info!("🚀 Starting product extraction pipeline");

    let app_config = AppConfig::from_file("config.toml").context("Failed to load config.toml")?;
    let targets =
        config::load_targets("category_urls.txt").context("Failed to load category_urls.txt")?;

    info!(
        "Loaded {} category targets, extraction model {}",
        targets.len(),
        app_config.model
    );

    let run_timestamp = Local::now().format("%Y%m%d%H%M%S").to_string();

    let renderer = ChromeRenderer::new();
    let fetcher = HttpAssetFetcher::new(FETCH_TIMEOUT)
        .context("Failed to initialize image fetcher")?;
    let model = GeminiClient::new(&app_config.api_key, &app_config.model)
        .context("Failed to initialize model client")?;
    let extractor = StructuredExtractor::new(Arc::new(model));

    let mut pipeline = Pipeline::new(&renderer, &fetcher, &extractor, "images");
    let total_urls = pipeline.run(&targets).await?;

    info!("All sites processed");
    info!("📊 Total products processed: {total_urls}");

    let mut store = pipeline.into_store();
    report::validate_vocabulary(&mut store);

    let builder = ReportBuilder::new(".", &run_timestamp);
    let written = builder.write_reports(&store, &targets)?;
    for path in &written {
        info!("Report written: {}", path.display());
    }

    wait_for_acknowledgment()?;
    Ok(())
}

fn wait_for_acknowledgment() -> Result<()> {
    print!("\nDone. Press Enter to exit: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}
