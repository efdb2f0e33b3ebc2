//! # traderdash — trader dashboard automation
//!
//! Composition root that wires the CSV workload source, a session factory,
//! and the console reporter into one automation run.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars) and the CSV path argument
//! - Pick the session factory: real browsers or the simulated one (`dry_run`)
//! - Read credentials from the environment
//! - Kick off the run and render progress/results on the console
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod report;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use traderdash_adapter_input_csv::CsvWorkloadSource;
use traderdash_adapter_virtual::VirtualBrowser;
use traderdash_adapter_webdriver::{BrowserSettings, WebDriverBrowser};
use traderdash_app::{RunOptions, run_automation};

use crate::config::Config;
use crate::report::ConsoleReport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let Some(csv_path) = std::env::args().nth(1) else {
        eprintln!("usage: traderdash <events.csv>");
        std::process::exit(2);
    };

    let source = CsvWorkloadSource::new(csv_path);
    let sink = ConsoleReport::new();
    let options = RunOptions {
        max_concurrency: config.max_concurrency(),
    };

    if config.run.dry_run {
        let factory = Arc::new(VirtualBrowser::matching_everything());
        run_automation(&source, factory, &sink, options).await?;
    } else {
        let username = require_env("TRADERDASH_USERNAME")?;
        let password = require_env("TRADERDASH_PASSWORD")?;
        let factory = Arc::new(WebDriverBrowser::new(BrowserSettings {
            driver_url: config.webdriver.url.clone(),
            app_url: config.webdriver.app_url.clone(),
            username,
            password,
            headless: config.webdriver.headless,
        }));
        run_automation(&source, factory, &sink, options).await?;
    }

    Ok(())
}

fn require_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{name} must be set for a real run").into())
}
