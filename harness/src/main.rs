//! shortlist-harness - binary entry point.
//!
//! Issues repeated `/runtest` requests built from a fixture file, pairs the
//! observed round-trip time with the server-reported compute time for every
//! iteration, and persists the aggregate once at the end of the run. A
//! failed request aborts the run with nothing persisted.

mod fixture;
mod persist;
mod run;

use anyhow::Result;
use shortlist_config::{HarnessSettings, ShortlistConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ShortlistConfig::load()?;
    let settings = HarnessSettings::resolve(config.as_ref())?;

    let items = fixture::load_fixture(&settings.fixture)?;
    tracing::info!(
        items = items.len(),
        runs = settings.runs,
        budget = settings.budget,
        url = %settings.url,
        "starting run"
    );

    let client = run::http_client()?;
    let results = run::run(&client, &settings, items).await?;
    persist::write_results(&settings.output, &results)?;

    tracing::info!(
        runs = results.len(),
        mean_server_seconds = results.mean_server_seconds().unwrap_or_default(),
        mean_client_seconds = results.mean_client_seconds().unwrap_or_default(),
        output = %settings.output.display(),
        "run complete"
    );

    Ok(())
}
