//! shortlist-server - binary entry point.
//!
//! Serves the budget-constrained selection endpoint:
//!
//! ```text
//! POST /runtest  {secret, tests: [{x, y, name?}], budget}
//!   200 {testResults, duration} | 400 | 403 | 408
//! ```
//!
//! Configuration comes from `shortlist.toml` plus `SHORTLIST_*` environment
//! overrides; the authentication secret is mandatory and injected into the
//! request context at startup.

mod error;
mod executor;
mod handler;

use std::sync::Arc;

use anyhow::Result;
use shortlist_config::{ServerSettings, ShortlistConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::handler::ServerContext;

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
    let settings = ServerSettings::resolve(config.as_ref())?;

    let port = settings.port;
    let ctx = Arc::new(ServerContext::new(settings.secret, settings.deadline));
    let filter = handler::routes(ctx);

    tracing::info!(
        port,
        deadline_secs = settings.deadline.as_secs_f64(),
        "listening on http://0.0.0.0:{port}"
    );
    warp::serve(filter).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
