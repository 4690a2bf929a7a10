//! Request loop and latency collection.
//!
//! One request body is encoded up front and reused every iteration. Client
//! duration is measured from just before send until the response body has
//! been read; server duration is whatever the response echoes. Any transport
//! failure or non-200 status aborts the whole run - nothing partial is
//! persisted.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use shortlist_config::HarnessSettings;
use shortlist_types::{Item, LatencySample, RunResults, SelectionRequest, SelectionResponse};

const CONNECT_TIMEOUT_SECS: u64 = 30;

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("failed to build HTTP client")
}

pub async fn run(
    client: &reqwest::Client,
    settings: &HarnessSettings,
    items: Vec<Item>,
) -> Result<RunResults> {
    let request = SelectionRequest {
        secret: settings.secret.clone(),
        tests: items,
        budget: settings.budget,
    };
    let body = serde_json::to_vec(&request).context("failed to encode request body")?;

    let mut results = RunResults::default();
    for iteration in 0..settings.runs {
        let started = Instant::now();
        let response = client
            .post(&settings.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await
            .with_context(|| format!("request {iteration} to {} failed", settings.url))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body for request {iteration}"))?;
        if status != reqwest::StatusCode::OK {
            bail!("unexpected response status {status} on request {iteration}");
        }

        let parsed: SelectionResponse = serde_json::from_slice(&bytes)
            .with_context(|| format!("undecodable response body for request {iteration}"))?;
        let client_seconds = started.elapsed().as_secs_f64();

        results.push(LatencySample {
            server_seconds: parsed.duration,
            client_seconds,
        });
        tracing::debug!(
            iteration,
            server_seconds = parsed.duration,
            client_seconds,
            "completed request"
        );
    }

    Ok(results)
}
