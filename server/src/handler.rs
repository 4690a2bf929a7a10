//! HTTP surface for the selection service.
//!
//! One route, `POST /runtest`. Per request: decode the JSON body, validate
//! it, compare the presented secret, then run the selector through the
//! bounded executor and answer with the selection and the measured server
//! duration. Each request exclusively owns its item vector; the only state
//! shared across requests is the read-only [`ServerContext`].

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use shortlist_types::{SelectionRequest, SelectionResponse};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::error::ApiError;
use crate::executor::{self, Outcome, SelectorFn};

/// Upper bound on request bodies; larger candidate sets are rejected before
/// the body is buffered.
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Process-wide request-handling state, read-only after startup.
pub struct ServerContext {
    secret: String,
    deadline: Duration,
    selector: SelectorFn,
    selector_calls: AtomicU64,
}

impl ServerContext {
    #[must_use]
    pub fn new(secret: String, deadline: Duration) -> Self {
        Self::with_selector(secret, deadline, executor::default_selector())
    }

    /// Context with a substitute selector: the seam tests use to stall or
    /// count selection work.
    #[must_use]
    pub fn with_selector(secret: String, deadline: Duration, selector: SelectorFn) -> Self {
        Self {
            secret,
            deadline,
            selector,
            selector_calls: AtomicU64::new(0),
        }
    }

    /// Selector invocations since startup. Requests rejected before selection
    /// (undecodable body, failed validation, wrong secret) do not count.
    #[must_use]
    pub fn selector_calls(&self) -> u64 {
        self.selector_calls.load(Ordering::Relaxed)
    }
}

/// The complete route tree for the service.
pub fn routes(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::post()
        .and(warp::path("runtest"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_context(ctx))
        .and_then(handle_runtest)
        .recover(recover_rejection)
}

fn with_context(
    ctx: Arc<ServerContext>,
) -> impl Filter<Extract = (Arc<ServerContext>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&ctx))
}

async fn handle_runtest(
    request: SelectionRequest,
    ctx: Arc<ServerContext>,
) -> Result<warp::reply::Response, Rejection> {
    let response = match run_test(request, &ctx).await {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(err) => {
            let status = err.status();
            match &err {
                ApiError::Timeout { .. } | ApiError::Internal(_) => {
                    tracing::error!(%status, "request failed: {err}");
                }
                ApiError::Malformed(_) | ApiError::Unauthorized => {
                    tracing::warn!(%status, "request rejected: {err}");
                }
            }
            status_reply(status)
        }
    };
    Ok(response)
}

async fn run_test(
    request: SelectionRequest,
    ctx: &ServerContext,
) -> Result<SelectionResponse, ApiError> {
    request.validate()?;
    if request.secret != ctx.secret {
        return Err(ApiError::Unauthorized);
    }

    let SelectionRequest { tests, budget, .. } = request;
    let item_count = tests.len();
    let calls = ctx.selector_calls.fetch_add(1, Ordering::Relaxed) + 1;

    let started = Instant::now();
    let outcome = executor::run_selection(Arc::clone(&ctx.selector), tests, budget, ctx.deadline)
        .await
        .map_err(|join_err| ApiError::Internal(join_err.to_string()))?;

    match outcome {
        Outcome::Completed(selected) => {
            let duration = started.elapsed().as_secs_f64();
            tracing::info!(
                items = item_count,
                budget,
                selected = selected.len(),
                duration,
                selector_calls = calls,
                "selection completed"
            );
            Ok(SelectionResponse {
                test_results: selected,
                duration,
            })
        }
        Outcome::TimedOut => Err(ApiError::Timeout {
            deadline_secs: ctx.deadline.as_secs_f64(),
        }),
    }
}

fn status_reply(status: StatusCode) -> warp::reply::Response {
    warp::reply::with_status(status.canonical_reason().unwrap_or_default(), status).into_response()
}

async fn recover_rejection(rejection: Rejection) -> Result<warp::reply::Response, Rejection> {
    if rejection
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        return Ok(status_reply(StatusCode::BAD_REQUEST));
    }
    if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(status_reply(StatusCode::PAYLOAD_TOO_LARGE));
    }
    // Method and path mismatches keep warp's default handling.
    Err(rejection)
}
