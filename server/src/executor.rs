//! Bounded execution of selection work.
//!
//! One invocation creates a fresh blocking task that runs the selector off
//! the handler's execution path, raced against a hard wall-clock deadline.
//! Terminal outcomes are `Completed` or `TimedOut`; there are no further
//! transitions. When the deadline wins, the join handle is dropped and the
//! abandoned computation's eventual result has nowhere to land: it is never
//! delivered late and never retried.

use std::sync::Arc;
use std::time::Duration;

use shortlist_types::Item;
use tokio::task::JoinError;

/// Selection entry point injected into the server context.
///
/// Production wires this to [`shortlist_types::select`]; tests substitute
/// stalling or counting closures.
pub type SelectorFn = Arc<dyn Fn(Vec<Item>, f64) -> Vec<Item> + Send + Sync>;

#[must_use]
pub fn default_selector() -> SelectorFn {
    Arc::new(shortlist_types::select)
}

/// Terminal state of one bounded selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Vec<Item>),
    TimedOut,
}

/// Run `selector` over `items` with a hard deadline.
///
/// Returns `Err` only if the selection task panicked; a missed deadline is a
/// normal `Outcome::TimedOut`.
pub async fn run_selection(
    selector: SelectorFn,
    items: Vec<Item>,
    budget: f64,
    deadline: Duration,
) -> Result<Outcome, JoinError> {
    let handle = tokio::task::spawn_blocking(move || selector(items, budget));
    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(selected)) => Ok(Outcome::Completed(selected)),
        Ok(Err(join_err)) => Err(join_err),
        Err(_elapsed) => Ok(Outcome::TimedOut),
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, default_selector, run_selection};
    use shortlist_types::Item;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn fast_selection_completes() {
        let items = vec![Item::new(10.0, 2.0), Item::new(20.0, 10.0)];
        let outcome = run_selection(default_selector(), items, 7.0, Duration::from_secs(5))
            .await
            .expect("no panic");
        let Outcome::Completed(selected) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].cost, 10.0);
    }

    #[tokio::test]
    async fn deadline_wins_against_a_stalled_selector() {
        let stalled: super::SelectorFn = Arc::new(|_, _| {
            std::thread::sleep(Duration::from_secs(2));
            Vec::new()
        });
        let started = Instant::now();
        let outcome = run_selection(stalled, Vec::new(), 1.0, Duration::from_millis(50))
            .await
            .expect("no panic");
        assert_eq!(outcome, Outcome::TimedOut);
        // The response arrives at the deadline, not after the stalled work.
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn abandoned_result_is_discarded_not_delivered() {
        let (done_tx, done_rx) = mpsc::channel();
        let slow: super::SelectorFn = Arc::new(move |items, _| {
            std::thread::sleep(Duration::from_millis(200));
            let _ = done_tx.send(());
            items
        });

        let outcome = run_selection(slow, vec![Item::new(1.0, 1.0)], 1.0, Duration::from_millis(20))
            .await
            .expect("no panic");
        assert_eq!(outcome, Outcome::TimedOut);
        // The abandoned task had not finished when the timeout was reported.
        assert!(done_rx.try_recv().is_err());
        // It still runs to completion in the background, but its result went
        // to the dropped join handle.
        done_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("abandoned task finishes on its own");
    }

    #[tokio::test]
    async fn panicking_selector_is_an_error_not_a_timeout() {
        let panicking: super::SelectorFn = Arc::new(|_, _| panic!("selector blew up"));
        let result = run_selection(panicking, Vec::new(), 1.0, Duration::from_secs(5)).await;
        assert!(result.is_err());
    }
}
