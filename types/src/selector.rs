//! Budget-constrained greedy selection.

use crate::Item;

/// Select a subset of `items` against `budget`.
///
/// Candidates are stably sorted ascending by value/cost ratio (equal-ratio
/// items keep their input order), then taken in that order while the running
/// total has not yet exceeded `budget`. The check happens before each
/// addition, so the item that crosses the budget is still included: total
/// spend may exceed `budget` by at most one item's cost.
///
/// The ascending order is the service's documented contract, inherited from
/// the observed behavior of the deployed system; a value-maximizing greedy
/// would sort descending. Callers relying on `testResults` ordering get this
/// processing order, not their input order.
///
/// Pure and deterministic: same input (including tie order) always yields the
/// same output. `total_cmp` keeps the sort total even for degenerate ratios,
/// though upstream validation rejects non-positive costs before this runs.
#[must_use]
pub fn select(mut items: Vec<Item>, budget: f64) -> Vec<Item> {
    items.sort_by(|a, b| a.ratio().total_cmp(&b.ratio()));

    let mut spent = 0.0;
    let mut selected = Vec::new();
    for item in items {
        if spent > budget {
            break;
        }
        spent += item.cost;
        selected.push(item);
    }
    selected
}
