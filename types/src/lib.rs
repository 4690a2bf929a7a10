//! Core domain types for shortlist.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies: the candidate [`Item`], the wire envelopes for the
//! `/runtest` protocol, and the budget-constrained [`select`] function.
//! Everything here is deterministic and directly unit-testable without the
//! surrounding service.

mod item;
mod selector;
mod wire;

pub use item::{Item, ItemError};
pub use selector::select;
pub use wire::{
    LatencySample, RequestError, RunResults, SelectionRequest, SelectionResponse,
};
