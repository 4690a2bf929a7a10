//! Wire envelopes for the `/runtest` protocol and the harness artifacts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Item, ItemError};

/// Request body for `POST /runtest`.
#[derive(Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub secret: String,
    pub tests: Vec<Item>,
    pub budget: f64,
}

// Manual Debug impl to prevent leaking the secret in logs.
impl std::fmt::Debug for SelectionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRequest")
            .field("secret", &"[REDACTED]")
            .field("tests", &self.tests)
            .field("budget", &self.budget)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("budget must be non-negative (got {0})")]
    NegativeBudget(f64),
    #[error("budget must be finite (got {0})")]
    NonFiniteBudget(f64),
    #[error("test item {index} rejected: {source}")]
    InvalidItem { index: usize, source: ItemError },
}

impl SelectionRequest {
    /// Structural validation of the decoded body: finite non-negative budget
    /// and every item individually valid. Runs before authentication has any
    /// business meaning, but processes no item beyond field checks.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.budget.is_finite() {
            return Err(RequestError::NonFiniteBudget(self.budget));
        }
        if self.budget < 0.0 {
            return Err(RequestError::NegativeBudget(self.budget));
        }
        for (index, item) in self.tests.iter().enumerate() {
            item.validate()
                .map_err(|source| RequestError::InvalidItem { index, source })?;
        }
        Ok(())
    }
}

/// Success body for `POST /runtest`.
///
/// `test_results` carries the selector's processing order, which is part of
/// the observable contract. `duration` is server wall-clock seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub test_results: Vec<Item>,
    pub duration: f64,
}

/// One harness iteration's paired timings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    pub server_seconds: f64,
    pub client_seconds: f64,
}

/// Aggregated timings for a whole harness run, persisted once at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResults {
    pub server_times: Vec<f64>,
    pub client_times: Vec<f64>,
}

impl RunResults {
    /// Append one completed iteration. The two vectors stay 1:1 with the
    /// requests issued.
    pub fn push(&mut self, sample: LatencySample) {
        self.server_times.push(sample.server_seconds);
        self.client_times.push(sample.client_seconds);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.server_times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.server_times.is_empty()
    }

    #[must_use]
    pub fn mean_server_seconds(&self) -> Option<f64> {
        mean(&self.server_times)
    }

    #[must_use]
    pub fn mean_client_seconds(&self) -> Option<f64> {
        mean(&self.client_times)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::{LatencySample, RequestError, RunResults, SelectionRequest, SelectionResponse};
    use crate::Item;

    #[test]
    fn request_decodes_protocol_body() {
        let json = r#"{
            "secret": "hunter2",
            "tests": [{"x": 10, "y": 2}, {"x": 30, "y": 5, "name": "b"}],
            "budget": 7
        }"#;
        let request: SelectionRequest = serde_json::from_str(json).expect("valid request");
        assert_eq!(request.secret, "hunter2");
        assert_eq!(request.tests.len(), 2);
        assert_eq!(request.budget, 7.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn request_missing_fields_fails_decode() {
        assert!(serde_json::from_str::<SelectionRequest>(r#"{"secret":"s"}"#).is_err());
        assert!(serde_json::from_str::<SelectionRequest>("{not json").is_err());
    }

    #[test]
    fn validate_flags_degenerate_item_with_index() {
        let request = SelectionRequest {
            secret: "s".to_string(),
            tests: vec![Item::new(1.0, 1.0), Item::new(1.0, 0.0)],
            budget: 10.0,
        };
        assert!(matches!(
            request.validate(),
            Err(RequestError::InvalidItem { index: 1, .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_budget() {
        let mut request = SelectionRequest {
            secret: "s".to_string(),
            tests: Vec::new(),
            budget: -1.0,
        };
        assert_eq!(request.validate(), Err(RequestError::NegativeBudget(-1.0)));
        request.budget = f64::NAN;
        assert!(matches!(
            request.validate(),
            Err(RequestError::NonFiniteBudget(_))
        ));
    }

    #[test]
    fn debug_never_prints_the_secret() {
        let request = SelectionRequest {
            secret: "hunter2".to_string(),
            tests: Vec::new(),
            budget: 0.0,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn response_uses_camel_case_wire_names() {
        let response = SelectionResponse {
            test_results: vec![Item::new(1.0, 2.0)],
            duration: 0.25,
        };
        let value = serde_json::to_value(&response).expect("serialize");
        assert!(value.get("testResults").is_some());
        assert_eq!(value["duration"], 0.25);
    }

    #[test]
    fn run_results_append_one_to_one() {
        let mut results = RunResults::default();
        results.push(LatencySample {
            server_seconds: 0.1,
            client_seconds: 0.3,
        });
        results.push(LatencySample {
            server_seconds: 0.2,
            client_seconds: 0.4,
        });
        assert_eq!(results.len(), 2);
        let server_mean = results.mean_server_seconds().expect("two samples");
        let client_mean = results.mean_client_seconds().expect("two samples");
        assert!((server_mean - 0.15).abs() < 1e-12);
        assert!((client_mean - 0.35).abs() < 1e-12);

        let value = serde_json::to_value(&results).expect("serialize");
        assert!(value.get("serverTimes").is_some());
        assert!(value.get("clientTimes").is_some());
    }

    #[test]
    fn empty_run_results_have_no_mean() {
        let results = RunResults::default();
        assert!(results.is_empty());
        assert_eq!(results.mean_server_seconds(), None);
    }
}
