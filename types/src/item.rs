//! Candidate item model and structural validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scored, costed selection candidate.
///
/// Wire field names follow the protocol: `x` is the value, `y` the cost,
/// `name` an optional label. Unknown fields in incoming JSON are ignored;
/// missing `x` or `y` fail deserialization. Items are immutable once
/// received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "x")]
    pub value: f64,
    #[serde(rename = "y")]
    pub cost: f64,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("item cost must be strictly positive (got {0})")]
    NonPositiveCost(f64),
    #[error("item cost must be finite (got {0})")]
    NonFiniteCost(f64),
    #[error("item value must be non-negative (got {0})")]
    NegativeValue(f64),
    #[error("item value must be finite (got {0})")]
    NonFiniteValue(f64),
}

impl Item {
    /// Construct an item without a label.
    #[must_use]
    pub fn new(value: f64, cost: f64) -> Self {
        Self {
            value,
            cost,
            label: None,
        }
    }

    /// Structural validation.
    ///
    /// A zero or negative cost makes the value/cost sort key undefined or
    /// infinite, so it is rejected here, before any selection runs.
    pub fn validate(&self) -> Result<(), ItemError> {
        if !self.cost.is_finite() {
            return Err(ItemError::NonFiniteCost(self.cost));
        }
        if self.cost <= 0.0 {
            return Err(ItemError::NonPositiveCost(self.cost));
        }
        if !self.value.is_finite() {
            return Err(ItemError::NonFiniteValue(self.value));
        }
        if self.value < 0.0 {
            return Err(ItemError::NegativeValue(self.value));
        }
        Ok(())
    }

    /// Value-per-cost sort key. Well-defined for validated items.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        self.value / self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemError};

    #[test]
    fn wire_names_round_trip() {
        let json = r#"{"x":10.0,"y":2.0,"name":"alpha"}"#;
        let item: Item = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.value, 10.0);
        assert_eq!(item.cost, 2.0);
        assert_eq!(item.label.as_deref(), Some("alpha"));

        let back = serde_json::to_value(&item).expect("serialize");
        assert_eq!(back["x"], 10.0);
        assert_eq!(back["y"], 2.0);
        assert_eq!(back["name"], "alpha");
    }

    #[test]
    fn label_is_optional_and_omitted_when_absent() {
        let item: Item = serde_json::from_str(r#"{"x":1,"y":1}"#).expect("valid item");
        assert_eq!(item.label, None);
        let back = serde_json::to_string(&item).expect("serialize");
        assert!(!back.contains("name"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let item: Item =
            serde_json::from_str(r#"{"x":1,"y":1,"weight":9}"#).expect("unknown field tolerated");
        assert_eq!(item.value, 1.0);
    }

    #[test]
    fn missing_required_field_fails() {
        assert!(serde_json::from_str::<Item>(r#"{"x":1}"#).is_err());
        assert!(serde_json::from_str::<Item>(r#"{"y":1}"#).is_err());
    }

    #[test]
    fn validate_rejects_degenerate_costs() {
        assert_eq!(
            Item::new(1.0, 0.0).validate(),
            Err(ItemError::NonPositiveCost(0.0))
        );
        assert_eq!(
            Item::new(1.0, -3.0).validate(),
            Err(ItemError::NonPositiveCost(-3.0))
        );
        assert!(matches!(
            Item::new(1.0, f64::NAN).validate(),
            Err(ItemError::NonFiniteCost(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert_eq!(
            Item::new(-1.0, 1.0).validate(),
            Err(ItemError::NegativeValue(-1.0))
        );
        assert!(matches!(
            Item::new(f64::INFINITY, 1.0).validate(),
            Err(ItemError::NonFiniteValue(_))
        ));
        assert!(Item::new(0.0, 0.5).validate().is_ok());
    }
}
