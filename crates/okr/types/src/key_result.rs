//! Key Results: the measurable part of an objective

use crate::{KeyResultId, OkrError, OkrResult};
use serde::{Deserialize, Serialize};

/// A quantifiable measure used to gauge an objective's completion
///
/// `target_value` may be zero, and `current_value` may exceed the target
/// (over-achievement) or be negative. Neither is an error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: KeyResultId,
    pub description: String,
    pub current_value: f64,
    pub target_value: f64,
    /// Free-text unit tag, e.g. "%", "$", "users"
    pub unit: String,
}

impl KeyResult {
    pub fn new(
        id: KeyResultId,
        description: impl Into<String>,
        current_value: f64,
        target_value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            current_value,
            target_value,
            unit: unit.into(),
        }
    }

    /// Record a new measurement
    pub fn set_current(&mut self, value: f64) {
        self.current_value = value;
    }

    /// Outcome column of a review: `"{current}{unit} / {target}{unit}"`
    pub fn formatted_outcome(&self) -> String {
        format!(
            "{}{} / {}{}",
            self.current_value, self.unit, self.target_value, self.unit
        )
    }

    pub fn validate(&self) -> OkrResult<()> {
        validate_measure(
            self.id.as_str(),
            &self.description,
            self.current_value,
            self.target_value,
        )
    }
}

/// Shared rules for a key result's description and values
///
/// `label` names the key result in the error field, `key_results[{label}]`.
pub(crate) fn validate_measure(
    label: &str,
    description: &str,
    current_value: f64,
    target_value: f64,
) -> OkrResult<()> {
    if description.trim().is_empty() {
        return Err(OkrError::malformed(
            format!("key_results[{}].description", label),
            "must not be empty",
        ));
    }
    if !current_value.is_finite() || !target_value.is_finite() {
        return Err(OkrError::malformed(
            format!("key_results[{}]", label),
            "values must be finite numbers",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kr(current: f64, target: f64, unit: &str) -> KeyResult {
        KeyResult::new(KeyResultId::new("kr1"), "Grow MAU", current, target, unit)
    }

    #[test]
    fn test_formatted_outcome() {
        assert_eq!(kr(65000.0, 100000.0, "users").formatted_outcome(), "65000users / 100000users");
        assert_eq!(kr(2.5, 4.0, "%").formatted_outcome(), "2.5% / 4%");
    }

    #[test]
    fn test_over_achievement_is_valid() {
        assert!(kr(96.0, 95.0, "%").validate().is_ok());
        assert!(kr(-3.0, 0.0, "pts").validate().is_ok());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut record = kr(1.0, 2.0, "");
        record.description = "   ".into();
        assert!(matches!(
            record.validate(),
            Err(OkrError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(kr(f64::NAN, 1.0, "").validate().is_err());
        assert!(kr(1.0, f64::INFINITY, "").validate().is_err());
    }
}
