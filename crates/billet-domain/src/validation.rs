//! Input validation errors
//!
//! Identity and range violations are rejected at the call boundary. Missing
//! biographical data is never an error: the scorer degrades to neutral terms.

use thiserror::Error;

/// A value that failed range or format validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Behavior score outside 1..=5
    #[error("behavior score must be between 1 and 5, got {0}")]
    BehaviorScore(i64),

    /// Negative, NaN or infinite experience
    #[error("experience years must be a non-negative number, got {0}")]
    ExperienceYears(f64),

    /// Effectiveness rating outside 1..=5
    #[error("effectiveness rating must be between 1 and 5, got {0}")]
    Rating(i64),

    /// Average effectiveness outside 1.0..=5.0
    #[error("average effectiveness must be between 1 and 5, got {0}")]
    AverageEffectiveness(f64),

    /// Calendar date that does not exist or cannot be parsed
    #[error("invalid date: {0}")]
    Date(String),

    /// Unknown enum label (role, status, kind)
    #[error("unknown {field}: {value}")]
    UnknownLabel {
        /// Which field was being parsed
        field: &'static str,
        /// The rejected value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(
            ValidationError::BehaviorScore(7).to_string(),
            "behavior score must be between 1 and 5, got 7"
        );
        let err = ValidationError::UnknownLabel {
            field: "role",
            value: "janitor".to_string(),
        };
        assert_eq!(err.to_string(), "unknown role: janitor");
        assert_eq!(
            ValidationError::Date("2007-02-29".to_string()).to_string(),
            "invalid date: 2007-02-29"
        );
    }
}
