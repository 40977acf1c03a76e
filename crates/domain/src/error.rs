//! Domain error types.

use thiserror::Error;

/// Rule violations raised by domain services.
///
/// None of these are retried; each maps onto a user visible message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// Required field missing, duplicate value, or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The record is not in a state that allows the requested change.
    #[error("{0}")]
    InvalidState(String),

    /// One or more serial numbers cannot be used for the requested movement.
    #[error("Serial number errors: {}", .0.join("; "))]
    SerialConflicts(Vec<String>),

    /// The acting user may not perform the action.
    #[error("{0}")]
    Forbidden(String),
}

impl From<shared::csv::CsvError> for DomainError {
    fn from(err: shared::csv::CsvError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_conflicts_display() {
        let err = DomainError::SerialConflicts(vec![
            "SN-1 is duplicated in this order".to_string(),
            "SN-2 is not in stock at WH-1".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Serial number errors: SN-1 is duplicated in this order; SN-2 is not in stock at WH-1"
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            DomainError::validation("Brand is required"),
            DomainError::Validation("Brand is required".to_string())
        );
        assert_eq!(DomainError::forbidden("no").to_string(), "no");
    }
}
