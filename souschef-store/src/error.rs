/// Error types for the souschef persistence layer
///
/// This module provides the typed error taxonomy surfaced by the user and
/// thread repositories. Validation errors carry per-field detail so the UI
/// can render messages next to the offending input; store faults are logged
/// and surfaced as opaque typed kinds so driver error types never cross the
/// repository boundary.
///
/// # Example
///
/// ```
/// use souschef_store::error::{FieldViolation, StoreError, ValidationError};
///
/// fn render(err: &StoreError) -> String {
///     match err {
///         StoreError::Validation(ValidationError::Invalid(violations)) => violations
///             .iter()
///             .map(|v| format!("{}: {}", v.field, v.message))
///             .collect::<Vec<_>>()
///             .join("\n"),
///         other => other.to_string(),
///     }
/// }
/// ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias used throughout the repositories
pub type StoreResult<T> = Result<T, StoreError>;

/// A single field-level validation failure
///
/// The `field` name matches the registration input field it belongs to
/// (`first_name`, `email`, `password`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field that failed validation
    pub field: String,

    /// Human-readable error message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failures raised by the field validator
///
/// In fail-fast mode the validator returns the variant matching the first
/// invalid field. In collect-all mode every field is evaluated and the
/// violations are returned together as `Invalid`, in field order. The
/// violation list is built in full before the error is constructed; it is
/// never appended to afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid first name
    #[error("Invalid first name: {0}")]
    FirstName(String),

    /// Invalid last name
    #[error("Invalid last name: {0}")]
    LastName(String),

    /// Invalid email address
    #[error("Invalid email: {0}")]
    Email(String),

    /// Invalid phone number
    #[error("Invalid phone number: {0}")]
    Phone(String),

    /// Password does not meet the policy
    #[error("Invalid password: {0}")]
    Password(String),

    /// Invalid or underage birth date
    #[error("Invalid birth date: {0}")]
    BirthDate(String),

    /// Invalid address
    #[error("Invalid address: {0}")]
    Address(String),

    /// Invalid city
    #[error("Invalid city: {0}")]
    City(String),

    /// Invalid country
    #[error("Invalid country: {0}")]
    Country(String),

    /// Multiple validation failures (collect-all mode)
    #[error("Validation failed: {} error(s)", .0.len())]
    Invalid(Vec<FieldViolation>),
}

impl ValidationError {
    /// Returns the field-level violations carried by this error
    ///
    /// Single-field variants yield a one-element list so callers can render
    /// every validation error the same way.
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self {
            ValidationError::FirstName(msg) => vec![FieldViolation::new("first_name", msg.clone())],
            ValidationError::LastName(msg) => vec![FieldViolation::new("last_name", msg.clone())],
            ValidationError::Email(msg) => vec![FieldViolation::new("email", msg.clone())],
            ValidationError::Phone(msg) => vec![FieldViolation::new("phone", msg.clone())],
            ValidationError::Password(msg) => vec![FieldViolation::new("password", msg.clone())],
            ValidationError::BirthDate(msg) => vec![FieldViolation::new("birth_date", msg.clone())],
            ValidationError::Address(msg) => vec![FieldViolation::new("address", msg.clone())],
            ValidationError::City(msg) => vec![FieldViolation::new("city", msg.clone())],
            ValidationError::Country(msg) => vec![FieldViolation::new("country", msg.clone())],
            ValidationError::Invalid(violations) => violations.clone(),
        }
    }
}

/// Unified error type surfaced by the user and thread repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input validation failed; propagated untouched so the UI keeps
    /// field-level detail
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Requested user does not exist
    #[error("User not found")]
    UserNotFound,

    /// Requested thread does not exist
    #[error("Thread not found")]
    ThreadNotFound,

    /// Unique constraint violation on email or phone at registration
    #[error("A user with this email or phone number already exists")]
    UserAlreadyExists,

    /// Credential mismatch at authentication or password change
    #[error("Invalid email or password")]
    InvalidPassword,

    /// Transport or transaction-layer fault (connection refused, commit
    /// failure); the underlying driver error is logged, not exposed
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Maps driver errors to the typed taxonomy
///
/// Unique-constraint violations become `UserAlreadyExists`. The violated
/// constraint name is deliberately not inspected further: the original
/// behavior does not distinguish email from phone conflicts. Everything
/// else is a store fault: the driver error is logged here and an opaque
/// `Unavailable` is returned.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UserAlreadyExists;
            }
        }

        tracing::error!(error = %err, "database fault");
        StoreError::Unavailable(format!("Database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::UserNotFound;
        assert_eq!(err.to_string(), "User not found");

        let err = StoreError::InvalidPassword;
        assert_eq!(err.to_string(), "Invalid email or password");

        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::Email("must contain '@'".to_string());
        assert_eq!(err.to_string(), "Invalid email: must contain '@'");

        let err = ValidationError::Invalid(vec![
            FieldViolation::new("email", "Invalid email format"),
            FieldViolation::new("password", "Password too short"),
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 error(s)");
    }

    #[test]
    fn test_single_variant_violations() {
        let err = ValidationError::Password("too short".to_string());
        let violations = err.violations();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "password");
        assert_eq!(violations[0].message, "too short");
    }

    #[test]
    fn test_aggregate_violations_keep_order() {
        let err = ValidationError::Invalid(vec![
            FieldViolation::new("first_name", "too short"),
            FieldViolation::new("email", "bad shape"),
            FieldViolation::new("password", "missing digit"),
        ]);

        let violations = err.violations();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "email", "password"]);
    }

    #[test]
    fn test_validation_error_is_not_wrapped() {
        let validation = ValidationError::Email("bad".to_string());
        let store: StoreError = validation.clone().into();

        match store {
            StoreError::Validation(inner) => assert_eq!(inner, validation),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_unavailable() {
        // Absent rows are handled with fetch_optional at the call sites;
        // a raw RowNotFound reaching the boundary is a store fault.
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
