use crate::services::relay::DeliveryError;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced to relay callers.
///
/// Each variant maps to one status code and a fixed plain-text body, see
/// `api::middleware::error_handler`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Anything but POST on a relay endpoint
    #[error("invalid method: {method}")]
    InvalidMethod { method: String },

    /// The request body could not be read off the connection
    #[error("failed to read request-body")]
    ReadBody {
        #[source]
        source: axum::Error,
    },

    /// The request body is not the expected JSON document
    #[error("Request-body is malformed")]
    MalformedBody {
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed body with an invalid field
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Synchronous notify for a tag without bindings
    #[error("tag:{tag} is not found")]
    TagNotFound { tag: String },

    /// Synchronous delivery to the webhook failed
    #[error("failed to post message to slack")]
    DeliveryFailed {
        #[source]
        source: DeliveryError,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<DeliveryError> for AppError {
    fn from(error: DeliveryError) -> Self {
        AppError::DeliveryFailed { source: error }
    }
}

impl From<ValidationErrors> for AppError {
    /// Keeps the first failing field, sorted by name for stable output
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        match fields.first() {
            Some((field, errs)) => AppError::Validation {
                field: field.to_string(),
                reason: errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            },
            None => AppError::Validation {
                field: "body".to_string(),
                reason: "request-body is invalid".to_string(),
            },
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotifyRequest;
    use validator::Validate;

    #[test]
    fn test_validation_errors_conversion() {
        let request = NotifyRequest::default();
        let error: AppError = request.validate().unwrap_err().into();

        match error {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "tag");
                assert_eq!(reason, "tag is required");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_not_found_message() {
        let error = AppError::TagNotFound {
            tag: "missing".to_string(),
        };
        assert_eq!(error.to_string(), "tag:missing is not found");
    }

    #[test]
    fn test_delivery_error_conversion() {
        let error: AppError = DeliveryError::Status { status: 500 }.into();
        assert!(matches!(error, AppError::DeliveryFailed { .. }));
    }
}
