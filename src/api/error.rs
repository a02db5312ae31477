//! API error types for controller operations
//!
//! Structured errors with automatic HTTP status mapping. Unlike most
//! axum error types, `ApiError` renders itself as the same envelope
//! shape every success response uses, so clients always receive
//! `{status, message, data}` regardless of outcome.
//!
//! # Example
//!
//! ```rust
//! use crudkit::api::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Note", "note_123");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("note_123".to_string()));
//! ```

use std::fmt;

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::envelope::Envelope;
use crate::pagination::PageError;
use crate::store::{StoreError, StoreErrorKind, StoreOperation};

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing records
    List,
    /// Getting a single record by ID
    Retrieve,
    /// Creating one or more records
    Create,
    /// Partially updating a record
    Update,
    /// Soft deleting a record
    Destroy,
    /// Soft deleting a batch of records
    BulkDestroy,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Retrieve => write!(f, "retrieve"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Destroy => write!(f, "destroy"),
            Self::BulkDestroy => write!(f, "bulk_destroy"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Requested page does not exist in the collection
    PageNotFound,
    /// Record was not found
    NotFound,
    /// Request body has the wrong shape
    InvalidFormat,
    /// A required parameter is absent
    MissingParameter,
    /// Request payload failed validation
    ValidationFailed,
    /// Operation conflicts with current state
    Conflict,
    /// Access denied
    Forbidden,
    /// The persistence layer failed
    StoreFailure,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageNotFound => write!(f, "page_not_found"),
            Self::NotFound => write!(f, "not_found"),
            Self::InvalidFormat => write!(f, "invalid_format"),
            Self::MissingParameter => write!(f, "missing_parameter"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::Conflict => write!(f, "conflict"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::StoreFailure => write!(f, "store_failure"),
        }
    }
}

impl ApiErrorKind {
    /// HTTP status code for this error kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::PageNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidFormat | Self::MissingParameter => StatusCode::BAD_REQUEST,
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured API error with operation context
///
/// # Example
///
/// ```rust
/// use crudkit::api::ApiError;
///
/// let error = ApiError::not_found("Note", "note_abc");
/// println!("{}", error); // "API not_found error during retrieve: record not found [Note: note_abc]"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "Note")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::api::ApiError;
    ///
    /// let error = ApiError::not_found("Note", "note_123");
    /// assert_eq!(error.entity_type, Some("Note".to_string()));
    /// ```
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: ApiOperation::Retrieve,
            kind: ApiErrorKind::NotFound,
            message: "record not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create an invalid format error
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::api::{ApiError, ApiOperation};
    ///
    /// let error = ApiError::invalid_format(
    ///     ApiOperation::Create,
    ///     "request body must be a JSON object or array",
    /// );
    /// ```
    pub fn invalid_format(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::InvalidFormat, message)
    }

    /// Create a missing parameter error
    pub fn missing_parameter(operation: ApiOperation, parameter: &str) -> Self {
        Self::new(
            operation,
            ApiErrorKind::MissingParameter,
            format!("missing required parameter '{parameter}'"),
        )
    }

    /// Create a validation failed error
    pub fn validation_failed(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::ValidationFailed, message)
    }

    /// Create a forbidden error
    pub fn forbidden(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Forbidden, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }

    /// The HTTP status this error renders with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    /// The failure envelope this error renders as
    #[must_use]
    pub fn to_envelope(&self) -> Envelope<serde_json::Value> {
        Envelope::fail(self.message.clone()).with_http_status(self.status_code())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log with structured context
        tracing::error!(
            operation = %self.operation,
            kind = %self.kind,
            entity_type = ?self.entity_type,
            entity_id = ?self.entity_id,
            "API error: {}", self.message
        );

        self.to_envelope().into_response()
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::PageNotFound, err.to_string())
    }
}

/// Convert StoreOperation to ApiOperation
fn store_operation_to_api_operation(op: StoreOperation) -> ApiOperation {
    match op {
        StoreOperation::FindById => ApiOperation::Retrieve,
        StoreOperation::FindAll | StoreOperation::Count => ApiOperation::List,
        StoreOperation::Create => ApiOperation::Create,
        StoreOperation::Update => ApiOperation::Update,
        StoreOperation::SoftDelete => ApiOperation::Destroy,
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let operation = store_operation_to_api_operation(err.operation);

        let kind = match err.kind {
            StoreErrorKind::NotFound => ApiErrorKind::NotFound,
            StoreErrorKind::ValidationFailed => ApiErrorKind::ValidationFailed,
            StoreErrorKind::Conflict => ApiErrorKind::Conflict,
            StoreErrorKind::Serialization | StoreErrorKind::Backend => ApiErrorKind::StoreFailure,
        };

        // Do not leak backend details to clients.
        let message = match kind {
            ApiErrorKind::StoreFailure => "storage operation failed".to_string(),
            _ => err.message,
        };

        Self {
            operation,
            kind,
            message,
            entity_type: err.entity_type,
            entity_id: err.entity_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_operation_display() {
        assert_eq!(format!("{}", ApiOperation::List), "list");
        assert_eq!(format!("{}", ApiOperation::Retrieve), "retrieve");
        assert_eq!(format!("{}", ApiOperation::Create), "create");
        assert_eq!(format!("{}", ApiOperation::Update), "update");
        assert_eq!(format!("{}", ApiOperation::Destroy), "destroy");
        assert_eq!(format!("{}", ApiOperation::BulkDestroy), "bulk_destroy");
    }

    #[test]
    fn test_api_error_kind_display() {
        assert_eq!(format!("{}", ApiErrorKind::PageNotFound), "page_not_found");
        assert_eq!(format!("{}", ApiErrorKind::NotFound), "not_found");
        assert_eq!(format!("{}", ApiErrorKind::InvalidFormat), "invalid_format");
        assert_eq!(
            format!("{}", ApiErrorKind::MissingParameter),
            "missing_parameter"
        );
        assert_eq!(
            format!("{}", ApiErrorKind::ValidationFailed),
            "validation_failed"
        );
        assert_eq!(format!("{}", ApiErrorKind::Conflict), "conflict");
        assert_eq!(format!("{}", ApiErrorKind::Forbidden), "forbidden");
        assert_eq!(format!("{}", ApiErrorKind::StoreFailure), "store_failure");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::PageNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiErrorKind::InvalidFormat.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorKind::MissingParameter.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiErrorKind::ValidationFailed.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiErrorKind::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiErrorKind::StoreFailure.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_convenience() {
        let error = ApiError::not_found("Note", "note_123");
        assert_eq!(error.operation, ApiOperation::Retrieve);
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.entity_type, Some("Note".to_string()));
        assert_eq!(error.entity_id, Some("note_123".to_string()));
    }

    #[test]
    fn test_missing_parameter_message() {
        let error = ApiError::missing_parameter(ApiOperation::BulkDestroy, "ids");
        assert!(error.message.contains("'ids'"));
        assert_eq!(error.kind, ApiErrorKind::MissingParameter);
    }

    #[test]
    fn test_forbidden_convenience() {
        let error = ApiError::forbidden(ApiOperation::Update, "not the record owner");
        assert_eq!(error.kind, ApiErrorKind::Forbidden);
        assert_eq!(error.operation, ApiOperation::Update);
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_display_with_entity() {
        let error = ApiError::not_found("Note", "note_123");
        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("retrieve"));
        assert!(display.contains("[Note: note_123]"));
    }

    #[test]
    fn test_to_envelope_shape() {
        let error = ApiError::not_found("Note", "note_123");
        let envelope = error.to_envelope();
        assert_eq!(envelope.status, 1);
        assert_eq!(envelope.message, "record not found");
        assert_eq!(envelope.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_from_page_error() {
        let err = PageError::OutOfRange {
            page: "9".to_string(),
            reason: "collection has 2 page(s)".to_string(),
        };
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::PageNotFound);
        assert_eq!(api.operation, ApiOperation::List);
        assert!(api.message.contains("9"));
    }

    #[test]
    fn test_from_store_error_maps_kind_and_operation() {
        let err = StoreError::not_found("Note", "note_1");
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::NotFound);
        assert_eq!(api.operation, ApiOperation::Retrieve);
        assert_eq!(api.entity_type, Some("Note".to_string()));
    }

    #[test]
    fn test_from_store_error_conflict() {
        let err = StoreError::conflict(StoreOperation::Create, "duplicate slug");
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::Conflict);
        assert_eq!(api.operation, ApiOperation::Create);
        assert_eq!(api.status_code(), StatusCode::CONFLICT);
        // Conflicts are client-facing; the message passes through.
        assert!(api.message.contains("duplicate slug"));
    }

    #[test]
    fn test_from_store_error_hides_backend_details() {
        let err = StoreError::backend(StoreOperation::Count, "disk on fire at /dev/sda1");
        let api: ApiError = err.into();
        assert_eq!(api.kind, ApiErrorKind::StoreFailure);
        assert_eq!(api.operation, ApiOperation::List);
        assert!(!api.message.contains("/dev/sda1"));
    }
}
