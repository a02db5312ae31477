//! Store error types
//!
//! Structured errors for the persistence seam, carrying the operation
//! that failed, a category, and optional entity context.
//!
//! # Example
//!
//! ```rust
//! use crudkit::store::{StoreError, StoreErrorKind};
//!
//! let error = StoreError::not_found("Note", "note_123");
//! assert!(matches!(error.kind, StoreErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the store error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Finding a single record by ID
    FindById,
    /// Finding records matching filters
    FindAll,
    /// Counting records matching filters
    Count,
    /// Creating one or more records
    Create,
    /// Updating an existing record
    Update,
    /// Soft deleting records
    SoftDelete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindAll => write!(f, "find_all"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::SoftDelete => write!(f, "soft_delete"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Record was not found
    NotFound,
    /// Payload failed validation before any row was written
    ValidationFailed,
    /// Write conflicts with existing data
    Conflict,
    /// Serialization or deserialization of a record failed
    Serialization,
    /// The backing storage itself failed
    Backend,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::Conflict => write!(f, "conflict"),
            Self::Serialization => write!(f, "serialization"),
            Self::Backend => write!(f, "backend"),
        }
    }
}

/// Structured store error with operation context
///
/// # Example
///
/// ```rust
/// use crudkit::store::{StoreError, StoreOperation};
///
/// let error = StoreError::backend(StoreOperation::Count, "connection reset");
/// println!("{}", error); // "Store backend error during count: connection reset"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The operation being performed when the error occurred
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "Note")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl StoreError {
    /// Create a new store error
    pub fn new(
        operation: StoreOperation,
        kind: StoreErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: StoreOperation::FindById,
            kind: StoreErrorKind::NotFound,
            message: "record not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self {
            operation: StoreOperation::Create,
            kind: StoreErrorKind::ValidationFailed,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a conflict error
    pub fn conflict(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: StoreErrorKind::Conflict,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a serialization error
    pub fn serialization(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: StoreErrorKind::Serialization,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a backend error
    pub fn backend(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: StoreErrorKind::Backend,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
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
    pub fn with_operation(mut self, operation: StoreOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {}
