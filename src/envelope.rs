//! Uniform JSON response envelope
//!
//! Every endpoint built on this crate answers with the same body
//! shape: an application status code, a human-readable message, and a
//! data payload. Clients branch on `status` (0 for success, 1 for
//! failure) without inspecting the HTTP status line, while the HTTP
//! status still carries the transport-level meaning.
//!
//! # Example
//!
//! ```rust
//! use crudkit::envelope::Envelope;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! // Single item
//! let user = User { id: 1, name: "Alice".to_string() };
//! let response = Envelope::ok(user);
//!
//! // Paginated list
//! let users = vec![User { id: 1, name: "Alice".to_string() }];
//! let response = Envelope::paged(users, 1, 1, 15);
//! ```

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Application status code for a successful operation
pub const STATUS_OK: u8 = 0;

/// Application status code for a failed operation
pub const STATUS_FAILED: u8 = 1;

/// Response envelope wrapping every endpoint's payload
///
/// Serializes with `status`, `message`, and `data` always present;
/// `data` is `null` when there is nothing to return. Paginated
/// responses additionally carry `count`, `page`, and `page_size`.
///
/// The HTTP status is part of the envelope but never serialized; it
/// is applied when the envelope is converted into a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application status: 0 on success, 1 on failure
    pub status: u8,
    /// Human-readable outcome description
    pub message: String,
    /// The payload, or `null` when the operation produced none
    pub data: Option<T>,
    /// Total number of matching records, on paginated responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Page number that was served, on paginated responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    /// Page size that was applied, on paginated responses;
    /// `-1` when pagination was disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip)]
    http_status: Option<StatusCode>,
}

impl<T> Envelope<T> {
    /// Create a success envelope carrying `data`
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::{Envelope, STATUS_OK};
    ///
    /// let response = Envelope::ok(vec![1, 2, 3]);
    /// assert_eq!(response.status, STATUS_OK);
    /// assert_eq!(response.message, "success");
    /// assert_eq!(response.data, Some(vec![1, 2, 3]));
    /// ```
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK,
            message: "success".to_string(),
            data: Some(data),
            count: None,
            page: None,
            page_size: None,
            http_status: None,
        }
    }

    /// Create a success envelope with no payload
    ///
    /// Used by operations that only report an outcome, such as
    /// deletes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::Envelope;
    ///
    /// let response: Envelope<()> = Envelope::message_only("2 records deleted");
    /// assert_eq!(response.status, 0);
    /// assert!(response.data.is_none());
    /// ```
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            message: message.into(),
            data: None,
            count: None,
            page: None,
            page_size: None,
            http_status: None,
        }
    }

    /// Create a failure envelope
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::{Envelope, STATUS_FAILED};
    ///
    /// let response: Envelope<()> = Envelope::fail("record not found");
    /// assert_eq!(response.status, STATUS_FAILED);
    /// assert!(response.data.is_none());
    /// ```
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED,
            message: message.into(),
            data: None,
            count: None,
            page: None,
            page_size: None,
            http_status: None,
        }
    }

    /// Create a success envelope for a page of results
    ///
    /// `count` is the total number of matching records across all
    /// pages, not the length of the served slice.
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::Envelope;
    ///
    /// let response = Envelope::paged(vec!["a", "b"], 42, 3, 2);
    /// assert_eq!(response.count, Some(42));
    /// assert_eq!(response.page, Some(3));
    /// assert_eq!(response.page_size, Some(2));
    /// ```
    pub fn paged(data: T, count: u64, page: u64, page_size: i64) -> Self {
        Self {
            status: STATUS_OK,
            message: "success".to_string(),
            data: Some(data),
            count: Some(count),
            page: Some(page),
            page_size: Some(page_size),
            http_status: None,
        }
    }

    /// Replace the message
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::Envelope;
    ///
    /// let response = Envelope::ok(1).with_message("created");
    /// assert_eq!(response.message, "created");
    /// ```
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Override the HTTP status applied when rendering the response
    ///
    /// Without an override the envelope renders as 200 OK.
    ///
    /// # Example
    ///
    /// ```rust
    /// use http::StatusCode;
    /// use crudkit::envelope::Envelope;
    ///
    /// let response: Envelope<()> =
    ///     Envelope::fail("record not found").with_http_status(StatusCode::NOT_FOUND);
    /// assert_eq!(response.http_status(), StatusCode::NOT_FOUND);
    /// ```
    #[must_use]
    pub fn with_http_status(mut self, status: StatusCode) -> Self {
        self.http_status = Some(status);
        self
    }

    /// The HTTP status this envelope renders with
    #[must_use]
    pub fn http_status(&self) -> StatusCode {
        self.http_status.unwrap_or(StatusCode::OK)
    }

    /// Whether this envelope reports success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Map the inner data to a new type
    ///
    /// # Example
    ///
    /// ```rust
    /// use crudkit::envelope::Envelope;
    ///
    /// let response = Envelope::ok(42).map(|n| n.to_string());
    /// assert_eq!(response.data, Some("42".to_string()));
    /// ```
    pub fn map<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnOnce(T) -> U,
    {
        Envelope {
            status: self.status,
            message: self.message,
            data: self.data.map(f),
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            http_status: self.http_status,
        }
    }
}

impl<T> From<crate::pagination::PageResult<T>> for Envelope<Vec<T>> {
    fn from(result: crate::pagination::PageResult<T>) -> Self {
        Envelope::paged(result.items, result.total, result.page, result.page_size)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.http_status();
        (status, Json(self)).into_response()
    }
}
