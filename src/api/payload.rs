//! Create payload shape detection
//!
//! The create endpoint accepts either one record or a batch, decided
//! once at the boundary by the JSON shape of the request body: an
//! object is a single create, an array is a bulk create, anything
//! else is rejected.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ApiOperation};

/// A create request body, already shape-checked and deserialized
///
/// # Example
///
/// ```rust
/// use crudkit::api::CreatePayload;
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct CreateNote {
///     title: String,
/// }
///
/// let single: CreatePayload<CreateNote> =
///     CreatePayload::from_value(json!({"title": "a"})).unwrap();
/// assert!(matches!(single, CreatePayload::Single(_)));
///
/// let bulk: CreatePayload<CreateNote> =
///     CreatePayload::from_value(json!([{"title": "a"}, {"title": "b"}])).unwrap();
/// assert!(matches!(bulk, CreatePayload::Bulk(ref v) if v.len() == 2));
///
/// assert!(CreatePayload::<CreateNote>::from_value(json!(42)).is_err());
/// ```
#[derive(Debug)]
pub enum CreatePayload<T> {
    /// One record from a JSON object body
    Single(T),
    /// A batch of records from a JSON array body
    Bulk(Vec<T>),
}

impl<T: DeserializeOwned> CreatePayload<T> {
    /// Decide the shape of a create body and deserialize it
    ///
    /// A body that has the right shape but fails to deserialize into
    /// `T` is a validation failure, not a format one: the client sent
    /// the right kind of thing with the wrong contents.
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(_) => serde_json::from_value(body)
                .map(Self::Single)
                .map_err(|e| ApiError::validation_failed(ApiOperation::Create, e.to_string())),
            Value::Array(_) => serde_json::from_value(body)
                .map(Self::Bulk)
                .map_err(|e| ApiError::validation_failed(ApiOperation::Create, e.to_string())),
            _ => Err(ApiError::invalid_format(
                ApiOperation::Create,
                "request body must be a JSON object or array",
            )),
        }
    }
}
