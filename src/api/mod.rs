//! HTTP-facing CRUD layer
//!
//! Everything a handler needs to serve one resource type:
//!
//! # Features
//!
//! - **Controller**: [`ResourceController`] implements list, retrieve,
//!   create (single and bulk), partial update, soft delete, and bulk
//!   soft delete over any [`ResourceStore`](crate::store::ResourceStore)
//! - **Errors**: [`ApiError`] carries operation, kind, and optional
//!   entity context, maps to an HTTP status, and renders itself as a
//!   failure envelope via `IntoResponse`
//! - **Payloads**: [`CreatePayload`] classifies a raw JSON body as a
//!   single create or a bulk create before any store work happens
//!
//! Handlers stay thin: parse path and query input, call one controller
//! method, and return the `Result` directly. Both arms implement
//! `IntoResponse` and produce the same envelope shape.

mod controller;
mod error;
mod payload;

pub use controller::ResourceController;
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use payload::CreatePayload;
