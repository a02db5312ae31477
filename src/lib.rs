//! # crudkit
//!
//! Reusable CRUD base layer for axum APIs. Define a resource, a create
//! payload, and a patch payload; the kit supplies pagination, a uniform
//! response envelope, soft deletion, and bulk operations on top of any
//! storage backend.
//!
//! ## Features
//!
//! - **Uniform envelope**: every response is `{status, message, data}`,
//!   with `count`, `page`, and `page_size` on listings
//! - **Pagination**: numbered pages with a `"last"` sentinel, a
//!   `page_size=-1` escape hatch that returns everything, and permissive
//!   parsing that falls back to configured defaults
//! - **Soft deletion**: deleted records stay in storage and vanish from
//!   every client-facing read; bulk deletion reports how many records
//!   actually changed
//! - **Storage-agnostic**: [`store::ResourceStore`] is the only seam a
//!   backend implements; [`store::MemoryStore`] ships for tests and
//!   prototypes
//! - **Configuration**: defaults, a TOML file, and `CRUDKIT_*`
//!   environment variables, merged in that order
//!
//! ## Example
//!
//! ```rust,no_run
//! use crudkit::prelude::*;
//! use serde_json::json;
//! # use crudkit::resource::{Lifecycle, Timestamps};
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Clone, Serialize, Deserialize)]
//! # struct Note { id: uuid::Uuid, title: String, lifecycle: Lifecycle, #[serde(flatten)] timestamps: Timestamps }
//! # impl Resource for Note {
//! #     type Id = uuid::Uuid;
//! #     fn id(&self) -> &uuid::Uuid { &self.id }
//! #     fn lifecycle(&self) -> Lifecycle { self.lifecycle }
//! #     fn set_lifecycle(&mut self, l: Lifecycle) { self.lifecycle = l; }
//! #     fn timestamps(&self) -> &Timestamps { &self.timestamps }
//! #     fn timestamps_mut(&mut self) -> &mut Timestamps { &mut self.timestamps }
//! # }
//! # #[derive(Deserialize)]
//! # struct CreateNote { title: String }
//! # impl BuildResource<Note> for CreateNote {
//! #     fn validate(&self) -> StoreResult<()> { Ok(()) }
//! #     fn build(self) -> Note {
//! #         Note { id: uuid::Uuid::new_v4(), title: self.title, lifecycle: Lifecycle::Active, timestamps: Timestamps::now() }
//! #     }
//! # }
//! # #[derive(Deserialize)]
//! # struct NotePatch { title: Option<String> }
//! # impl ApplyPatch<Note> for NotePatch {
//! #     fn apply(self, note: &mut Note) -> StoreResult<()> {
//! #         if let Some(t) = self.title { note.title = t; }
//! #         Ok(())
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> crudkit::Result<()> {
//!     let config = ApiConfig::load()?;
//!     init_tracing(&config)?;
//!
//!     let store: MemoryStore<Note, CreateNote, NotePatch> = MemoryStore::new();
//!     let notes = ResourceController::new("Note", store, config);
//!
//!     let created = notes.create(json!({"title": "hello"})).await;
//!     let listed = notes.list(&[], None, Some("1"), Some("15")).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod observability;
pub mod pagination;
pub mod resource;
pub mod store;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{ApiError, ApiErrorKind, ApiOperation, CreatePayload, ResourceController};
    pub use crate::config::{ApiConfig, PaginationConfig};
    pub use crate::envelope::Envelope;
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{
        PageError, PageRequest, PageResult, PageSize, PageSource, PageToken, Paginator,
        ResolvedPage,
    };
    pub use crate::resource::{Lifecycle, Resource, Timestamps};
    pub use crate::store::{
        ApplyPatch, BuildResource, FilterCondition, FilterOperator, MemoryStore, OrderDirection,
        ResourceStore, StoreError, StoreErrorKind, StoreOperation, StoreResult, Visibility,
    };

    pub use axum::{
        extract::{Path, Query, State},
        response::{IntoResponse, Json, Response},
        routing::{delete, get, patch, post},
        Router,
    };

    pub use http::StatusCode;

    pub use serde::{Deserialize, Serialize};

    pub use tracing::{debug, error, info, instrument, trace, warn};

    pub use chrono::{DateTime, Utc};

    pub use uuid::Uuid;
}
