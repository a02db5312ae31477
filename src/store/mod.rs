//! Persistence seam for CRUD resources
//!
//! This module defines the store abstraction the controller talks to,
//! plus an in-memory implementation for tests and examples.
//!
//! # Features
//!
//! - **CRUD seam**: [`ResourceStore`] trait for create, read, update,
//!   and soft-delete operations
//! - **Soft delete**: reads scoped by [`Visibility`], deletes retained
//! - **Filtering**: [`FilterCondition`] evaluated against the JSON
//!   projection of a record
//! - **Ordering**: reads take an optional (field, [`OrderDirection`])
//!   pair, applied before any page window is cut
//! - **Payload seams**: [`BuildResource`] and [`ApplyPatch`] own
//!   validation and merge semantics per resource type
//! - **In-memory backend**: [`MemoryStore`] in insertion order
//!
//! # Example
//!
//! ```rust,ignore
//! use crudkit::store::{FilterCondition, MemoryStore, ResourceStore, Visibility};
//!
//! let store: MemoryStore<Note, CreateNote, NotePatch> = MemoryStore::new();
//! let note = store.create(CreateNote { title: "hello".into() }).await?;
//!
//! let active = store
//!     .find_all(Visibility::Active, &[FilterCondition::eq("title", "hello")], None)
//!     .await?;
//! assert_eq!(active.len(), 1);
//! ```

mod error;
mod filter;
mod memory;
mod traits;

// Re-export all public types
pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use filter::{FilterCondition, FilterOperator, OrderDirection};
pub use memory::MemoryStore;
pub use traits::{ApplyPatch, BuildResource, ResourceStore, StoreResult, Visibility};
