//! Store trait definitions
//!
//! The persistence seam, defined with RPITIT (Return Position Impl
//! Trait In Traits) so implementors write plain `async` bodies
//! without `async_trait`.
//!
//! # Overview
//!
//! - [`ResourceStore`]: CRUD operations over one resource type
//! - [`BuildResource`]: turns a create payload into a full entity
//! - [`ApplyPatch`]: merges a partial update into an entity
//! - [`Visibility`]: which lifecycle states a read operation admits
//!
//! # Example
//!
//! ```rust,ignore
//! use crudkit::store::{ResourceStore, StoreResult, Visibility};
//!
//! struct NoteStore { pool: PgPool }
//!
//! impl ResourceStore for NoteStore {
//!     type Entity = Note;
//!     type Create = CreateNote;
//!     type Patch = NotePatch;
//!
//!     async fn find_by_id(&self, visibility: Visibility, id: &Uuid)
//!         -> StoreResult<Option<Note>>
//!     {
//!         // SELECT ... WHERE id = $1 AND (visibility clause)
//!         todo!()
//!     }
//!     // ... other methods
//! }
//! ```

use std::future::Future;

use crate::resource::{Lifecycle, Resource};

use super::error::StoreError;
use super::filter::{FilterCondition, OrderDirection};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which lifecycle states a read operation admits
///
/// Soft-deleted records stay in storage; reads scope what they see.
/// The controller's public operations use [`Visibility::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only active records (the default for client-facing reads)
    #[default]
    Active,
    /// Only soft-deleted records
    Deleted,
    /// Every record regardless of lifecycle
    All,
}

impl Visibility {
    /// Whether a record in the given lifecycle state is visible
    #[must_use]
    pub fn admits(&self, lifecycle: Lifecycle) -> bool {
        match self {
            Self::Active => lifecycle == Lifecycle::Active,
            Self::Deleted => lifecycle == Lifecycle::Deleted,
            Self::All => true,
        }
    }
}

/// Builds a full entity from a create payload
///
/// `validate` runs before any row is written; for batch creates every
/// payload is validated before the first build, which is what makes
/// the batch all-or-nothing. `build` assigns server-side fields such
/// as the ID and timestamps.
pub trait BuildResource<E: Resource>: Send {
    /// Check the payload without side effects
    fn validate(&self) -> StoreResult<()>;

    /// Construct the entity, assigning the ID and timestamps
    fn build(self) -> E;
}

/// Merges a partial update into an existing entity
///
/// Fields absent from the patch leave the entity untouched. The store
/// refreshes `updated_time` after a successful apply.
pub trait ApplyPatch<E: Resource>: Send {
    /// Apply the patch to the entity
    fn apply(self, entity: &mut E) -> StoreResult<()>;
}

/// CRUD persistence for one resource type
///
/// Read methods take a [`Visibility`] scope; write methods operate on
/// active records only (a soft-deleted record can no longer be
/// updated or deleted again).
pub trait ResourceStore: Send + Sync {
    /// The stored entity type
    type Entity: Resource;
    /// Payload for creating an entity
    type Create: BuildResource<Self::Entity>;
    /// Payload for partially updating an entity
    type Patch: ApplyPatch<Self::Entity>;

    /// Find a record by ID within the visibility scope
    fn find_by_id(
        &self,
        visibility: Visibility,
        id: &<Self::Entity as Resource>::Id,
    ) -> impl Future<Output = StoreResult<Option<Self::Entity>>> + Send;

    /// All records matching the filters
    ///
    /// `order_by` is an optional (field name, direction) pair; without
    /// it, records come back in stable storage order.
    fn find_all(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
    ) -> impl Future<Output = StoreResult<Vec<Self::Entity>>> + Send;

    /// One window of records matching the filters
    ///
    /// Ordering applies to the whole matching set before the window is
    /// cut, so pages remain disjoint under a fixed `order_by`.
    fn find_page(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = StoreResult<Vec<Self::Entity>>> + Send;

    /// Number of records matching the filters
    fn count(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Create a single record
    fn create(
        &self,
        data: Self::Create,
    ) -> impl Future<Output = StoreResult<Self::Entity>> + Send;

    /// Create a batch of records, all or nothing
    ///
    /// If any payload fails validation, no record is written.
    fn create_many(
        &self,
        data: Vec<Self::Create>,
    ) -> impl Future<Output = StoreResult<Vec<Self::Entity>>> + Send;

    /// Partially update an active record
    ///
    /// Returns `Ok(None)` when no active record has the ID.
    fn update(
        &self,
        id: &<Self::Entity as Resource>::Id,
        patch: Self::Patch,
    ) -> impl Future<Output = StoreResult<Option<Self::Entity>>> + Send;

    /// Soft delete an active record
    ///
    /// Returns `Ok(false)` when no active record has the ID, which
    /// makes repeated deletes of the same ID report not-found rather
    /// than failing.
    fn soft_delete(
        &self,
        id: &<Self::Entity as Resource>::Id,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Soft delete every active record whose ID is in `ids`
    ///
    /// Returns the number of records actually changed; IDs that are
    /// unknown or already deleted are skipped without error.
    fn soft_delete_many(
        &self,
        ids: &[<Self::Entity as Resource>::Id],
    ) -> impl Future<Output = StoreResult<u64>> + Send;
}
