//! In-memory resource store
//!
//! A [`ResourceStore`] backed by a `Vec` behind an `RwLock`, keeping
//! records in insertion order. Intended for tests and examples; it
//! exercises every trait method, including the filter evaluator, so a
//! controller can be driven end to end without a database.

use std::marker::PhantomData;
use std::sync::RwLock;

use crate::resource::{Lifecycle, Resource};

use super::error::{StoreError, StoreOperation};
use super::filter::{order_values, FilterCondition, OrderDirection};
use super::traits::{ApplyPatch, BuildResource, ResourceStore, StoreResult, Visibility};

/// In-memory store keeping records in insertion order
///
/// # Example
///
/// ```rust,ignore
/// let store: MemoryStore<Note, CreateNote, NotePatch> = MemoryStore::new();
/// let note = store.create(CreateNote { title: "hello".into() }).await?;
/// assert!(store.find_by_id(Visibility::Active, note.id()).await?.is_some());
/// ```
pub struct MemoryStore<E, C, P> {
    rows: RwLock<Vec<E>>,
    _payloads: PhantomData<fn(C, P)>,
}

impl<E, C, P> MemoryStore<E, C, P> {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            _payloads: PhantomData,
        }
    }
}

impl<E, C, P> Default for MemoryStore<E, C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource, C, P> MemoryStore<E, C, P> {
    fn read_rows(&self, operation: StoreOperation) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<E>>> {
        self.rows
            .read()
            .map_err(|_| StoreError::backend(operation, "storage lock poisoned"))
    }

    fn write_rows(
        &self,
        operation: StoreOperation,
    ) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<E>>> {
        self.rows
            .write()
            .map_err(|_| StoreError::backend(operation, "storage lock poisoned"))
    }

    fn admitted(
        row: &E,
        visibility: Visibility,
        filters: &[FilterCondition],
        operation: StoreOperation,
    ) -> StoreResult<bool> {
        if !visibility.admits(row.lifecycle()) {
            return Ok(false);
        }
        if filters.is_empty() {
            return Ok(true);
        }
        let projection = serde_json::to_value(row)
            .map_err(|e| StoreError::serialization(operation, e.to_string()))?;
        Ok(filters.iter().all(|f| f.matches(&projection)))
    }

    fn sort_rows(
        rows: Vec<E>,
        order_by: (&str, OrderDirection),
        operation: StoreOperation,
    ) -> StoreResult<Vec<E>> {
        let (field, direction) = order_by;
        let mut keyed = Vec::with_capacity(rows.len());
        for row in rows {
            let projection = serde_json::to_value(&row)
                .map_err(|e| StoreError::serialization(operation, e.to_string()))?;
            let key = projection.get(field).cloned().unwrap_or(serde_json::Value::Null);
            keyed.push((key, row));
        }
        // Stable sort: ties keep insertion order.
        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = order_values(a, b);
            match direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            }
        });
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }
}

impl<E, C, P> ResourceStore for MemoryStore<E, C, P>
where
    E: Resource,
    C: BuildResource<E> + Send,
    P: ApplyPatch<E> + Send,
{
    type Entity = E;
    type Create = C;
    type Patch = P;

    async fn find_by_id(&self, visibility: Visibility, id: &E::Id) -> StoreResult<Option<E>> {
        let rows = self.read_rows(StoreOperation::FindById)?;
        Ok(rows
            .iter()
            .find(|row| row.id() == id && visibility.admits(row.lifecycle()))
            .cloned())
    }

    async fn find_all(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
    ) -> StoreResult<Vec<E>> {
        let rows = self.read_rows(StoreOperation::FindAll)?;
        let mut out = Vec::new();
        for row in rows.iter() {
            if Self::admitted(row, visibility, filters, StoreOperation::FindAll)? {
                out.push(row.clone());
            }
        }
        drop(rows);
        match order_by {
            Some(order) => Self::sort_rows(out, order, StoreOperation::FindAll),
            None => Ok(out),
        }
    }

    async fn find_page(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<E>> {
        // The window is cut after ordering, so the whole matching set
        // is collected first.
        let matching = self.find_all(visibility, filters, order_by).await?;
        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(
        &self,
        visibility: Visibility,
        filters: &[FilterCondition],
    ) -> StoreResult<u64> {
        let rows = self.read_rows(StoreOperation::Count)?;
        let mut total = 0u64;
        for row in rows.iter() {
            if Self::admitted(row, visibility, filters, StoreOperation::Count)? {
                total += 1;
            }
        }
        Ok(total)
    }

    async fn create(&self, data: C) -> StoreResult<E> {
        data.validate()?;
        let entity = data.build();
        let mut rows = self.write_rows(StoreOperation::Create)?;
        rows.push(entity.clone());
        Ok(entity)
    }

    async fn create_many(&self, data: Vec<C>) -> StoreResult<Vec<E>> {
        // Validate the whole batch before building anything.
        for payload in &data {
            payload.validate()?;
        }
        let entities: Vec<E> = data.into_iter().map(BuildResource::build).collect();
        let mut rows = self.write_rows(StoreOperation::Create)?;
        rows.extend(entities.iter().cloned());
        Ok(entities)
    }

    async fn update(&self, id: &E::Id, patch: P) -> StoreResult<Option<E>> {
        let mut rows = self.write_rows(StoreOperation::Update)?;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id() == id && row.lifecycle() == Lifecycle::Active)
        else {
            return Ok(None);
        };
        patch.apply(row)?;
        row.touch();
        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: &E::Id) -> StoreResult<bool> {
        let mut rows = self.write_rows(StoreOperation::SoftDelete)?;
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.id() == id && row.lifecycle() == Lifecycle::Active)
        else {
            return Ok(false);
        };
        row.set_lifecycle(Lifecycle::Deleted);
        row.touch();
        Ok(true)
    }

    async fn soft_delete_many(&self, ids: &[E::Id]) -> StoreResult<u64> {
        let mut rows = self.write_rows(StoreOperation::SoftDelete)?;
        let mut changed = 0u64;
        for row in rows.iter_mut() {
            if row.lifecycle() == Lifecycle::Active && ids.contains(row.id()) {
                row.set_lifecycle(Lifecycle::Deleted);
                row.touch();
                changed += 1;
            }
        }
        Ok(changed)
    }
}
