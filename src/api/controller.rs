//! Resource controller
//!
//! Standard CRUD semantics over any [`ResourceStore`]: paginated
//! listing, retrieval, single and bulk create, partial update, and
//! soft deletion, all answering in the uniform envelope shape. A
//! routing layer maps HTTP verbs onto these operations and converts
//! the returned `Result` with `IntoResponse` on both arms.
//!
//! # Example
//!
//! ```rust,ignore
//! use crudkit::api::ResourceController;
//! use crudkit::config::ApiConfig;
//! use crudkit::store::MemoryStore;
//!
//! let store: MemoryStore<Note, CreateNote, NotePatch> = MemoryStore::new();
//! let controller = ResourceController::new("Note", store, ApiConfig::default());
//!
//! let envelope = controller.list(&[], None, Some("1"), None).await?;
//! assert_eq!(envelope.page, Some(1));
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::envelope::Envelope;
use crate::pagination::{PageRequest, Paginator};
use crate::resource::Resource;
use crate::store::{FilterCondition, OrderDirection, ResourceStore, Visibility};

use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::payload::CreatePayload;

/// CRUD operations for one resource type
///
/// Holds its configuration explicitly; two controllers with different
/// configs coexist in one process without interference.
pub struct ResourceController<S> {
    resource_name: String,
    store: S,
    paginator: Paginator,
    config: ApiConfig,
}

impl<S: ResourceStore> ResourceController<S> {
    /// Create a controller for `resource_name` backed by `store`
    ///
    /// The name appears in not-found and deletion messages ("Note
    /// with id 'x' not found").
    pub fn new(resource_name: impl Into<String>, store: S, config: ApiConfig) -> Self {
        let paginator = Paginator::new(config.pagination.clone());
        Self {
            resource_name: resource_name.into(),
            store,
            paginator,
            config,
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration in effect
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn not_found(&self, operation: ApiOperation, id: &<S::Entity as Resource>::Id) -> ApiError {
        ApiError::new(
            operation,
            ApiErrorKind::NotFound,
            format!(
                "{} with {} '{}' not found",
                self.resource_name, self.config.lookup_field, id
            ),
        )
        .with_entity(self.resource_name.clone(), id.to_string())
    }

    fn project(&self, operation: ApiOperation, entity: &S::Entity) -> Result<Value, ApiError> {
        serde_json::to_value(entity).map_err(|_| {
            ApiError::new(
                operation,
                ApiErrorKind::StoreFailure,
                "failed to serialize response",
            )
        })
    }

    /// List active records matching `filters`, one page at a time
    ///
    /// `raw_page` and `raw_page_size` are the query parameter values
    /// as received. The total is counted before the page is fetched,
    /// and both describe only active records. `order_by` sorts the
    /// matching set before the page is cut; without it, storage order
    /// applies. A page outside the valid range is an error; everything
    /// wrong with `page_size` silently falls back to the default.
    pub async fn list(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        raw_page: Option<&str>,
        raw_page_size: Option<&str>,
    ) -> Result<Envelope<Vec<S::Entity>>, ApiError> {
        let req = PageRequest::from_raw(raw_page, raw_page_size, self.paginator.config());
        let total = self.store.count(Visibility::Active, filters).await?;
        let resolved = self.paginator.resolve(total, &req)?;

        let items = match resolved.limit {
            None => {
                self.store
                    .find_all(Visibility::Active, filters, order_by)
                    .await?
            }
            Some(limit) => {
                self.store
                    .find_page(Visibility::Active, filters, order_by, resolved.offset, limit)
                    .await?
            }
        };

        tracing::debug!(
            resource = %self.resource_name,
            total,
            page = resolved.page,
            served = items.len(),
            "listed records"
        );

        Ok(Envelope::paged(
            items,
            total,
            resolved.page,
            resolved.size.reported(),
        ))
    }

    /// Fetch one active record by ID
    pub async fn retrieve(
        &self,
        id: &<S::Entity as Resource>::Id,
    ) -> Result<Envelope<S::Entity>, ApiError> {
        match self.store.find_by_id(Visibility::Active, id).await? {
            Some(entity) => Ok(Envelope::ok(entity)),
            None => Err(self.not_found(ApiOperation::Retrieve, id)),
        }
    }

    /// Create records from a raw JSON body
    ///
    /// An object body creates one record and returns it; an array
    /// body creates the whole batch or nothing. Any other shape is
    /// rejected before the store is touched.
    pub async fn create(&self, body: Value) -> Result<Envelope<Value>, ApiError>
    where
        S::Create: DeserializeOwned,
    {
        match CreatePayload::from_value(body)? {
            CreatePayload::Single(dto) => {
                let entity = self.store.create(dto).await?;
                tracing::debug!(resource = %self.resource_name, "created record");
                Ok(Envelope::ok(self.project(ApiOperation::Create, &entity)?))
            }
            CreatePayload::Bulk(dtos) => {
                let entities = self.store.create_many(dtos).await?;
                tracing::debug!(
                    resource = %self.resource_name,
                    created = entities.len(),
                    "created records"
                );
                let projected = entities
                    .iter()
                    .map(|e| self.project(ApiOperation::Create, e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Envelope::ok(Value::Array(projected)))
            }
        }
    }

    /// Partially update one active record from a raw JSON body
    ///
    /// Only the fields present in the body change; the store
    /// refreshes `updated_time` on success.
    pub async fn update(
        &self,
        id: &<S::Entity as Resource>::Id,
        body: Value,
    ) -> Result<Envelope<S::Entity>, ApiError>
    where
        S::Patch: DeserializeOwned,
    {
        if !body.is_object() {
            return Err(ApiError::invalid_format(
                ApiOperation::Update,
                "request body must be a JSON object",
            ));
        }
        let patch: S::Patch = serde_json::from_value(body)
            .map_err(|e| ApiError::validation_failed(ApiOperation::Update, e.to_string()))?;

        match self.store.update(id, patch).await? {
            Some(entity) => Ok(Envelope::ok(entity)),
            None => Err(self.not_found(ApiOperation::Update, id)),
        }
    }

    /// Soft delete one active record
    ///
    /// The record stays in storage with a `Deleted` lifecycle and
    /// disappears from listings and lookups. Deleting an ID that is
    /// unknown or already deleted reports not-found.
    pub async fn destroy(
        &self,
        id: &<S::Entity as Resource>::Id,
    ) -> Result<Envelope<()>, ApiError> {
        if self.store.soft_delete(id).await? {
            tracing::debug!(resource = %self.resource_name, id = %id, "soft deleted record");
            Ok(Envelope::message_only(format!(
                "{} deleted",
                self.resource_name
            )))
        } else {
            Err(self.not_found(ApiOperation::Destroy, id))
        }
    }

    /// Soft delete a batch of records by ID
    ///
    /// Expects the raw value of an `ids` parameter. The message
    /// reports how many records actually changed; unknown and
    /// already-deleted IDs are skipped. A store failure here becomes
    /// a failure envelope rather than an `Err`, so one bad batch
    /// never escalates past the response.
    pub async fn bulk_destroy(&self, ids: Option<&Value>) -> Result<Envelope<Value>, ApiError>
    where
        <S::Entity as Resource>::Id: DeserializeOwned,
    {
        let ids = ids
            .ok_or_else(|| ApiError::missing_parameter(ApiOperation::BulkDestroy, "ids"))?;
        if !ids.is_array() {
            return Err(ApiError::new(
                ApiOperation::BulkDestroy,
                ApiErrorKind::MissingParameter,
                "parameter 'ids' must be an array",
            ));
        }
        let ids: Vec<<S::Entity as Resource>::Id> = serde_json::from_value(ids.clone())
            .map_err(|e| {
                ApiError::invalid_format(
                    ApiOperation::BulkDestroy,
                    format!("invalid 'ids': {e}"),
                )
            })?;

        match self.store.soft_delete_many(&ids).await {
            Ok(changed) => {
                tracing::debug!(
                    resource = %self.resource_name,
                    requested = ids.len(),
                    changed,
                    "bulk soft deleted records"
                );
                Ok(Envelope::message_only(format!("{changed} records deleted")))
            }
            Err(err) => {
                let api = ApiError::from(err).with_operation(ApiOperation::BulkDestroy);
                tracing::error!(
                    resource = %self.resource_name,
                    kind = %api.kind,
                    "bulk destroy failed: {}", api.message
                );
                Ok(api.to_envelope())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Lifecycle, Timestamps};
    use crate::store::{
        ApplyPatch, BuildResource, MemoryStore, StoreError, StoreOperation, StoreResult,
    };
    use http::StatusCode;
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        title: String,
        author: String,
        lifecycle: Lifecycle,
        #[serde(flatten)]
        timestamps: Timestamps,
    }

    impl Resource for Note {
        type Id = Uuid;

        fn id(&self) -> &Uuid {
            &self.id
        }

        fn lifecycle(&self) -> Lifecycle {
            self.lifecycle
        }

        fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
            self.lifecycle = lifecycle;
        }

        fn timestamps(&self) -> &Timestamps {
            &self.timestamps
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.timestamps
        }
    }

    #[derive(Debug, Deserialize)]
    struct CreateNote {
        title: String,
        #[serde(default)]
        author: String,
    }

    impl BuildResource<Note> for CreateNote {
        fn validate(&self) -> StoreResult<()> {
            if self.title.trim().is_empty() {
                return Err(StoreError::validation_failed("title must not be empty"));
            }
            Ok(())
        }

        fn build(self) -> Note {
            Note {
                id: Uuid::new_v4(),
                title: self.title,
                author: self.author,
                lifecycle: Lifecycle::Active,
                timestamps: Timestamps::now(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct NotePatch {
        title: Option<String>,
        author: Option<String>,
    }

    impl ApplyPatch<Note> for NotePatch {
        fn apply(self, note: &mut Note) -> StoreResult<()> {
            if let Some(title) = self.title {
                note.title = title;
            }
            if let Some(author) = self.author {
                note.author = author;
            }
            Ok(())
        }
    }

    type NoteStore = MemoryStore<Note, CreateNote, NotePatch>;
    type NoteController = ResourceController<NoteStore>;

    fn controller() -> NoteController {
        ResourceController::new("Note", NoteStore::new(), ApiConfig::default())
    }

    async fn seed(controller: &NoteController, count: usize) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for i in 0..count {
            let body = json!({"title": format!("note {i}"), "author": "alice"});
            let envelope = controller.create(body).await.unwrap();
            let id = envelope.data.unwrap()["id"].as_str().unwrap().parse().unwrap();
            ids.push(id);
        }
        ids
    }

    #[tokio::test]
    async fn test_list_pages_partition_records() {
        let c = controller();
        seed(&c, 45).await;

        let mut seen = 0usize;
        for page in ["1", "2", "3"] {
            let envelope = c.list(&[], None, Some(page), Some("20")).await.unwrap();
            assert_eq!(envelope.count, Some(45));
            assert_eq!(envelope.page_size, Some(20));
            seen += envelope.data.unwrap().len();
        }
        assert_eq!(seen, 45);
    }

    #[tokio::test]
    async fn test_list_unbounded_returns_everything() {
        let c = controller();
        seed(&c, 30).await;

        let envelope = c.list(&[], None, Some("7"), Some("-1")).await.unwrap();
        assert_eq!(envelope.data.unwrap().len(), 30);
        assert_eq!(envelope.count, Some(30));
        assert_eq!(envelope.page, Some(1));
        assert_eq!(envelope.page_size, Some(-1));
    }

    #[tokio::test]
    async fn test_list_garbage_page_size_uses_default() {
        let c = controller();
        seed(&c, 20).await;

        let envelope = c.list(&[], None, None, Some("bogus")).await.unwrap();
        assert_eq!(envelope.data.unwrap().len(), 15);
        assert_eq!(envelope.page_size, Some(15));
    }

    #[tokio::test]
    async fn test_list_page_beyond_last_fails() {
        let c = controller();
        seed(&c, 10).await;

        let err = c.list(&[], None, Some("5"), Some("5")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::PageNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_last_page_sentinel() {
        let c = controller();
        seed(&c, 12).await;

        let envelope = c.list(&[], None, Some("last"), Some("5")).await.unwrap();
        assert_eq!(envelope.page, Some(3));
        assert_eq!(envelope.data.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_collection_first_page_is_valid() {
        let c = controller();
        let envelope = c.list(&[], None, Some("1"), Some("15")).await.unwrap();
        assert!(envelope.data.unwrap().is_empty());
        assert_eq!(envelope.count, Some(0));
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let c = controller();
        c.create(json!({"title": "a", "author": "alice"})).await.unwrap();
        c.create(json!({"title": "b", "author": "bob"})).await.unwrap();

        let filters = [FilterCondition::eq("author", "bob")];
        let envelope = c.list(&filters, None, None, None).await.unwrap();
        assert_eq!(envelope.count, Some(1));
        assert_eq!(envelope.data.unwrap()[0].author, "bob");
    }

    #[tokio::test]
    async fn test_list_orders_records() {
        let c = controller();
        c.create(json!({"title": "banana", "author": "alice"}))
            .await
            .unwrap();
        c.create(json!({"title": "apple", "author": "bob"}))
            .await
            .unwrap();
        c.create(json!({"title": "cherry", "author": "carol"}))
            .await
            .unwrap();

        let envelope = c
            .list(&[], Some(("title", OrderDirection::Ascending)), None, None)
            .await
            .unwrap();
        let titles: Vec<String> = envelope
            .data
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["apple", "banana", "cherry"]);

        // Ordering applies before the page window is cut.
        let envelope = c
            .list(
                &[],
                Some(("title", OrderDirection::Descending)),
                Some("1"),
                Some("2"),
            )
            .await
            .unwrap();
        let titles: Vec<String> = envelope
            .data
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["cherry", "banana"]);
    }

    #[tokio::test]
    async fn test_retrieve_found_and_missing() {
        let c = controller();
        let ids = seed(&c, 1).await;

        let envelope = c.retrieve(&ids[0]).await.unwrap();
        assert_eq!(envelope.data.unwrap().title, "note 0");

        let err = c.retrieve(&Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert!(err.message.contains("Note with id"));
    }

    #[tokio::test]
    async fn test_create_single_from_object() {
        let c = controller();
        let envelope = c
            .create(json!({"title": "solo", "author": "alice"}))
            .await
            .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.data.unwrap()["title"], "solo");
    }

    #[tokio::test]
    async fn test_create_bulk_from_array() {
        let c = controller();
        let envelope = c
            .create(json!([{"title": "a"}, {"title": "b"}, {"title": "c"}]))
            .await
            .unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.as_array().unwrap().len(), 3);

        let listed = c.list(&[], None, None, None).await.unwrap();
        assert_eq!(listed.count, Some(3));
    }

    #[tokio::test]
    async fn test_create_scalar_is_invalid_format() {
        let c = controller();
        let err = c.create(json!("just a string")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidFormat);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_bulk_is_atomic() {
        let c = controller();
        let err = c
            .create(json!([{"title": "fine"}, {"title": "  "}]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ValidationFailed);

        let listed = c.list(&[], None, None, None).await.unwrap();
        assert_eq!(listed.count, Some(0));
    }

    #[tokio::test]
    async fn test_update_merges_partially() {
        let c = controller();
        let ids = seed(&c, 1).await;

        let envelope = c
            .update(&ids[0], json!({"title": "renamed"}))
            .await
            .unwrap();
        let note = envelope.data.unwrap();
        assert_eq!(note.title, "renamed");
        assert_eq!(note.author, "alice");
    }

    #[tokio::test]
    async fn test_update_missing_and_malformed() {
        let c = controller();
        let ids = seed(&c, 1).await;

        let err = c
            .update(&Uuid::new_v4(), json!({"title": "x"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);

        let err = c.update(&ids[0], json!([1, 2])).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidFormat);
    }

    #[tokio::test]
    async fn test_destroy_hides_but_retains_record() {
        let c = controller();
        let ids = seed(&c, 2).await;

        let envelope = c.destroy(&ids[0]).await.unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.message, "Note deleted");

        // Gone from client-facing reads.
        assert!(c.retrieve(&ids[0]).await.is_err());
        assert_eq!(c.list(&[], None, None, None).await.unwrap().count, Some(1));

        // Still in storage, marked deleted.
        let retained = c
            .store()
            .find_by_id(Visibility::Deleted, &ids[0])
            .await
            .unwrap()
            .unwrap();
        assert!(retained.lifecycle.is_deleted());
    }

    #[tokio::test]
    async fn test_destroy_twice_reports_not_found() {
        let c = controller();
        let ids = seed(&c, 1).await;
        c.destroy(&ids[0]).await.unwrap();
        let err = c.destroy(&ids[0]).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_bulk_destroy_reports_actual_changes() {
        let c = controller();
        let ids = seed(&c, 3).await;
        c.destroy(&ids[1]).await.unwrap();

        // One already deleted, one unknown: only two IDs still change...
        let body = json!([ids[0], ids[1], Uuid::new_v4()]);
        let envelope = c.bulk_destroy(Some(&body)).await.unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.message, "1 records deleted");
    }

    #[tokio::test]
    async fn test_bulk_destroy_missing_parameter() {
        let c = controller();
        let err = c.bulk_destroy(None).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::MissingParameter);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_destroy_non_array_parameter() {
        let c = controller();
        let body = json!("not-an-array");
        let err = c.bulk_destroy(Some(&body)).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::MissingParameter);
    }

    #[tokio::test]
    async fn test_bulk_destroy_unparsable_ids() {
        let c = controller();
        let body = json!([123, 456]);
        let err = c.bulk_destroy(Some(&body)).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::InvalidFormat);
    }

    // Store whose writes always fail, for the bulk-destroy containment path.
    struct BrokenStore;

    impl ResourceStore for BrokenStore {
        type Entity = Note;
        type Create = CreateNote;
        type Patch = NotePatch;

        async fn find_by_id(&self, _: Visibility, _: &Uuid) -> StoreResult<Option<Note>> {
            Err(StoreError::backend(StoreOperation::FindById, "down"))
        }

        async fn find_all(
            &self,
            _: Visibility,
            _: &[FilterCondition],
            _: Option<(&str, OrderDirection)>,
        ) -> StoreResult<Vec<Note>> {
            Err(StoreError::backend(StoreOperation::FindAll, "down"))
        }

        async fn find_page(
            &self,
            _: Visibility,
            _: &[FilterCondition],
            _: Option<(&str, OrderDirection)>,
            _: u64,
            _: u64,
        ) -> StoreResult<Vec<Note>> {
            Err(StoreError::backend(StoreOperation::FindAll, "down"))
        }

        async fn count(&self, _: Visibility, _: &[FilterCondition]) -> StoreResult<u64> {
            Err(StoreError::backend(StoreOperation::Count, "down"))
        }

        async fn create(&self, _: CreateNote) -> StoreResult<Note> {
            Err(StoreError::backend(StoreOperation::Create, "down"))
        }

        async fn create_many(&self, _: Vec<CreateNote>) -> StoreResult<Vec<Note>> {
            Err(StoreError::backend(StoreOperation::Create, "down"))
        }

        async fn update(&self, _: &Uuid, _: NotePatch) -> StoreResult<Option<Note>> {
            Err(StoreError::backend(StoreOperation::Update, "down"))
        }

        async fn soft_delete(&self, _: &Uuid) -> StoreResult<bool> {
            Err(StoreError::backend(StoreOperation::SoftDelete, "down"))
        }

        async fn soft_delete_many(&self, _: &[Uuid]) -> StoreResult<u64> {
            Err(StoreError::backend(StoreOperation::SoftDelete, "down"))
        }
    }

    #[tokio::test]
    async fn test_bulk_destroy_contains_store_failure() {
        let c = ResourceController::new("Note", BrokenStore, ApiConfig::default());
        let body = json!([Uuid::new_v4()]);

        // Err would bubble a fault to the routing layer; this must not.
        let envelope = c.bulk_destroy(Some(&body)).await.unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!envelope.message.contains("down"));
    }

    #[tokio::test]
    async fn test_other_operations_propagate_store_failure() {
        let c = ResourceController::new("Note", BrokenStore, ApiConfig::default());
        let err = c.list(&[], None, None, None).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::StoreFailure);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
