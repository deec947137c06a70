//! In-memory resource store

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::record::{Fields, Resource};

/// How an update carrying no fields is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Reject with [`StoreError::NoUpdateData`]; an empty text with no
    /// `completed` counts as no data
    #[default]
    RejectEmpty,
    /// Accept as a no-op and return the record unchanged
    AllowEmpty,
}

/// Sequential identifier generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdSequence {
    initial: u64,
    next: u64,
}

impl IdSequence {
    pub fn starting_at(initial: u64) -> Self {
        Self {
            initial,
            next: initial,
        }
    }

    /// Take the next value
    pub fn advance(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    /// Value the next call to `advance` will return
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn initial(&self) -> u64 {
        self.initial
    }

    pub fn rewind(&mut self) {
        self.next = self.initial;
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[derive(Debug)]
struct Inner<R> {
    records: Vec<R>,
    seq: IdSequence,
}

/// Insertion-ordered record collection with its id generator.
///
/// Every operation takes the lock once and completes under it, so a create
/// or update is never observed half-applied.
#[derive(Debug)]
pub struct ResourceStore<R: Resource> {
    inner: RwLock<Inner<R>>,
    fixtures: Vec<R>,
    update_policy: UpdatePolicy,
}

impl<R: Resource> Default for ResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourceStore<R> {
    /// Empty store whose first id is generated from 1
    pub fn new() -> Self {
        Self::with_fixtures(Vec::new(), 1)
    }

    /// Store seeded with `fixtures`, generating ids from `first_seq`.
    ///
    /// `reset` restores exactly this state.
    pub fn with_fixtures(fixtures: Vec<R>, first_seq: u64) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: fixtures.clone(),
                seq: IdSequence::starting_at(first_seq),
            }),
            fixtures,
            update_policy: UpdatePolicy::default(),
        }
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// All records in insertion order
    pub async fn list(&self) -> Vec<R> {
        self.inner.read().await.records.clone()
    }

    pub async fn get(&self, id: &R::Id) -> Option<R> {
        let inner = self.inner.read().await;
        inner.records.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Id the next successful create will receive
    pub async fn next_id(&self) -> R::Id {
        R::id_from_seq(self.inner.read().await.seq.peek())
    }

    /// Validate and append a new record
    pub async fn create(&self, fields: Fields) -> Result<R, StoreError> {
        let text = match fields.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(StoreError::MissingField(R::TEXT_FIELD)),
        };

        let mut inner = self.inner.write().await;
        let id = R::id_from_seq(inner.seq.advance());
        let record = R::assemble(id, text, fields.completed.unwrap_or(false));
        inner.records.push(record.clone());

        tracing::debug!(id = %record.id(), total = inner.records.len(), "Record created");
        Ok(record)
    }

    /// Apply the supplied fields to an existing record
    pub async fn update(&self, id: &R::Id, fields: Fields) -> Result<R, StoreError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        match self.update_policy {
            UpdatePolicy::RejectEmpty if fields.carries_no_data() => {
                return Err(StoreError::NoUpdateData)
            }
            UpdatePolicy::AllowEmpty if fields.is_empty() => return Ok(record.clone()),
            _ => {}
        }
        if fields.has_blank_text() {
            return Err(StoreError::BlankField(R::TEXT_FIELD));
        }

        record.apply(fields);
        tracing::debug!(id = %id, "Record updated");
        Ok(record.clone())
    }

    /// Remove a record
    pub async fn delete(&self, id: &R::Id) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|r| r.id() != id);

        if inner.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::debug!(id = %id, total = inner.records.len(), "Record deleted");
        Ok(())
    }

    /// Restore the fixture set and rewind the id generator
    pub async fn reset(&self) {
        let mut inner = self.inner.write().await;
        inner.records = self.fixtures.clone();
        inner.seq.rewind();
        tracing::info!(fixtures = self.fixtures.len(), "Store reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Item, Todo};

    fn text(value: &str) -> Fields {
        Fields::new(Some(value.to_string()), None)
    }

    #[test]
    fn test_id_sequence() {
        let mut seq = IdSequence::starting_at(3);
        assert_eq!(seq.advance(), 3);
        assert_eq!(seq.advance(), 4);
        assert_eq!(seq.peek(), 5);
        seq.rewind();
        assert_eq!(seq.peek(), seq.initial());
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = ResourceStore::<Todo>::new();

        let a = store.create(text("Task A")).await.unwrap();
        let b = store.create(text("Task B")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(!a.completed);

        let texts: Vec<String> = store.list().await.into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Task A", "Task B"]);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_or_blank_text() {
        let store = ResourceStore::<Item>::new();

        let missing = store.create(Fields::new(None, Some(false))).await;
        assert_eq!(missing, Err(StoreError::MissingField("name")));

        let blank = store.create(text("  \t ")).await;
        assert_eq!(blank, Err(StoreError::MissingField("name")));

        assert!(store.is_empty().await);
        assert_eq!(store.next_id().await, "item1");
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_completed_and_untrimmed_text() {
        let store = ResourceStore::<Item>::new();
        let item = store
            .create(Fields::new(Some(" padded ".to_string()), Some(true)))
            .await
            .unwrap();

        assert_eq!(item.name, " padded ");
        assert!(item.completed);
    }

    #[tokio::test]
    async fn test_ids_never_reused_after_delete() {
        let store = ResourceStore::<Todo>::new();
        let first = store.create(text("one")).await.unwrap();
        store.delete(&first.id).await.unwrap();

        let second = store.create(text("two")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = ResourceStore::<Item>::with_fixtures(Item::fixtures(), 3);
        let id = "item1".to_string();

        let updated = store
            .update(&id, Fields::new(None, Some(true)))
            .await
            .unwrap();
        assert_eq!(updated.name, "Existing Item 1");
        assert!(updated.completed);

        let renamed = store.update(&id, text("Renamed")).await.unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert!(renamed.completed);

        assert_eq!(store.get(&id).await, Some(renamed));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found_before_validation() {
        let store = ResourceStore::<Item>::new();
        let missing = "nonExistentId123".to_string();

        let result = store.update(&missing, Fields::default()).await;
        assert_eq!(result, Err(StoreError::NotFound(missing)));
    }

    #[tokio::test]
    async fn test_empty_update_policy() {
        let strict = ResourceStore::<Item>::with_fixtures(Item::fixtures(), 3);
        let result = strict.update(&"item1".to_string(), Fields::default()).await;
        assert_eq!(result, Err(StoreError::NoUpdateData));
        let result = strict.update(&"item1".to_string(), text("")).await;
        assert_eq!(result, Err(StoreError::NoUpdateData));

        let lenient = ResourceStore::<Todo>::new().with_update_policy(UpdatePolicy::AllowEmpty);
        let todo = lenient.create(text("keep")).await.unwrap();
        let unchanged = lenient.update(&todo.id, Fields::default()).await.unwrap();
        assert_eq!(unchanged, todo);
        let result = lenient.update(&todo.id, text("")).await;
        assert_eq!(result, Err(StoreError::BlankField("text")));
    }

    #[tokio::test]
    async fn test_blank_update_applies_nothing() {
        let store = ResourceStore::<Todo>::new().with_update_policy(UpdatePolicy::AllowEmpty);
        let todo = store.create(text("keep")).await.unwrap();

        let result = store
            .update(&todo.id, Fields::new(Some(" ".to_string()), Some(true)))
            .await;
        assert_eq!(result, Err(StoreError::BlankField("text")));
        assert_eq!(store.get(&todo.id).await, Some(todo));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = ResourceStore::<Todo>::new();
        let todo = store.create(text("gone")).await.unwrap();

        store.delete(&todo.id).await.unwrap();
        assert_eq!(store.get(&todo.id).await, None);
        assert_eq!(
            store.delete(&todo.id).await,
            Err(StoreError::NotFound("1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_reset_restores_fixtures_and_rewinds() {
        let store = ResourceStore::<Item>::with_fixtures(Item::fixtures(), 3);
        store.create(text("extra")).await.unwrap();
        store.delete(&"item1".to_string()).await.unwrap();

        store.reset().await;
        store.reset().await;

        assert_eq!(store.list().await, Item::fixtures());
        let next = store.create(text("after reset")).await.unwrap();
        assert_eq!(next.id, "item3");
    }
}
