//! In-memory document collection backed by a `tokio::sync::RwLock`.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, Filter, StoreError};

/// A single document collection with a unique-value index on
/// [`Document::UNIQUE_FIELD`].
pub struct Collection<T: Document> {
    inner: Arc<RwLock<Shelf<T>>>,
}

struct Shelf<T> {
    docs: HashMap<Uuid, T>,
    // unique field value -> document id
    unique: HashMap<String, Uuid>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Shelf {
                docs: HashMap::new(),
                unique: HashMap::new(),
            })),
        }
    }

    /// Find all documents matching the equality filter. An empty filter
    /// returns the whole collection.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let shelf = self.inner.read().await;
        let mut out = Vec::new();
        for doc in shelf.docs.values() {
            if filter.is_empty() || filter.matches(&serde_json::to_value(doc)?) {
                out.push(doc.clone());
            }
        }
        Ok(out)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let shelf = self.inner.read().await;
        Ok(shelf.docs.get(&id).cloned())
    }

    /// First document matching the filter, if any.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        let shelf = self.inner.read().await;
        for doc in shelf.docs.values() {
            if filter.matches(&serde_json::to_value(doc)?) {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    /// Insert a new document. Fails with [`StoreError::UniqueViolation`] if
    /// another document already holds the same unique-field value.
    pub async fn insert(&self, doc: T) -> Result<T, StoreError> {
        let mut shelf = self.inner.write().await;
        let key = doc.unique_value();
        if shelf.unique.contains_key(&key) {
            return Err(StoreError::UniqueViolation { field: T::UNIQUE_FIELD, value: key });
        }
        let id = doc.id();
        shelf.unique.insert(key, id);
        shelf.docs.insert(id, doc.clone());
        tracing::info!(
            collection = T::COLLECTION,
            %id,
            unique = %doc.unique_value(),
            "document inserted"
        );
        Ok(doc)
    }

    /// Replace the document stored under `id`. The unique index is
    /// re-checked: moving to a value held by a different document fails.
    pub async fn replace(&self, id: Uuid, doc: T) -> Result<T, StoreError> {
        let mut shelf = self.inner.write().await;
        let previous = match shelf.docs.get(&id) {
            Some(existing) => existing.unique_value(),
            None => return Err(StoreError::Missing(id)),
        };

        let key = doc.unique_value();
        if let Some(&holder) = shelf.unique.get(&key) {
            if holder != id {
                return Err(StoreError::UniqueViolation { field: T::UNIQUE_FIELD, value: key });
            }
        }

        shelf.unique.remove(&previous);
        shelf.unique.insert(key, id);
        shelf.docs.insert(id, doc.clone());
        tracing::info!(collection = T::COLLECTION, %id, "document replaced");
        Ok(doc)
    }

    /// Delete by id. Returns false when no document existed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut shelf = self.inner.write().await;
        match shelf.docs.remove(&id) {
            Some(doc) => {
                shelf.unique.remove(&doc.unique_value());
                tracing::info!(collection = T::COLLECTION, %id, "document deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of documents currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Card {
        id: Uuid,
        code: String,
        label: String,
    }

    impl Document for Card {
        const COLLECTION: &'static str = "cards";
        const UNIQUE_FIELD: &'static str = "code";

        fn id(&self) -> Uuid {
            self.id
        }

        fn unique_value(&self) -> String {
            self.code.clone()
        }
    }

    fn card(code: &str, label: &str) -> Card {
        Card { id: Uuid::new_v4(), code: code.into(), label: label.into() }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_unique_value() {
        let cards = Collection::<Card>::new();
        cards.insert(card("A1", "first")).await.unwrap();

        let err = cards.insert(card("A1", "second")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { field: "code", .. }));
        assert_eq!(cards.len().await, 1);
    }

    #[tokio::test]
    async fn replace_moves_unique_index_entry() {
        let cards = Collection::<Card>::new();
        let a = cards.insert(card("A1", "first")).await.unwrap();

        let mut renamed = a.clone();
        renamed.code = "B2".into();
        cards.replace(a.id, renamed).await.unwrap();

        // old value is free again, new value is taken
        cards.insert(card("A1", "reuse")).await.unwrap();
        let err = cards.insert(card("B2", "clash")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn replace_onto_other_documents_value_fails() {
        let cards = Collection::<Card>::new();
        let a = cards.insert(card("A1", "first")).await.unwrap();
        cards.insert(card("B2", "second")).await.unwrap();

        let mut clash = a.clone();
        clash.code = "B2".into();
        let err = cards.replace(a.id, clash).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));

        // original untouched
        let kept = cards.find_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(kept.code, "A1");
    }

    #[tokio::test]
    async fn replace_keeping_same_unique_value_is_allowed() {
        let cards = Collection::<Card>::new();
        let a = cards.insert(card("A1", "first")).await.unwrap();

        let mut relabeled = a.clone();
        relabeled.label = "renamed".into();
        let updated = cards.replace(a.id, relabeled).await.unwrap();
        assert_eq!(updated.label, "renamed");
        assert_eq!(updated.code, "A1");
    }

    #[tokio::test]
    async fn delete_frees_unique_value() {
        let cards = Collection::<Card>::new();
        let a = cards.insert(card("A1", "first")).await.unwrap();

        assert!(cards.delete(a.id).await.unwrap());
        assert!(!cards.delete(a.id).await.unwrap());
        cards.insert(card("A1", "again")).await.unwrap();
    }

    #[tokio::test]
    async fn find_applies_equality_filter() {
        let cards = Collection::<Card>::new();
        cards.insert(card("A1", "red")).await.unwrap();
        cards.insert(card("B2", "red")).await.unwrap();
        cards.insert(card("C3", "blue")).await.unwrap();

        let all = cards.find(&Filter::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let red = cards
            .find(&Filter::new().eq("label", json!("red")))
            .await
            .unwrap();
        assert_eq!(red.len(), 2);

        let none = cards
            .find(&Filter::new().eq("label", json!("green")))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
