use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, Sort, StoreError, UpdateOutcome, ID_FIELD};

/// In-process document store with the same matching, ordering and
/// unique-key rules as the PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn has_id(document: &Document, id: Uuid) -> bool {
    document.get(ID_FIELD).and_then(Value::as_str) == Some(id.to_string().as_str())
}

fn violates_unique_key(existing: &[Document], candidate: &Document, key: &[&str]) -> bool {
    existing.iter().any(|doc| {
        key.iter().all(|field| match (doc.get(*field), candidate.get(*field)) {
            (Some(a), Some(b)) => !a.is_null() && a == b,
            _ => false,
        })
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();

        if let Some(sort) = sort {
            found.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(found)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if let Some(key) = collection.unique_key() {
            if violates_unique_key(docs, &document, key) {
                return Err(StoreError::DuplicateKey(collection.name()));
            }
        }
        docs.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(UpdateOutcome::default());
        };

        let mut modified = false;
        for (field, value) in fields {
            if field == ID_FIELD {
                continue;
            }
            if document.get(&field) != Some(&value) {
                document.insert(field, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| has_id(d, id)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> bool {
        true
    }
}
