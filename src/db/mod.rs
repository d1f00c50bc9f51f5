//! Document store gateway.
//!
//! Every handler talks to storage through [`DocumentStore`], a collection-scoped
//! find/insert/update/delete interface over JSON documents. The production
//! implementation keeps documents in a PostgreSQL JSONB table; [`MemoryStore`]
//! provides the same semantics in-process.

pub mod filter;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

pub use filter::{Filter, Sort, SortOrder};
pub use memory::MemoryStore;
pub use postgres::{create_pool, PgDocumentStore};

/// A schema-flexible record, as stored.
pub type Document = Map<String, Value>;

/// Name of the identity field inside every stored document.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Tasks,
    Payments,
    Carousel,
    Features,
    Services,
    Testimonials,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Tasks => "tasks",
            Collection::Payments => "payments",
            Collection::Carousel => "carousel",
            Collection::Features => "features",
            Collection::Services => "services",
            Collection::Testimonials => "testimonials",
        }
    }

    /// Fields whose combined values must be unique within the collection.
    /// Mirrors the partial unique indexes created by the migrations.
    pub fn unique_key(&self) -> Option<&'static [&'static str]> {
        match self {
            Collection::Users => Some(&["email"]),
            Collection::Payments => Some(&["userId", "month", "year"]),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key in collection {0}")]
    DuplicateKey(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of a `$set`-style partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Inserts the document under a freshly generated id and returns that id.
    async fn insert_one(&self, collection: Collection, document: Document) -> Result<Uuid, StoreError>;

    /// Merges `fields` into the document with the given id. A null value clears the field.
    async fn update_one(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError>;

    async fn ping(&self) -> bool;
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(
            <serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object, got {}",
                other
            )),
        )),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

pub fn from_documents<T: DeserializeOwned>(documents: Vec<Document>) -> Result<Vec<T>, StoreError> {
    documents.into_iter().map(from_document).collect()
}
