use async_trait::async_trait;
use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{
    Collection, Document, DocumentStore, Filter, Sort, SortOrder, StoreError, UpdateOutcome, ID_FIELD,
};
use crate::config::DatabaseConfig;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url())
        .await
}

/// Documents live in one JSONB table keyed by `(collection, id)`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn select(collection: Collection) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new("SELECT doc FROM documents WHERE collection = ");
        query.push_bind(collection.name());
        query
    }
}

fn push_filter(query: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            query.push("TRUE");
        }
        Filter::Eq(field, value) => push_equals(query, field, value),
        Filter::In(field, values) => {
            if values.is_empty() {
                query.push("FALSE");
                return;
            }
            query.push("(");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    query.push(" OR ");
                }
                push_equals(query, field, value);
            }
            query.push(")");
        }
        Filter::Range { field, start, end } => {
            query.push("(doc ->> ");
            query.push_bind(field.clone());
            query.push(" >= ");
            query.push_bind(start.clone());
            query.push(" AND doc ->> ");
            query.push_bind(field.clone());
            query.push(" < ");
            query.push_bind(end.clone());
            query.push(")");
        }
        Filter::And(clauses) => {
            query.push("(");
            for (i, clause) in clauses.iter().enumerate() {
                if i > 0 {
                    query.push(" AND ");
                }
                push_filter(query, clause);
            }
            query.push(")");
        }
    }
}

fn push_equals(query: &mut QueryBuilder<'static, Postgres>, field: &str, value: &Value) {
    if value.is_null() {
        query.push("(doc -> ");
        query.push_bind(field.to_string());
        query.push(" IS NULL OR doc -> ");
        query.push_bind(field.to_string());
        query.push(" = 'null'::jsonb)");
    } else {
        query.push("doc -> ");
        query.push_bind(field.to_string());
        query.push(" = ");
        query.push_bind(Json(value.clone()));
    }
}

fn push_order(query: &mut QueryBuilder<'static, Postgres>, sort: Option<&Sort>) {
    if let Some(sort) = sort {
        query.push(" ORDER BY doc -> ");
        query.push_bind(sort.field.clone());
        query.push(match sort.order {
            SortOrder::Ascending => " ASC NULLS FIRST,",
            SortOrder::Descending => " DESC NULLS LAST,",
        });
        query.push(" seq ASC");
    } else {
        query.push(" ORDER BY seq ASC");
    }
}

fn map_write_error(collection: Collection, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateKey(collection.name())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut query = Self::select(collection);
        query.push(" AND ");
        push_filter(&mut query, filter);
        push_order(&mut query, sort);

        let documents: Vec<Document> = query
            .build_query_scalar::<Json<Document>>()
            .fetch(&self.pool)
            .map_ok(|Json(doc)| doc)
            .try_collect()
            .await?;
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let mut query = Self::select(collection);
        query.push(" AND ");
        push_filter(&mut query, filter);
        push_order(&mut query, None);
        query.push(" LIMIT 1");

        let document = query
            .build_query_scalar::<Json<Document>>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(document.map(|Json(doc)| doc))
    }

    async fn insert_one(&self, collection: Collection, mut document: Document) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        sqlx::query("INSERT INTO documents (collection, id, doc) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(id)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|err| map_write_error(collection, err))?;

        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: Uuid,
        mut fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        fields.remove(ID_FIELD);

        let row = sqlx::query(
            r#"
            WITH target AS (
                SELECT id, doc FROM documents WHERE collection = $1 AND id = $2
            ), updated AS (
                UPDATE documents d
                SET doc = d.doc || $3
                FROM target t
                WHERE d.collection = $1 AND d.id = t.id AND (t.doc || $3) <> t.doc
                RETURNING d.id
            )
            SELECT
                (SELECT COUNT(*) FROM target) AS matched,
                (SELECT COUNT(*) FROM updated) AS modified
            "#,
        )
        .bind(collection.name())
        .bind(id)
        .bind(Json(fields))
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_write_error(collection, err))?;

        let matched: i64 = row.try_get("matched")?;
        let modified: i64 = row.try_get("modified")?;
        Ok(UpdateOutcome {
            matched: matched as u64,
            modified: modified as u64,
        })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
