//! Shared fixtures for the HTTP integration tests: an in-memory store wired
//! into the full route table.
#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use workon_server::config::EmployeeLookup;
use workon_server::db::{Collection, DocumentStore, MemoryStore};
use workon_server::routes;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub lookup: EmployeeLookup,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_lookup(EmployeeLookup::Tasks)
    }

    pub fn with_lookup(lookup: EmployeeLookup) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            lookup,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<BoxBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let store: Arc<dyn DocumentStore> = self.store.clone();
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(self.lookup))
            .configure(routes::configure)
    }

    /// Inserts a raw document, bypassing the HTTP layer.
    pub async fn seed(&self, collection: Collection, document: Value) -> Uuid {
        let document = document.as_object().cloned().expect("seed documents are objects");
        self.store
            .insert_one(collection, document)
            .await
            .expect("seed insert")
    }

    pub async fn count(&self, collection: Collection) -> usize {
        self.store.count(collection).await
    }
}
