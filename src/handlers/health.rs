use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::db::DocumentStore;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: &'static str,
}

pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Workon Server is running....")
}

pub async fn health_check(store: web::Data<dyn DocumentStore>) -> HttpResponse {
    let connected = store.ping().await;
    HttpResponse::Ok().json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if connected { "connected" } else { "disconnected" },
    })
}
