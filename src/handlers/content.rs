use actix_web::{web, HttpResponse};

use crate::db::{DocumentStore, Filter};
use crate::errors::AppError;
use crate::models::content::ContentKind;

async fn list_content(store: &dyn DocumentStore, kind: ContentKind) -> Result<HttpResponse, AppError> {
    let documents = store.find(kind.collection(), &Filter::All, None).await?;
    Ok(HttpResponse::Ok().json(documents))
}

pub async fn list_carousel(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    list_content(&**store, ContentKind::Carousel).await
}

pub async fn list_features(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    list_content(&**store, ContentKind::Feature).await
}

pub async fn list_services(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    list_content(&**store, ContentKind::Service).await
}

pub async fn list_testimonials(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    list_content(&**store, ContentKind::Testimonial).await
}
