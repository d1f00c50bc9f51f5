use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::db::{self, Collection, DocumentStore, Filter, Sort, StoreError};
use crate::errors::AppError;
use crate::models::payment::{NewPayment, Payment, PaymentRecord};
use crate::models::InsertAck;
use crate::utils::validation::validate_payload;

fn duplicate_period() -> AppError {
    AppError::Conflict("Payment already made for this month".to_string())
}

/// Records a salary payment. At most one payment may exist per
/// `(userId, month, year)`; payments are never updated afterwards.
pub async fn create_payment(
    store: web::Data<dyn DocumentStore>,
    new_payment: web::Json<NewPayment>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_payment)?;
    let new_payment = new_payment.into_inner();

    let period = Filter::all_of(vec![
        Filter::eq("userId", new_payment.user_id.clone()),
        Filter::eq("month", new_payment.month.clone()),
        Filter::eq("year", new_payment.year),
    ]);
    if store.find_one(Collection::Payments, &period).await?.is_some() {
        log::warn!(
            "Duplicate payment for user {} in {} {}",
            new_payment.user_id,
            new_payment.month,
            new_payment.year
        );
        return Err(duplicate_period());
    }

    let record = PaymentRecord::stamped(new_payment, Utc::now());
    let id = store
        .insert_one(Collection::Payments, db::to_document(&record)?)
        .await
        .map_err(|err| match err {
            StoreError::DuplicateKey(_) => duplicate_period(),
            other => other.into(),
        })?;

    log::info!("Recorded payment {} for user {}", id, record.user_id);
    Ok(HttpResponse::Created().json(InsertAck::new(id)))
}

pub async fn list_payments(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let payments: Vec<Payment> = db::from_documents(
        store
            .find(Collection::Payments, &Filter::All, Some(&Sort::desc("date")))
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(payments))
}

pub async fn list_payments_by_email(
    store: web::Data<dyn DocumentStore>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filter = Filter::eq("userEmail", email.into_inner());
    let payments: Vec<Payment> = db::from_documents(
        store
            .find(Collection::Payments, &filter, Some(&Sort::desc("date")))
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(payments))
}
