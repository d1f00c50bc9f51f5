use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use crate::db::{self, Collection, DocumentStore, Filter, StoreError, ID_FIELD};
use crate::errors::AppError;
use crate::models::payment::Payment;
use crate::models::user::{
    EmployeeUpdate, NewUser, Role, RoleChange, RoleQuery, RoleResponse, User, UserWithPayments,
};
use crate::models::{DeleteAck, InsertAck, UpdateAck};
use crate::utils::validation::{parse_id, validate_payload};

/// Fields cleared when an employee is let go.
const EMPLOYMENT_FIELDS: [&str; 5] = ["role", "phoneNumber", "bank_account_no", "salary", "designation"];

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

async fn find_user(store: &dyn DocumentStore, id: uuid::Uuid) -> Result<Option<User>, AppError> {
    let document = store
        .find_one(Collection::Users, &Filter::eq(ID_FIELD, id.to_string()))
        .await?;
    Ok(document.map(db::from_document).transpose()?)
}

pub async fn list_users(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let users: Vec<User> = db::from_documents(store.find(Collection::Users, &Filter::All, None).await?)?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn list_employees(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let filter = Filter::eq("role", json!(Role::Employee));
    let users: Vec<User> = db::from_documents(store.find(Collection::Users, &filter, None).await?)?;
    Ok(HttpResponse::Ok().json(users))
}

/// Verified staff, including accounts that have not been given a role yet.
pub async fn list_verified_staff(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let filter = Filter::all_of(vec![
        Filter::one_of("role", vec![json!(Role::Employee), json!(Role::Hr), Value::Null]),
        Filter::eq("isVerified", true),
    ]);
    let users: Vec<User> = db::from_documents(store.find(Collection::Users, &filter, None).await?)?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn create_user(
    store: web::Data<dyn DocumentStore>,
    new_user: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_user)?;
    let new_user = new_user.into_inner();

    // Check-then-insert; the store's unique email key backs this up under races.
    if store
        .find_one(Collection::Users, &Filter::eq("email", new_user.email.clone()))
        .await?
        .is_some()
    {
        log::warn!("Signup rejected, email already registered: {}", new_user.email);
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let mut document = db::to_document(&new_user)?;
    document.insert("isVerified".to_string(), Value::Bool(false));
    document.insert("isPaid".to_string(), Value::Bool(false));

    let id = store
        .insert_one(Collection::Users, document)
        .await
        .map_err(|err| match err {
            StoreError::DuplicateKey(_) => AppError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

    log::info!("Created user {}", id);
    Ok(HttpResponse::Created().json(InsertAck::new(id)))
}

pub async fn get_user_role(
    store: web::Data<dyn DocumentStore>,
    query: web::Query<RoleQuery>,
) -> Result<HttpResponse, AppError> {
    let email = query
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::BadRequest("Email is required".to_string()))?;

    let document = store
        .find_one(Collection::Users, &Filter::eq("email", email))
        .await?
        .ok_or_else(user_not_found)?;
    let user: User = db::from_document(document)?;

    Ok(HttpResponse::Ok().json(RoleResponse { role: user.role }))
}

/// The user together with every payment recorded against their id.
pub async fn get_user_with_payments(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let user = find_user(&**store, id).await?.ok_or_else(user_not_found)?;

    let payments: Vec<Payment> = db::from_documents(
        store
            .find(Collection::Payments, &Filter::eq("userId", id.to_string()), None)
            .await?,
    )?;

    Ok(HttpResponse::Ok().json(UserWithPayments { user, payments }))
}

pub async fn get_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let user = find_user(&**store, id).await?.ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user))
}

/// Applies a partial update. A missing user and an update that changed
/// nothing both answer 404, matching the `modifiedCount` contract clients
/// rely on; the log line tells the two apart.
async fn apply_user_update(
    store: &dyn DocumentStore,
    id: uuid::Uuid,
    fields: db::Document,
    not_found_message: &str,
) -> Result<HttpResponse, AppError> {
    let outcome = store.update_one(Collection::Users, id, fields).await?;
    if outcome.modified == 0 {
        log::debug!("No modification for user {} (matched: {})", id, outcome.matched);
        return Err(AppError::NotFound(not_found_message.to_string()));
    }
    Ok(HttpResponse::Ok().json(UpdateAck::from(outcome)))
}

pub async fn update_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
    updates: web::Json<EmployeeUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    validate_payload(&*updates)?;
    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let fields = db::to_document(&*updates)?;
    apply_user_update(&**store, id, fields, "Employee not found or no changes made").await
}

pub async fn change_role(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
    change: web::Json<RoleChange>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let mut fields = db::Document::new();
    fields.insert("role".to_string(), json!(change.new_role));
    apply_user_update(&**store, id, fields, "User not found or role unchanged").await
}

/// Idempotent: verifying an already verified user still succeeds.
pub async fn verify_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    set_flag(&**store, parse_id(&id)?, "isVerified").await
}

pub async fn pay_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    set_flag(&**store, parse_id(&id)?, "isPaid").await
}

async fn set_flag(store: &dyn DocumentStore, id: uuid::Uuid, flag: &str) -> Result<HttpResponse, AppError> {
    let mut fields = db::Document::new();
    fields.insert(flag.to_string(), Value::Bool(true));
    let outcome = store.update_one(Collection::Users, id, fields).await?;
    if outcome.matched == 0 {
        return Err(user_not_found());
    }
    Ok(HttpResponse::Ok().json(UpdateAck::from(outcome)))
}

/// Flips `isVerified` with a read followed by a write. Two concurrent
/// toggles may cancel out or collapse into one.
pub async fn toggle_verified(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let user = find_user(&**store, id).await?.ok_or_else(user_not_found)?;

    let mut fields = db::Document::new();
    fields.insert("isVerified".to_string(), Value::Bool(!user.is_verified));
    let outcome = store.update_one(Collection::Users, id, fields).await?;
    if outcome.matched == 0 {
        // Deleted between the read and the write.
        return Err(user_not_found());
    }
    Ok(HttpResponse::Ok().json(UpdateAck::from(outcome)))
}

pub async fn fire_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let mut fields: db::Document = EMPLOYMENT_FIELDS
        .iter()
        .map(|field| (field.to_string(), Value::Null))
        .collect();
    fields.insert("status".to_string(), json!("fired"));

    let response = apply_user_update(&**store, id, fields, "Employee not found").await?;
    log::info!("Employee {} fired", id);
    Ok(response)
}

pub async fn delete_user(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    let deleted_count = store.delete_one(Collection::Users, id).await?;
    if deleted_count == 0 {
        return Err(user_not_found());
    }
    log::info!("Deleted user {}", id);
    Ok(HttpResponse::Ok().json(DeleteAck {
        acknowledged: true,
        deleted_count,
    }))
}
