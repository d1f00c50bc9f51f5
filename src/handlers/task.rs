use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate};

use crate::config::EmployeeLookup;
use crate::db::{self, Collection, DocumentStore, Filter, Sort};
use crate::errors::AppError;
use crate::models::task::{NewTask, Task, TaskUpdate, WorkRecordQuery};
use crate::models::{InsertAck, UpdateAck};
use crate::utils::validation::{normalize_iso_date, parse_id, validate_payload};

pub async fn list_tasks(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    let tasks: Vec<Task> = db::from_documents(
        store
            .find(Collection::Tasks, &Filter::All, Some(&Sort::desc("date")))
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn list_tasks_by_email(
    store: web::Data<dyn DocumentStore>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filter = Filter::eq("email", email.into_inner());
    let tasks: Vec<Task> = db::from_documents(
        store
            .find(Collection::Tasks, &filter, Some(&Sort::desc("date")))
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Parses `YYYY-MM` into the half-open range `[first day, first day of next month)`,
/// rendered as `YYYY-MM-DD` strings.
pub fn month_range(month: &str) -> Result<(String, String), AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid month '{}', expected YYYY-MM", month));

    let (year, month_number) = month.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month_number.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month_number: u32 = month_number.parse().map_err(|_| invalid())?;

    let start = NaiveDate::from_ymd_opt(year, month_number, 1).ok_or_else(invalid)?;
    let end = if start.month() == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month_number + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok((start.format("%Y-%m-%d").to_string(), end.format("%Y-%m-%d").to_string()))
}

/// Resolves an employee display name to the email their tasks are filed under.
async fn resolve_employee_email(
    store: &dyn DocumentStore,
    lookup: EmployeeLookup,
    employee_name: &str,
) -> Result<String, AppError> {
    let collection = match lookup {
        EmployeeLookup::Tasks => Collection::Tasks,
        EmployeeLookup::Users => Collection::Users,
    };
    let document = store
        .find_one(collection, &Filter::eq("name", employee_name))
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    document
        .get("email")
        .and_then(|email| email.as_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
}

pub async fn list_work_records(
    store: web::Data<dyn DocumentStore>,
    lookup: web::Data<EmployeeLookup>,
    query: web::Query<WorkRecordQuery>,
) -> Result<HttpResponse, AppError> {
    let mut clauses = Vec::new();

    if let Some(employee_name) = query.employee_name.as_deref().filter(|n| !n.is_empty()) {
        let email = resolve_employee_email(&**store, **lookup, employee_name).await?;
        clauses.push(Filter::eq("email", email));
    }

    if let Some(month) = query.month.as_deref().filter(|m| !m.is_empty()) {
        let (start, end) = month_range(month)?;
        clauses.push(Filter::range("date", start, end));
    }

    let tasks: Vec<Task> = db::from_documents(
        store
            .find(Collection::Tasks, &Filter::all_of(clauses), Some(&Sort::desc("date")))
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn create_task(
    store: web::Data<dyn DocumentStore>,
    new_task: web::Json<NewTask>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*new_task)?;
    let mut new_task = new_task.into_inner();
    new_task.date = normalize_iso_date(&new_task.date);

    let document = db::to_document(&new_task)?;
    let id = store.insert_one(Collection::Tasks, document).await?;
    log::info!("Created task {} for {}", id, new_task.email);
    Ok(HttpResponse::Created().json(InsertAck::new(id)))
}

/// Merges the given fields into the task and reports the raw outcome.
pub async fn update_task(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<String>,
    updates: web::Json<TaskUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = parse_id(&id)?;
    validate_payload(&*updates)?;
    if updates.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    if let Some(field) = updates.protected_field() {
        return Err(AppError::BadRequest(format!("Field '{}' cannot be updated", field)));
    }

    let mut updates = updates.into_inner();
    if let Some(date) = updates.date.as_mut() {
        *date = normalize_iso_date(date);
    }

    let outcome = store
        .update_one(Collection::Tasks, id, db::to_document(&updates)?)
        .await?;
    Ok(HttpResponse::Ok().json(UpdateAck::from(outcome)))
}
