use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::validate_iso_date;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    pub date: String,
    /// Free-form fields supplied by the client.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    #[validate(custom = "validate_iso_date")]
    pub date: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields a partial task update may not overwrite.
pub const PROTECTED_TASK_FIELDS: [&str; 2] = ["_id", "email"];

#[derive(Serialize, Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[validate(range(min = 0.0, max = 24.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    #[validate(custom = "validate_iso_date")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Free-form fields, merged as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.task.is_none()
            && self.hours_worked.is_none()
            && self.date.is_none()
            && self.extra.is_empty()
    }

    /// First protected field the update tries to set, if any.
    pub fn protected_field(&self) -> Option<&'static str> {
        PROTECTED_TASK_FIELDS
            .iter()
            .copied()
            .find(|field| self.extra.contains_key(*field))
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecordQuery {
    pub employee_name: Option<String>,
    pub month: Option<String>,
}
