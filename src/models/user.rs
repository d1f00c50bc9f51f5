use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::payment::Payment;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Hr,
    Admin,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "bank_account_no", default, skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

/// Signup payload. `isVerified` and `isPaid` are not accepted here; new
/// accounts always start unverified and unpaid.
#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 30))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[validate(length(min = 3, max = 30))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[validate(length(min = 3, max = 40))]
    #[serde(rename = "bank_account_no", skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[validate(length(min = 1, max = 60))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

/// Fields an employee record may have changed through `/employee-update/:id`.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[validate(length(min = 3, max = 30))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[validate(length(min = 3, max = 40))]
    #[serde(rename = "bank_account_no", skip_serializing_if = "Option::is_none")]
    pub bank_account_no: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[validate(length(min = 1, max = 60))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[validate(length(min = 1, max = 30))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.photo.is_none()
            && self.phone_number.is_none()
            && self.bank_account_no.is_none()
            && self.salary.is_none()
            && self.designation.is_none()
            && self.status.is_none()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub new_role: Option<Role>,
}

#[derive(Deserialize, Debug)]
pub struct RoleQuery {
    pub email: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct RoleResponse {
    pub role: Option<Role>,
}

#[derive(Serialize, Debug)]
pub struct UserWithPayments {
    pub user: User,
    pub payments: Vec<Payment>,
}
