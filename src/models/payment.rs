use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: String,
    pub amount: f64,
    pub month: String,
    pub year: i32,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[validate(length(min = 1, max = 20))]
    pub month: String,
    #[validate(range(min = 1970, max = 9999))]
    pub year: i32,
    #[validate(length(min = 1, max = 100))]
    pub user_name: Option<String>,
    #[validate(email)]
    pub user_email: Option<String>,
    #[validate(length(min = 1, max = 30))]
    pub status: Option<String>,
}

/// Document written for a new payment; `date` is stamped by the server as a
/// UTC timestamp with fixed microsecond precision, so it sorts as a string.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub user_id: String,
    pub amount: f64,
    pub month: String,
    pub year: i32,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PaymentRecord {
    pub fn stamped(payment: NewPayment, date: DateTime<Utc>) -> Self {
        Self {
            user_id: payment.user_id,
            amount: payment.amount,
            month: payment.month,
            year: payment.year,
            date: date.to_rfc3339_opts(SecondsFormat::Micros, true),
            user_name: payment.user_name,
            user_email: payment.user_email,
            status: payment.status,
        }
    }
}
