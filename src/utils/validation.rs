use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(map_validation_error)
}

fn map_validation_error(err: ValidationErrors) -> AppError {
    let mut details = err
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let errors = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => format!("{}: {}", e.code, message),
                    None => e.code.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: [{}]", field, errors)
        })
        .collect::<Vec<_>>();
    details.sort();
    AppError::BadRequest(format!("Validation failed: {}", details.join("; ")))
}

pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    let is_date = NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    if is_date || DateTime::parse_from_rfc3339(value).is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("iso_date"))
    }
}

/// Rewrites RFC 3339 timestamps in UTC with a fixed precision so stored dates
/// order and range-compare correctly as strings. Plain dates are kept as given.
pub fn normalize_iso_date(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => timestamp
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Micros, true),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_dates() {
        assert!(validate_iso_date("2024-03-15").is_ok());
        assert!(validate_iso_date("2024-03-15T08:30:00Z").is_ok());
        assert!(validate_iso_date("2024-03-15T08:30:00+07:00").is_ok());
        assert!(validate_iso_date("15/03/2024").is_err());
        assert!(validate_iso_date("2024-02-30").is_err());
    }

    #[test]
    fn timestamps_are_stored_in_utc() {
        assert_eq!(normalize_iso_date("2024-03-15"), "2024-03-15");
        assert_eq!(
            normalize_iso_date("2024-04-01T01:00:00+05:00"),
            "2024-03-31T20:00:00.000000Z"
        );
        assert_eq!(
            normalize_iso_date("2024-03-15T08:30:00.5Z"),
            "2024-03-15T08:30:00.500000Z"
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(matches!(parse_id("not-a-uuid"), Err(AppError::BadRequest(_))));
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
