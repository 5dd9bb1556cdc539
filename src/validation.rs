use serde_json::Value;
use thiserror::Error;

use crate::address::Zip;

/// Fields that must be present and non-empty, in the order they are checked
const REQUIRED_FIELDS: [&str; 6] = ["firstName", "lastName", "address1", "city", "state", "zip"];

/// Reason a candidate address was rejected. Rules are checked in declaration order
/// and the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("state must be 2 characters")]
    StateLength,
    #[error("zip must be numerical")]
    ZipNotNumeric,
    #[error("zip must be 5 digits")]
    ZipDigits,
}

/// Normalized creation input, produced only by a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: Zip,
}

/// Request validation utilities
pub struct AddressValidator;

impl AddressValidator {
    /// Validates an incoming request body for address creation
    pub fn validate_new_address(body: &Value) -> Result<NewAddress, ValidationError> {
        if let Some(field) = REQUIRED_FIELDS
            .iter()
            .find(|field| is_missing(field, body.get(**field)))
        {
            return Err(ValidationError::MissingField(*field));
        }

        let text = |field: &str| {
            body.get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let state = text("state");
        if state.chars().count() != 2 {
            return Err(ValidationError::StateLength);
        }

        let zip = body.get("zip").unwrap_or(&Value::Null);
        let zip = numeric_zip(zip).ok_or(ValidationError::ZipNotNumeric)?;
        if zip.to_text().chars().count() != 5 {
            return Err(ValidationError::ZipDigits);
        }

        Ok(NewAddress {
            first_name: text("firstName"),
            last_name: text("lastName"),
            address1: text("address1"),
            address2: text("address2"),
            city: text("city"),
            state,
            zip,
        })
    }
}

/// Text fields are missing unless they hold a non-empty string. `zip` is missing only
/// when falsy, anything else is left to the numeric checks.
fn is_missing(field: &str, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) if field == "zip" => n.as_f64() == Some(0.0),
        Some(_) => field != "zip",
    }
}

/// The zip in its original representation, or `None` if the value is not a number.
/// Strings count as numeric when they parse as a finite number after trimming.
fn numeric_zip(value: &Value) -> Option<Zip> {
    match value {
        Value::Number(n) => Some(Zip::Number(n.clone())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|_| Zip::Text(s.clone())),
        _ => None,
    }
}
