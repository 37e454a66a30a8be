use std::ops::RangeInclusive;

use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};

use crate::utils::errors::{ApiError, FieldError, Location};

/// Collects every failed check for a request, in the order the checks ran.
/// Callers must not touch storage until `finish` returns `Ok`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, location: Location, field: &str, value: Option<Value>, message: &str) -> bool {
        if !ok {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
                location,
                value,
            });
        }
        ok
    }

    pub fn object_id(&mut self, location: Location, field: &str, raw: &str) -> Option<ObjectId> {
        match ObjectId::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                self.check(
                    false,
                    location,
                    field,
                    Some(Value::String(raw.to_string())),
                    &format!("{} must be a valid identifier", field),
                );
                None
            }
        }
    }

    /// Requires `body` to be a JSON object and hands it back.
    pub fn object<'a>(&mut self, body: &'a Value) -> Option<&'a Map<String, Value>> {
        let object = body.as_object();
        self.check(object.is_some(), Location::Body, "body", None, "body must be a JSON object");
        object
    }

    pub fn required_string(&mut self, body: &Map<String, Value>, field: &str) -> Option<String> {
        match body.get(field) {
            None | Some(Value::Null) => {
                self.check(false, Location::Body, field, None, &format!("{} is required", field));
                None
            }
            Some(value) => self.string(field, value),
        }
    }

    pub fn optional_string(&mut self, body: &Map<String, Value>, field: &str) -> Option<String> {
        body.get(field).and_then(|value| self.string(field, value))
    }

    /// Strings are kept exactly as submitted.
    fn string(&mut self, field: &str, value: &Value) -> Option<String> {
        let text = value.as_str().map(str::to_string);
        self.check(text.is_some(), Location::Body, field, Some(value.clone()), &format!("{} must be a string", field));
        text
    }

    /// Accepts a JSON number or a numeric string.
    pub fn float_in_range(
        &mut self,
        location: Location,
        field: &str,
        value: &Value,
        range: RangeInclusive<f64>,
    ) -> Option<f64> {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => parse_float(text),
            _ => None,
        };

        match parsed {
            Some(number) if range.contains(&number) => Some(number),
            Some(_) => {
                self.check(
                    false,
                    location,
                    field,
                    Some(value.clone()),
                    &format!("{} must be between {} and {}", field, range.start(), range.end()),
                );
                None
            }
            None => {
                self.check(false, location, field, Some(value.clone()), &format!("{} must be a number", field));
                None
            }
        }
    }

    pub fn required_float_in_range(
        &mut self,
        body: &Map<String, Value>,
        field: &str,
        range: RangeInclusive<f64>,
    ) -> Option<f64> {
        match body.get(field) {
            None | Some(Value::Null) => {
                self.check(false, Location::Body, field, None, &format!("{} is required", field));
                None
            }
            Some(value) => self.float_in_range(Location::Body, field, value, range),
        }
    }

    /// Rejects every key outside `allowed`.
    pub fn only_keys(&mut self, body: &Map<String, Value>, allowed: &[&str]) {
        for (key, value) in body {
            if !allowed.contains(&key.as_str()) {
                self.check(
                    false,
                    Location::Body,
                    key,
                    Some(value.clone()),
                    &format!("{} is not an updatable field (allowed: {})", key, allowed.join(", ")),
                );
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }

    /// Like `finish`, but also hands back the values the checks produced.
    pub fn finish_with<T>(self, value: Option<T>) -> Result<T, ApiError> {
        self.finish()?;
        value.ok_or_else(|| ApiError::InternalServerError("validated value is missing".to_string()))
    }
}

/// Finite decimal numbers only; "NaN", "inf" and friends are rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
