//! Per-endpoint input validation.
//!
//! Each endpoint declares a typed input struct and builds it through a
//! [`Validator`], which accumulates every field error instead of
//! short-circuiting on the first: a client gets all problems back in one
//! 400 response. Unknown fields in the payload are ignored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One field-level problem: `{field, issue}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub issue: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
        }
    }
}

/// Error accumulator over an untyped JSON payload.
///
/// Typed extractors return placeholder values on failure; [`Validator::finish`]
/// discards the assembled input whenever any error was recorded, so a
/// controller can never act on a partially-valid record.
pub struct Validator<'a> {
    body: &'a Value,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self {
            body,
            errors: Vec::new(),
        }
    }

    /// Whether the raw payload carries this field at all. Used for
    /// whole-object rules such as rejecting immutable-field updates.
    pub fn has(&self, field: &str) -> bool {
        self.body.get(field).map_or(false, |v| !v.is_null())
    }

    /// Record a failure not tied to a single typed extractor.
    pub fn reject(&mut self, field: &str, issue: impl Into<String>) {
        self.errors.push(FieldError::new(field, issue));
    }

    pub fn require_string(&mut self, field: &str, min: usize, max: usize) -> String {
        match self.body.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                String::new()
            }
            Some(v) => self.checked_string(field, v, min, max).unwrap_or_default(),
        }
    }

    pub fn optional_string(&mut self, field: &str, min: usize, max: usize) -> Option<String> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => self.checked_string(field, v, min, max),
        }
    }

    pub fn require_email(&mut self, field: &str) -> String {
        let value = self.require_string(field, 1, 255);
        if !value.is_empty() && !is_email(&value) {
            self.reject(field, "Must be a valid email");
        }
        value
    }

    pub fn optional_url(&mut self, field: &str) -> Option<String> {
        let value = self.optional_string(field, 1, 2048)?;
        if url::Url::parse(&value).is_err() {
            self.reject(field, "Must be a valid URL");
        }
        Some(value)
    }

    /// Optional array of URL strings.
    pub fn optional_url_array(&mut self, field: &str) -> Option<Vec<String>> {
        let items = match self.body.get(field) {
            None | Some(Value::Null) => return None,
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.reject(field, "Must be an array of URLs");
                return None;
            }
        };

        let mut urls = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) if url::Url::parse(s).is_ok() => urls.push(s.to_string()),
                _ => self.reject(&format!("{}[{}]", field, i), "Must be a valid URL"),
            }
        }
        Some(urls)
    }

    pub fn require_i64(&mut self, field: &str) -> i64 {
        match self.body.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                0
            }
            Some(v) => match v.as_i64() {
                Some(n) => n,
                None => {
                    self.reject(field, "Must be an integer");
                    0
                }
            },
        }
    }

    pub fn optional_i64(&mut self, field: &str) -> Option<i64> {
        match self.body.get(field) {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_i64() {
                Some(n) => Some(n),
                None => {
                    self.reject(field, "Must be an integer");
                    None
                }
            },
        }
    }

    /// Integer carried as a string, as query parameters arrive.
    pub fn optional_i64_string(&mut self, field: &str) -> Option<i64> {
        let value = self.optional_string(field, 1, 16)?;
        match value.parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.reject(field, "Must be an integer");
                None
            }
        }
    }

    pub fn require_positive_f64(&mut self, field: &str) -> f64 {
        match self.body.get(field).and_then(Value::as_f64) {
            Some(n) if n > 0.0 => n,
            Some(_) => {
                self.reject(field, "Must be a positive number");
                0.0
            }
            None => {
                self.reject(field, "Required");
                0.0
            }
        }
    }

    pub fn require_bool(&mut self, field: &str) -> bool {
        match self.body.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                false
            }
            Some(v) => match v.as_bool() {
                Some(b) => b,
                None => {
                    self.reject(field, "Must be a boolean");
                    false
                }
            },
        }
    }

    /// RFC 3339 datetime, e.g. `2026-09-01T18:00:00Z`.
    pub fn require_datetime(&mut self, field: &str) -> DateTime<Utc> {
        let raw = self.require_string(field, 1, 64);
        if raw.is_empty() {
            return DateTime::<Utc>::MIN_UTC;
        }
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                self.reject(field, "Must be a valid date");
                DateTime::<Utc>::MIN_UTC
            }
        }
    }

    /// Close out validation: the assembled input survives only when no error
    /// was recorded along the way.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }

    fn checked_string(
        &mut self,
        field: &str,
        value: &Value,
        min: usize,
        max: usize,
    ) -> Option<String> {
        let Some(s) = value.as_str() else {
            self.reject(field, "Must be a string");
            return None;
        };
        let len = s.chars().count();
        if len < min {
            self.reject(field, format!("Must be at least {} characters", min));
            None
        } else if len > max {
            self.reject(field, format!("Must be at most {} characters", max));
            None
        } else {
            Some(s.to_string())
        }
    }
}

// Format check only; deliverability is not this layer's concern.
fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accumulates_every_error_in_one_pass() {
        let body = json!({ "username": "ab", "password": 42 });
        let mut v = Validator::new(&body);
        v.require_string("username", 3, 255);
        v.require_string("password", 8, 255);
        v.require_email("email");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].issue, "Must be at least 3 characters");
        assert_eq!(errors[1].issue, "Must be a string");
        assert_eq!(errors[2].issue, "Required");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = json!({ "content": "hi", "totally_unknown": true });
        let mut v = Validator::new(&body);
        let content = v.require_string("content", 1, 1000);
        assert_eq!(v.finish(content).unwrap(), "hi");
    }

    #[test]
    fn optional_fields_may_be_absent_but_not_invalid() {
        let body = json!({ "link": "not a url" });
        let mut v = Validator::new(&body);
        assert!(v.optional_url("missing").is_none());
        v.optional_url("link");
        assert!(v.finish(()).is_err());
    }

    #[test]
    fn url_array_flags_each_bad_entry() {
        let body = json!({ "mediaUrls": ["https://ok.example/a.png", "nope", 3] });
        let mut v = Validator::new(&body);
        v.optional_url_array("mediaUrls");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "mediaUrls[1]");
        assert_eq!(errors[1].field, "mediaUrls[2]");
    }

    #[test]
    fn email_format() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("a b@c.dk"));
    }

    #[test]
    fn datetime_parses_rfc3339() {
        let body = json!({ "date": "2026-09-01T18:00:00Z", "bad": "tomorrow" });
        let mut v = Validator::new(&body);
        let dt = v.require_datetime("date");
        assert_eq!(dt.to_rfc3339(), "2026-09-01T18:00:00+00:00");
        v.require_datetime("bad");
        assert!(v.finish(()).is_err());
    }

    #[test]
    fn positive_number_guard() {
        let body = json!({ "amount": -5 });
        let mut v = Validator::new(&body);
        v.require_positive_f64("amount");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors[0].issue, "Must be a positive number");
    }
}
