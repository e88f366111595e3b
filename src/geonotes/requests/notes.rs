use super::{InvalidRequest, RequestObject};
use crate::model::{NoteDraft, NotePatch, User};
use crate::response::StatusCode;
use crate::store::NoteFilters;
use serde_json::Value;

/// Filter keys accepted by [`NoteListRequest::from_value`].
pub const ACCEPTED_FILTERS: [&str; 7] = [
    "code__eq",
    "url__eq",
    "lat__eq",
    "long__eq",
    "creator__eq",
    "country__eq",
    "tag__eq",
];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteListRequest {
    pub filters: NoteFilters,
    pub limit: Option<usize>,
    pub skip: usize,
}

impl NoteListRequest {
    pub fn new(filters: NoteFilters, limit: Option<usize>, skip: usize) -> Self {
        Self {
            filters,
            limit,
            skip,
        }
    }

    /// Validates a raw `{"filters": {...}, "limit": n, "skip": n}` mapping.
    ///
    /// Unknown filter keys are reported one error each, and checking carries
    /// on past them. Null filter values are dropped.
    pub fn from_value(data: &Value) -> RequestObject<Self> {
        let mut invalid = InvalidRequest::new();
        let mut filters = NoteFilters::default();

        match data.get("filters") {
            None | Some(Value::Null) => {}
            Some(Value::Object(raw)) => {
                for (key, value) in raw {
                    if !ACCEPTED_FILTERS.contains(&key.as_str()) {
                        invalid.add_error(
                            "filters",
                            format!("key {} cannot be used", key),
                            StatusCode::Failure,
                        );
                        continue;
                    }
                    if value.is_null() {
                        continue;
                    }
                    if let Err(message) = set_filter(&mut filters, key, value) {
                        invalid.add_error("filters", message, StatusCode::Failure);
                    }
                }
            }
            Some(_) => {
                return Err(InvalidRequest::single(
                    "filters",
                    "Invalid filters type",
                    StatusCode::Failure,
                ));
            }
        }

        let limit = match data.get("limit") {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_u64() {
                Some(0) => None,
                Some(limit) => Some(limit as usize),
                None => {
                    invalid.add_error("limit", "Invalid limit value", StatusCode::Failure);
                    None
                }
            },
        };

        let skip = match data.get("skip") {
            None | Some(Value::Null) => 0,
            Some(value) => match value.as_u64() {
                Some(skip) => skip as usize,
                None => {
                    invalid.add_error("skip", "Invalid skip value", StatusCode::Failure);
                    0
                }
            },
        };

        invalid.into_result(|| Self::new(filters, limit, skip))
    }
}

fn set_filter(filters: &mut NoteFilters, key: &str, value: &Value) -> Result<(), String> {
    match key {
        "lat__eq" => filters.lat = Some(number_filter(key, value)?),
        "long__eq" => filters.long = Some(number_filter(key, value)?),
        _ => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(format!("value of {} must be a string", key)),
            };
            match key {
                "code__eq" => filters.code = Some(text),
                "url__eq" => filters.url = Some(text),
                "creator__eq" => filters.creator = Some(text),
                "country__eq" => filters.country = Some(text),
                "tag__eq" => filters.tag = Some(text),
                _ => return Err(format!("key {} cannot be used", key)),
            }
        }
    }
    Ok(())
}

fn number_filter(key: &str, value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| format!("value of {} must be a number", key))
}

pub(crate) fn is_http_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && !url.chars().any(char::is_whitespace)
}

fn valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

fn valid_long(long: f64) -> bool {
    long.is_finite() && (-180.0..=180.0).contains(&long)
}

/// Checks a patch's present fields; `None` when they are all acceptable.
fn note_payload_error(url: Option<&str>, lat: Option<f64>, long: Option<f64>) -> Option<&'static str> {
    if url.is_some_and(|u| !is_http_url(u)) {
        return Some("Invalid note url");
    }
    if lat.is_some_and(|l| !valid_lat(l)) {
        return Some("Invalid note latitude");
    }
    if long.is_some_and(|l| !valid_long(l)) {
        return Some("Invalid note longitude");
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddNoteRequest {
    pub note: NoteDraft,
    pub user: User,
}

impl AddNoteRequest {
    pub fn build(note: NoteDraft, user: Option<User>) -> RequestObject<Self> {
        if let Some(message) = note_payload_error(Some(note.url.as_str()), Some(note.lat), Some(note.long)) {
            return Err(InvalidRequest::single("body", message, StatusCode::Failure));
        }
        let Some(user) = user else {
            return Err(InvalidRequest::single("user", "Invalid user", StatusCode::Failure));
        };
        Ok(Self { note, user })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadNoteRequest {
    pub code: String,
}

impl ReadNoteRequest {
    pub fn build(code: &str) -> RequestObject<Self> {
        if code.trim().is_empty() {
            return Err(InvalidRequest::single("code", "Invalid code value", StatusCode::Failure));
        }
        Ok(Self {
            code: code.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNoteRequest {
    pub code: String,
    pub note: NotePatch,
    pub user: User,
}

impl UpdateNoteRequest {
    /// Checks run body, then code, then user; the first failure stops.
    pub fn build(code: &str, note: NotePatch, user: Option<User>) -> RequestObject<Self> {
        if let Some(message) = note_payload_error(note.url.as_deref(), note.lat, note.long) {
            return Err(InvalidRequest::single("body", message, StatusCode::Failure));
        }
        if code.trim().is_empty() {
            return Err(InvalidRequest::single("code", "Invalid code", StatusCode::Failure));
        }
        let Some(user) = user else {
            return Err(InvalidRequest::single("user", "Invalid user", StatusCode::Failure));
        };
        Ok(Self {
            code: code.to_string(),
            note,
            user,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNoteRequest {
    pub code: String,
    pub user: User,
}

impl DeleteNoteRequest {
    pub fn build(code: &str, user: Option<User>) -> RequestObject<Self> {
        if code.trim().is_empty() {
            return Err(InvalidRequest::single("code", "Invalid code value", StatusCode::Failure));
        }
        let Some(user) = user else {
            return Err(InvalidRequest::single("user", "Invalid user", StatusCode::Failure));
        };
        Ok(Self {
            code: code.to_string(),
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> User {
        User::new("a@a.com", "bob", "hash")
    }

    #[test]
    fn list_request_without_filters() {
        let request = NoteListRequest::from_value(&json!({})).unwrap();
        assert!(request.filters.is_empty());
        assert_eq!(request.limit, None);
        assert_eq!(request.skip, 0);
    }

    #[test]
    fn list_request_with_typed_filters() {
        let request = NoteListRequest::from_value(&json!({
            "filters": {"creator__eq": "bob", "lat__eq": 1.5, "long__eq": "2.5", "tag__eq": "x"},
            "limit": 10,
            "skip": 2,
        }))
        .unwrap();

        assert_eq!(request.filters.creator.as_deref(), Some("bob"));
        assert_eq!(request.filters.lat, Some(1.5));
        assert_eq!(request.filters.long, Some(2.5));
        assert_eq!(request.filters.tag.as_deref(), Some("x"));
        assert_eq!(request.limit, Some(10));
        assert_eq!(request.skip, 2);
    }

    #[test]
    fn null_filters_are_dropped() {
        let request = NoteListRequest::from_value(&json!({
            "filters": {"creator__eq": null, "country__eq": "IR", "tag__eq": null}
        }))
        .unwrap();

        assert_eq!(
            request.filters,
            NoteFilters {
                country: Some("IR".to_string()),
                ..NoteFilters::default()
            }
        );
    }

    #[test]
    fn every_unknown_key_is_reported() {
        let invalid = NoteListRequest::from_value(&json!({
            "filters": {"a": 1, "code__eq": "x", "b": 2}
        }))
        .unwrap_err();

        let messages: Vec<_> = invalid.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["key a cannot be used", "key b cannot be used"]);
        assert!(invalid.errors().iter().all(|e| e.parameter == "filters"));
    }

    #[test]
    fn filters_must_be_a_mapping() {
        let invalid = NoteListRequest::from_value(&json!({"filters": 5})).unwrap_err();
        assert_eq!(invalid.errors()[0].message, "Invalid filters type");
    }

    #[test]
    fn bad_coordinate_filter_is_rejected() {
        let invalid =
            NoteListRequest::from_value(&json!({"filters": {"lat__eq": "north"}})).unwrap_err();
        assert_eq!(invalid.errors()[0].message, "value of lat__eq must be a number");
    }

    #[test]
    fn zero_limit_means_no_window() {
        let request = NoteListRequest::from_value(&json!({"limit": 0, "skip": 1})).unwrap();
        assert_eq!(request.limit, None);
        assert_eq!(request.skip, 1);
    }

    #[test]
    fn negative_limit_is_rejected() {
        let invalid = NoteListRequest::from_value(&json!({"limit": -1})).unwrap_err();
        assert_eq!(invalid.errors()[0].parameter, "limit");
    }

    #[test]
    fn add_request_requires_http_url_and_user() {
        assert!(AddNoteRequest::build(NoteDraft::new("https://a.com", 1.0, 2.0), Some(user())).is_ok());

        let bad_url = AddNoteRequest::build(NoteDraft::new("ftp://a.com", 1.0, 2.0), Some(user()));
        assert_eq!(bad_url.unwrap_err().errors()[0].parameter, "body");

        let bad_lat = AddNoteRequest::build(NoteDraft::new("https://a.com", 91.0, 2.0), Some(user()));
        assert_eq!(bad_lat.unwrap_err().errors()[0].message, "Invalid note latitude");

        let no_user = AddNoteRequest::build(NoteDraft::new("https://a.com", 1.0, 2.0), None);
        assert_eq!(no_user.unwrap_err().errors()[0].parameter, "user");
    }

    #[test]
    fn url_check() {
        assert!(is_http_url("http://example.com/path?q=1"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("https:// spaced.com"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn read_request_requires_code() {
        assert!(ReadNoteRequest::build("abc").is_ok());
        let invalid = ReadNoteRequest::build("").unwrap_err();
        assert_eq!(invalid.errors()[0].parameter, "code");
    }

    #[test]
    fn update_request_checks_body_first() {
        let patch = NotePatch {
            long: Some(500.0),
            ..NotePatch::default()
        };
        let invalid = UpdateNoteRequest::build("", patch, None).unwrap_err();
        assert_eq!(invalid.errors().len(), 1);
        assert_eq!(invalid.errors()[0].parameter, "body");

        let invalid = UpdateNoteRequest::build("", NotePatch::default(), Some(user())).unwrap_err();
        assert_eq!(invalid.errors()[0].parameter, "code");

        assert!(UpdateNoteRequest::build("abc", NotePatch::default(), Some(user())).is_ok());
    }

    #[test]
    fn delete_request_requires_code_and_user() {
        assert_eq!(
            DeleteNoteRequest::build("", Some(user())).unwrap_err().errors()[0].parameter,
            "code"
        );
        assert_eq!(
            DeleteNoteRequest::build("abc", None).unwrap_err().errors()[0].parameter,
            "user"
        );
    }
}
