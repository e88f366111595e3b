use crate::error::{GeonotesError, Result};
use crate::geo::CountryResolver;
use crate::tags::extract_hashtags;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Conversion between an entity and its string-keyed mapping form.
///
/// The mapping form is what lands in the persisted snapshot, one object per
/// record.
pub trait Record: Serialize + DeserializeOwned {
    fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(GeonotesError::Store(format!(
                "record serialized to a non-object value: {}",
                other
            ))),
        }
    }

    fn from_map(map: Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub code: String,
    pub url: String,
    pub lat: f64,
    pub long: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub creator: Option<String>,
    // Stable owner key (the creator's email)
    #[serde(default)]
    pub creator_id: Option<String>,
    pub created: DateTime<Utc>,
}

impl Record for Note {}

/// Raw input for a new note, before derived fields are computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NoteDraft {
    pub url: String,
    pub lat: f64,
    pub long: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl NoteDraft {
    pub fn new(url: impl Into<String>, lat: f64, long: f64) -> Self {
        Self {
            url: url.into(),
            lat,
            long,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

impl Note {
    /// Builds a fully-derived note from a draft.
    ///
    /// `country` falls back to the resolver and `tags` to the hashtags in
    /// `text` when the draft leaves them empty. This is the only place either
    /// is derived; stored notes are never re-derived on read or update.
    pub fn from_draft(draft: NoteDraft, resolver: &dyn CountryResolver) -> Self {
        let country = draft
            .country
            .filter(|c| !c.is_empty())
            .or_else(|| resolver.country_code(draft.lat, draft.long));
        let tags = match draft.tags {
            Some(tags) if !tags.is_empty() => tags,
            _ => extract_hashtags(&draft.text),
        };

        Self {
            code: draft
                .code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            url: draft.url,
            lat: draft.lat,
            long: draft.long,
            country,
            text: draft.text,
            tags,
            creator: None,
            creator_id: None,
            created: draft.created.unwrap_or_else(Utc::now),
        }
    }

    pub fn is_owned_by(&self, user: &User) -> bool {
        self.creator_id.as_deref() == Some(user.email.as_str())
    }
}

/// Sparse update of a stored note. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, note: &mut Note) {
        if let Some(url) = &self.url {
            note.url = url.clone();
        }
        if let Some(text) = &self.text {
            note.text = text.clone();
        }
        if let Some(lat) = self.lat {
            note.lat = lat;
        }
        if let Some(long) = self.long {
            note.long = long;
        }
        if let Some(country) = &self.country {
            note.country = Some(country.clone());
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: String,
    // Argon2 PHC string, never plaintext
    pub password: String,
    #[serde(default)]
    pub is_active: bool,
}

impl Record for User {}

impl User {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password_hash.into(),
            is_active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn activate() -> Self {
        Self {
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(username) = &self.username {
            user.username = username.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
    }
}

/// Public view of a user, without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRead {
    pub username: String,
    pub is_active: bool,
}

impl From<&User> for UserRead {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    // Owner key; sessions follow the user's email, not the renameable username
    pub email: String,
    pub expire_time: DateTime<Utc>,
}

impl Record for Session {}

impl Session {
    pub fn new(
        session_id: impl Into<String>,
        email: impl Into<String>,
        expire_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            email: email.into(),
            expire_time,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_time < now
    }
}
