use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::database::manager::DatabaseError;

/// Profile columns a caller may modify through the profile endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    DisplayName,
    Bio,
    Location,
    AvatarUrl,
    HeaderUrl,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::DisplayName,
        ProfileField::Bio,
        ProfileField::Location,
        ProfileField::AvatarUrl,
        ProfileField::HeaderUrl,
    ];

    /// Column name, which is also the request body key.
    pub fn column(&self) -> &'static str {
        match self {
            ProfileField::DisplayName => "display_name",
            ProfileField::Bio => "bio",
            ProfileField::Location => "location",
            ProfileField::AvatarUrl => "avatar_url",
            ProfileField::HeaderUrl => "header_url",
        }
    }
}

/// The allow-listed subset of an untrusted request body.
///
/// A key counts as present even when its value is empty, `false` or `null`.
/// Keys outside [`ProfileField::ALL`] are dropped without error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    fields: Vec<(ProfileField, Value)>,
}

impl ProfileChanges {
    pub fn from_body(body: &Map<String, Value>) -> Self {
        let fields = ProfileField::ALL
            .iter()
            .filter_map(|field| body.get(field.column()).map(|value| (*field, value.clone())))
            .collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[(ProfileField, Value)] {
        &self.fields
    }

    /// Attach the modification timestamp, producing the final update set.
    pub fn stamped(self, updated_at: DateTime<Utc>) -> ProfileUpdate {
        ProfileUpdate {
            changes: self,
            updated_at,
        }
    }
}

/// Update set sent to the profile store: the allowed changes plus `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    changes: ProfileChanges,
    updated_at: DateTime<Utc>,
}

impl ProfileUpdate {
    pub fn changes(&self) -> &ProfileChanges {
        &self.changes
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// ISO-8601 timestamp with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
    pub fn updated_at_iso(&self) -> String {
        self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Column names in the order they will be written, `updated_at` last.
    pub fn columns(&self) -> Vec<&'static str> {
        self.changes
            .fields()
            .iter()
            .map(|(field, _)| field.column())
            .chain(std::iter::once("updated_at"))
            .collect()
    }

    /// Values coerced to nullable text. Strings and `null` are accepted;
    /// anything else is rejected the way a text column would reject it.
    pub fn text_values(&self) -> Result<Vec<(ProfileField, Option<String>)>, DatabaseError> {
        self.changes
            .fields()
            .iter()
            .map(|(field, value)| match value {
                Value::String(s) => Ok((*field, Some(s.clone()))),
                Value::Null => Ok((*field, None)),
                other => Err(DatabaseError::InvalidValue {
                    column: field.column(),
                    reason: format!("expected string or null, got {}", other),
                }),
            })
            .collect()
    }

    /// JSON view of the update set.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (field, value) in self.changes.fields() {
            map.insert(field.column().to_string(), value.clone());
        }
        map.insert("updated_at".to_string(), Value::String(self.updated_at_iso()));
        Value::Object(map)
    }
}
