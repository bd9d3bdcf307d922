//! Identifier normalization.
//!
//! The backend assigns every record an opaque string id, but references between
//! records do not always arrive in the same shape: a task's `volunteerId` can be
//! the bare id, or an embedded copy of the volunteer carrying the id under `_id`.
//! Numeric-looking ids may also arrive as JSON numbers. Everything that compares
//! ids goes through [`resolve_id`] so these shapes never leak into call sites.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(transparent)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// Accepts `"abc"`, `42` and `{"$oid": "abc"}`.
struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string id, an integer id or an {\"$oid\": ...} object")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
        Ok(RecordId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RecordId, E> {
        Ok(RecordId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RecordId, A::Error> {
        let mut oid = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "$oid" {
                oid = Some(map.next_value::<String>()?);
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }
        oid.map(RecordId).ok_or_else(|| de::Error::missing_field("$oid"))
    }
}

/// A reference to another record, either by bare id or as an embedded copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Reference {
    Bare(RecordId),
    Embedded(EmbeddedRecord),
}

/// The subset of an embedded record the portal cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmbeddedRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Extracts the identifier from either reference shape.
pub fn resolve_id(reference: &Reference) -> &RecordId {
    match reference {
        Reference::Bare(id) => id,
        Reference::Embedded(record) => &record.id,
    }
}

impl Reference {
    pub fn id(&self) -> &RecordId {
        resolve_id(self)
    }

    /// Display name carried by an embedded record, if any.
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            Reference::Bare(_) => None,
            Reference::Embedded(record) => record.name.as_deref(),
        }
    }

    pub fn points_to(&self, id: &RecordId) -> bool {
        resolve_id(self) == id
    }
}

impl From<RecordId> for Reference {
    fn from(id: RecordId) -> Self {
        Reference::Bare(id)
    }
}

impl From<&str> for Reference {
    fn from(id: &str) -> Self {
        Reference::Bare(RecordId::new(id))
    }
}
