//! Common serde helpers for SurrealDB record ids
//!
//! Record ids are exposed to the API as `"table:id"` strings while the
//! database returns them in native form; both shapes deserialize here.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Accepts either a `"table:id"` string or a native RecordId value
#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Native(RecordId),
    Text(String),
}

impl IdInput {
    fn into_record_id<E: serde::de::Error>(self) -> Result<RecordId, E> {
        match self {
            IdInput::Native(id) => Ok(id),
            IdInput::Text(s) => s
                .parse::<RecordId>()
                .map_err(|_| E::custom(format!("invalid record id: {s}"))),
        }
    }
}

/// RecordId serialization as a "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        IdInput::deserialize(d)?.into_record_id()
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<IdInput>::deserialize(d)? {
            Some(input) => input.into_record_id().map(Some),
            None => Ok(None),
        }
    }
}
