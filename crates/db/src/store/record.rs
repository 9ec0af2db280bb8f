//! The untyped record representation shared by all store implementations.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StoreError;

/// A stored record: server-assigned id, timestamps, and the flattened data
/// fields. Typed models are decoded from this via [`RawRecord::decode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(with = "backend_datetime")]
    pub created: DateTime<Utc>,
    #[serde(with = "backend_datetime")]
    pub updated: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// Decode into a typed model. The model sees `id`, `created`, `updated`,
    /// and every data field as one flat object.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Look up a field by name for filter evaluation and sorting. The id and
    /// timestamps are addressable like data fields.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "created" => Some(Value::String(self.created.to_rfc3339())),
            "updated" => Some(Value::String(self.updated.to_rfc3339())),
            other => self.fields.get(other).cloned(),
        }
    }
}

/// Parse a timestamp in either RFC 3339 or the backend's space-separated
/// `YYYY-MM-DD HH:MM:SS[.fff][Z]` form (both are treated as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let trimmed = raw.trim_end_matches('Z');
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Serde adapter for record timestamps: serializes RFC 3339, accepts both
/// RFC 3339 and the backend's space-separated form on input.
mod backend_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-05-01T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-05-01 10:30:00.123Z").is_some());
        assert!(parse_timestamp("2024-05-01 10:30:00").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_record_json_round_trip() {
        let json = serde_json::json!({
            "id": "abc123",
            "created": "2024-05-01 10:30:00.123Z",
            "updated": "2024-05-01T10:31:00Z",
            "nome": "Matriz",
        });
        let record: RawRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.fields["nome"], "Matriz");

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["nome"], "Matriz");
        assert_eq!(back["id"], "abc123");
    }

    #[test]
    fn test_field_lookup_covers_meta_fields() {
        let record: RawRecord = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-01T00:00:00Z",
            "codigo": "ABC",
        }))
        .unwrap();
        assert_eq!(record.field("id").unwrap(), "r1");
        assert_eq!(record.field("codigo").unwrap(), "ABC");
        assert!(record.field("created").is_some());
        assert!(record.field("missing").is_none());
    }
}
