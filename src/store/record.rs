//! Persisted record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open mapping of domain attributes carried by a record.
///
/// Values are semantically opaque to the store; validation (required
/// `name`, optional `description`/`price`) is the transport layer's job.
pub type FieldMap = serde_json::Map<String, Value>;

/// A single persisted item.
///
/// Domain fields are flattened into the record's JSON object, so the
/// on-disk shape is flat: `{"id": 1, "name": "...", ..., "created_at": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Store-assigned id, strictly positive, never reused
    pub id: u64,

    /// Domain attributes (everything that is not id or a timestamp)
    #[serde(flatten)]
    pub fields: FieldMap,

    /// Set once at create time, immutable afterwards
    pub created_at: DateTime<Utc>,

    /// Bumped on every successful update
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Build a fresh record with both timestamps set to `now`.
    pub fn new(id: u64, fields: FieldMap, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge each present key of `partial` over the existing fields.
    ///
    /// Keys absent from `partial` are left untouched. Timestamps are the
    /// caller's responsibility.
    pub fn merge_fields(&mut self, partial: &FieldMap) {
        for (key, value) in partial {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::new(
            1,
            fields(&[("name", json!("Widget")), ("price", json!(9.99))]),
            Utc::now(),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Widget");
        assert_eq!(value["price"], 9.99);
        assert!(value["created_at"].is_string());
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn test_record_roundtrips_unknown_fields() {
        let json = r#"{
            "id": 3,
            "name": "Gadget",
            "color": "red",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.fields["name"], "Gadget");
        assert_eq!(record.fields["color"], "red");
        assert!(record.updated_at > record.created_at);
    }

    #[test]
    fn test_merge_fields_leaves_absent_keys() {
        let mut record = Record::new(
            1,
            fields(&[("name", json!("Widget")), ("price", json!(9.99))]),
            Utc::now(),
        );

        record.merge_fields(&fields(&[("price", json!(12.0))]));

        assert_eq!(record.fields["name"], "Widget");
        assert_eq!(record.fields["price"], 12.0);
    }
}
