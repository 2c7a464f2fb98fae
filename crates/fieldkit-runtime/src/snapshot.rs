//! Point-in-time view of every field value, handed to the submit handler.

use fieldkit_core::FieldValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered `name → value` pairs captured at submit time.
///
/// A field that was registered but never given a value appears with `None`
/// and serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<(String, Option<FieldValue>)>,
}

impl Snapshot {
    pub(crate) fn push(&mut self, name: String, value: Option<FieldValue>) {
        self.entries.push((name, value));
    }

    /// Value of `name`, or `None` when the field is unknown or has no value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_ref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_ref()))
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object rendering. Use `Serialize` directly to keep field order.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(key, value)| {
                let json = value
                    .as_ref()
                    .map_or(serde_json::Value::Null, FieldValue::to_json);
                (key.clone(), json)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_core::XDate;

    fn sample() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.push("phone".into(), Some("0499123456".into()));
        snapshot.push("birthday".into(), Some(XDate::new(2024, 1, 29).into()));
        snapshot.push("notes".into(), None);
        snapshot
    }

    #[test]
    fn lookups() {
        let snapshot = sample();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot.value("phone").and_then(FieldValue::as_text),
            Some("0499123456")
        );
        assert!(snapshot.contains("notes"));
        assert_eq!(snapshot.value("notes"), None);
        assert!(!snapshot.contains("missing"));
        assert_eq!(snapshot.names(), ["phone", "birthday", "notes"]);
    }

    #[test]
    fn serializes_in_order_with_nulls() {
        let json = serde_json::to_string(&sample()).expect("serializable");
        assert_eq!(
            json,
            r#"{"phone":"0499123456","birthday":[2024,1,29],"notes":null}"#
        );
    }

    #[test]
    fn to_json_matches_serialize() {
        let snapshot = sample();
        let direct = serde_json::to_value(&snapshot).expect("serializable");
        assert_eq!(snapshot.to_json(), direct);
    }
}
