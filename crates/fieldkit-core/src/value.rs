//! Dynamically-typed field values held by the field value store.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::temporal::{XDate, XTime};

/// The value a field writes into its reactive cell.
///
/// Serializes to plain JSON: `Null` as `null`, dates as `[y, m, d]`, times as
/// `[h, m]`, date-times as ISO-8601 strings, and `Json` values verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An explicit "nothing selected" value, distinct from a never-written cell.
    Null,
    Text(String),
    Bool(bool),
    Date(XDate),
    Time(XTime),
    DateTime(NaiveDateTime),
    /// Arbitrary structured data, e.g. a selected auto-complete suggestion.
    Json(serde_json::Value),
}

impl FieldValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<XDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<XTime> {
        match self {
            Self::Time(time) => Some(*time),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(instant) => Some(*instant),
            _ => None,
        }
    }

    /// Short name of the variant, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::Json(_) => "json",
        }
    }

    /// JSON rendering of this value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<XDate> for FieldValue {
    fn from(date: XDate) -> Self {
        Self::Date(date)
    }
}

impl From<XTime> for FieldValue {
    fn from(time: XTime) -> Self {
        Self::Time(time)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(instant: NaiveDateTime) -> Self {
        Self::DateTime(instant)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn serializes_untagged() {
        assert_eq!(FieldValue::Null.to_json(), json!(null));
        assert_eq!(FieldValue::from("x").to_json(), json!("x"));
        assert_eq!(FieldValue::from(true).to_json(), json!(true));
        assert_eq!(
            FieldValue::from(XDate::new(2025, 2, 19)).to_json(),
            json!([2025, 2, 19])
        );
        assert_eq!(FieldValue::from(XTime::new(9, 5)).to_json(), json!([9, 5]));
        let instant = NaiveDate::from_ymd_opt(2025, 3, 19)
            .and_then(|d| d.and_hms_opt(12, 30, 0))
            .unwrap();
        assert_eq!(
            FieldValue::from(instant).to_json(),
            json!("2025-03-19T12:30:00")
        );
        assert_eq!(
            FieldValue::from(json!({"id": 3})).to_json(),
            json!({"id": 3})
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
        assert_eq!(
            FieldValue::from(Some("Gent".to_string())),
            FieldValue::Text("Gent".into())
        );
    }

    #[test]
    fn accessors_match_variant() {
        let v = FieldValue::from(XTime::new(12, 30));
        assert_eq!(v.as_time(), Some(XTime::new(12, 30)));
        assert_eq!(v.as_text(), None);
        assert_eq!(v.kind(), "time");
        assert!(FieldValue::Null.is_null());
    }
}
