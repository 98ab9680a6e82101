//! Deformation event identity types.
//!
//! Faults and folds carry the integer feature id of the source map layer.
//! Lookups accept either that id or the event name, wrapped in [`EventKey`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Event id from the source map (`ID` column).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId(id)
    }
}

/// Lookup key for a fault or fold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    Id(EventId),
    Name(String),
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Id(id) => write!(f, "id {}", id),
            EventKey::Name(name) => write!(f, "name {:?}", name),
        }
    }
}

impl From<EventId> for EventKey {
    fn from(id: EventId) -> Self {
        EventKey::Id(id)
    }
}

impl From<i64> for EventKey {
    fn from(id: i64) -> Self {
        EventKey::Id(EventId(id))
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        EventKey::Name(name.to_string())
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        EventKey::Name(name)
    }
}

impl TryFrom<&serde_json::Value> for EventKey {
    type Error = Error;

    /// Integers become ids, strings become names. Anything else is an
    /// unsupported identifier type.
    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(id) => Ok(EventKey::Id(EventId(id))),
                None => Err(Error::UnsupportedIdentifier {
                    kind: if n.is_f64() { "float" } else { "integer out of range" }.to_string(),
                }),
            },
            serde_json::Value::String(s) => Ok(EventKey::Name(s.clone())),
            other => Err(Error::UnsupportedIdentifier {
                kind: json_kind(other).to_string(),
            }),
        }
    }
}

/// Short type name of a JSON value, for diagnostics.
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_id_is_transparent() {
        let id = EventId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: EventId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn key_from_json_integer_and_string() {
        assert_eq!(
            EventKey::try_from(&json!(7)).unwrap(),
            EventKey::Id(EventId(7))
        );
        assert_eq!(
            EventKey::try_from(&json!("F1")).unwrap(),
            EventKey::Name("F1".to_string())
        );
    }

    #[test]
    fn key_from_unsupported_json_is_type_error() {
        for value in [json!(1.5), json!(true), json!(null), json!([1]), json!({"id": 1})] {
            let err = EventKey::try_from(&value).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedIdentifier { .. }),
                "unexpected error for {}: {:?}",
                value,
                err
            );
        }
    }

    #[test]
    fn key_display() {
        assert_eq!(EventKey::from(3).to_string(), "id 3");
        assert_eq!(EventKey::from("F1").to_string(), "name \"F1\"");
    }
}
