use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An entity id as it arrives over the wire.
///
/// The transport layer does not guarantee numeric ids stay numbers: query
/// parameters are strings, and JSON payloads may carry either. Comparisons
/// in the services coerce both sides to `i64`, so this type accepts a JSON
/// number or a numeric string and always exposes the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumericId(pub i64);

impl NumericId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for NumericId {
    fn from(id: i64) -> Self {
        NumericId(id)
    }
}

impl fmt::Display for NumericId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NumericId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct NumericIdVisitor;

impl<'de> Visitor<'de> for NumericIdVisitor {
    type Value = NumericId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(NumericId)
            .map_err(|_| E::custom("id out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse::<i64>()
            .map(NumericId)
            .map_err(|_| E::custom(format!("invalid numeric id: {:?}", v)))
    }
}

impl<'de> Deserialize<'de> for NumericId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        let id: NumericId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.value(), 42);

        let id: NumericId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_rejects_non_numeric_strings() {
        assert!(serde_json::from_value::<NumericId>(json!("forty-two")).is_err());
        assert!(serde_json::from_value::<NumericId>(json!(null)).is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_value(NumericId(7)).unwrap(), json!(7));
    }
}
