use serde::de::{self, Error as _};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub(crate) const TAG: &str = "type";

/// Split a JSON object into its `type` discriminator and the remaining fields
pub(crate) fn split_tag<E: de::Error>(value: Value) -> Result<(String, Map<String, Value>), E> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(E::custom(format_args!(
                "invalid type: {}, expected a tagged object",
                kind_of(&other)
            )))
        }
    };

    match fields.remove(TAG) {
        Some(Value::String(tag)) => Ok((tag, fields)),
        Some(other) => Err(E::custom(format_args!(
            "invalid type: {}, expected a string discriminator in `{}`",
            kind_of(&other),
            TAG
        ))),
        None => Err(E::missing_field(TAG)),
    }
}

/// Serialize `body` as a map with the `type` discriminator written first
pub(crate) fn serialize_tagged<S, T>(serializer: S, tag: &str, body: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(body).map_err(S::Error::custom)? {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            return Err(S::Error::custom(format_args!(
                "tagged body must serialize to an object, got {}",
                kind_of(&other)
            )))
        }
    };

    let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
    map.serialize_entry(TAG, tag)?;
    for (key, value) in &fields {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Deserialize one tagged variant body, keeping serde's own error message
pub(crate) fn body<T, E>(fields: Map<String, Value>) -> Result<T, E>
where
    T: de::DeserializeOwned,
    E: de::Error,
{
    serde_json::from_value(Value::Object(fields)).map_err(E::custom)
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

