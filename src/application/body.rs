//! Body decoding. Failures here are local to one request and never escape the handler.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::borrow::Cow;

use crate::domain::errors::BodyError;

/// Indentation used when echoing a JSON body to the console.
pub const LOG_INDENT: &[u8] = b"      ";

pub fn decode_json(body: &[u8]) -> Result<Value, BodyError> {
    if body.is_empty() {
        return Err(BodyError::Empty);
    }
    serde_json::from_slice(body).map_err(|_| BodyError::InvalidJson)
}

pub fn decode_object(body: &[u8]) -> Result<Map<String, Value>, BodyError> {
    match decode_json(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(BodyError::NotAnObject),
    }
}

pub fn lossy_text(body: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(body)
}

/// Pretty-prints with [LOG_INDENT]; key order is kept as received.
pub fn pretty_json(value: &Value) -> String {
    let mut out = Vec::with_capacity(128);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(LOG_INDENT));

    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(out).unwrap_or_else(|e| lossy_text(e.as_bytes()).into_owned()),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds() {
        assert_eq!(decode_json(b""), Err(BodyError::Empty));
        assert_eq!(decode_json(b"not-json"), Err(BodyError::InvalidJson));
        assert_eq!(decode_object(b"[1, 2]"), Err(BodyError::NotAnObject));
        assert_eq!(decode_object(b"\"secret\""), Err(BodyError::NotAnObject));
    }

    #[test]
    fn success_object() {
        let map = decode_object(br#"{"password":"secret"}"#).unwrap();
        assert_eq!(map.get("password"), Some(&Value::from("secret")));
    }

    #[test]
    fn pretty_json_uses_six_spaces_and_keeps_order() {
        let value = decode_json(r#"{"z":1,"名前":"太郎","a":[true]}"#.as_bytes()).unwrap();
        let expected = "{\n      \"z\": 1,\n      \"名前\": \"太郎\",\n      \"a\": [\n            true\n      ]\n}";
        assert_eq!(pretty_json(&value), expected);
    }

    #[test]
    fn lossy_text_replaces_invalid_utf8() {
        assert_eq!(lossy_text(b"ok\xff"), "ok\u{fffd}");
    }
}
