use serde_json::Value;

use crate::internal::Entries;

/// The possible shapes of a backup handed to [decode]
#[derive(Debug)]
pub(crate) enum Snapshot<'a> {
    /// Nothing was found under the backup key
    Absent,
    /// The raw string read from durable storage
    Encoded(&'a str),
    /// A mapping that has already been decoded once
    Decoded(Entries),
}

impl<'a> From<Option<&'a str>> for Snapshot<'a> {
    fn from(raw: Option<&'a str>) -> Self {
        match raw {
            None => Snapshot::Absent,
            Some(raw) => Snapshot::Encoded(raw),
        }
    }
}

/// Decodes a backup into the entries of the store, skipping the `reserved_key`.
///
/// Values are tried as JSON one more time each, since they may have been
/// encoded individually before the container was. A value that does not parse
/// is kept as is. This never fails: a container that cannot be parsed, or
/// that is not an object, decodes to no entries at all.
pub(crate) fn decode(snapshot: Snapshot<'_>, reserved_key: &str) -> Entries {
    let entries = match snapshot {
        Snapshot::Absent => return Entries::default(),
        Snapshot::Encoded(raw) => match parse_container(raw) {
            Some(entries) => entries,
            None => return Entries::default(),
        },
        Snapshot::Decoded(entries) => entries,
    };

    entries
        .into_iter()
        .filter(|(k, _)| k != reserved_key)
        .map(|(k, v)| (k, parse_leniently(v)))
        .collect()
}

/// Encodes the entries of the store into the string written as a backup
pub(crate) fn encode(entries: &Entries) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Parses the backup container, unwrapping one extra level of string encoding
fn parse_container(raw: &str) -> Option<Entries> {
    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner),
        other => other,
    };

    match parsed {
        Ok(Value::Object(map)) => Some(map.into_iter().collect()),
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "backup is not an object, ignoring it");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "backup is not valid JSON, ignoring it");
            None
        }
    }
}

fn parse_leniently(value: Value) -> Value {
    match value {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const RESERVED_KEY: &str = "backup";

    #[test]
    fn decode_absent_gives_no_entries() {
        let got = decode(Snapshot::Absent, RESERVED_KEY);
        assert!(got.is_empty());
    }

    #[test]
    fn decode_skips_reserved_key() {
        let raw = json!({
            "name": "Obiora C.N",
            "backup": ["all the backup"],
            "id": "12hh133YY212"
        })
        .to_string();

        let got = decode(Snapshot::Encoded(&raw), RESERVED_KEY);

        assert_eq!(got.len(), 2);
        assert_eq!(got.get("name"), Some(&json!("Obiora C.N")));
        assert_eq!(got.get("id"), Some(&json!("12hh133YY212")));
        assert!(got.get(RESERVED_KEY).is_none());
    }

    #[test]
    fn decode_parses_individually_encoded_values() {
        let raw = json!({
            "technologies": "[\"Reactjs\",\"VueJs\"]",
            "yearsOfExperience": "3",
            "active": true
        })
        .to_string();

        let got = decode(Snapshot::Encoded(&raw), RESERVED_KEY);

        assert_eq!(got.get("technologies"), Some(&json!(["Reactjs", "VueJs"])));
        assert_eq!(got.get("yearsOfExperience"), Some(&json!(3)));
        assert_eq!(got.get("active"), Some(&json!(true)));
    }

    #[test]
    fn decode_keeps_values_that_fail_to_parse() {
        let raw = r#"{"greeting":"hello there","broken":"{not json"}"#;

        let got = decode(Snapshot::Encoded(raw), RESERVED_KEY);

        assert_eq!(got.get("greeting"), Some(&json!("hello there")));
        assert_eq!(got.get("broken"), Some(&json!("{not json")));
    }

    #[test]
    fn decode_unwraps_doubly_encoded_container() {
        let inner = json!({"name": "Obiora"}).to_string();
        let raw = serde_json::to_string(&inner).expect("encode twice");

        let got = decode(Snapshot::Encoded(&raw), RESERVED_KEY);

        assert_eq!(got.len(), 1);
        assert_eq!(got.get("name"), Some(&json!("Obiora")));
    }

    #[test]
    fn decode_malformed_or_non_object_gives_no_entries() {
        for raw in ["{oops", "[1, 2, 3]", "42", "null", ""] {
            let got = decode(Snapshot::Encoded(raw), RESERVED_KEY);
            assert!(got.is_empty(), "raw = {:?}, got = {:?}", raw, got);
        }
    }

    #[test]
    fn decode_already_decoded_entries() {
        let mut entries = Entries::default();
        entries.insert("count".to_string(), json!("7"));
        entries.insert(RESERVED_KEY.to_string(), json!("stale"));

        let got = decode(Snapshot::Decoded(entries), RESERVED_KEY);

        assert_eq!(got.len(), 1);
        assert_eq!(got.get("count"), Some(&json!(7)));
    }

    #[test]
    fn encode_then_decode_gives_same_entries() {
        let mut entries = Entries::default();
        entries.insert("name".to_string(), json!("Obiora N.C"));
        entries.insert("technologies".to_string(), json!(["Reactjs", "VueJs"]));
        entries.insert("profile".to_string(), json!({"years": 3, "remote": true}));

        let raw = encode(&entries).expect("encode entries");
        let got = decode(Snapshot::Encoded(&raw), RESERVED_KEY);

        assert_eq!(got, entries);
    }
}
