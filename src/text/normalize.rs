//! Unicode normalization and deterministic serialization
//!
//! Text is normalized to NFC before labeling so classifier offsets and
//! editor offsets agree on composed characters. Cache keys additionally need
//! a canonical serialization of the labeling policy: identical inputs must
//! produce byte-identical keys regardless of map insertion order.

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Normalize a string to NFC
pub fn normalize_nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Check whether a string is already NFC (quick-check)
pub fn is_nfc(text: &str) -> bool {
    unicode_normalization::is_nfc(text)
}

/// Serialize a JSON value with recursively sorted object keys.
///
/// `{"b":1,"a":2}` and `{"a":2,"b":1}` produce the same bytes.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                if let Some(child) = map.get(*key) {
                    write_canonical(child, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
