//! # Canonical Encoding
//!
//! The deterministic serialization every signature and identifier in the
//! ledger depends on. Two independently-built transactions with the same
//! logical content MUST encode to the same bytes, or their identifiers and
//! signatures will not interoperate across implementations.
//!
//! The rules, fixed once and treated as part of the wire format:
//!
//! - Object keys are emitted in ascending byte order, regardless of the
//!   order they were inserted in.
//! - Compact separators: `,` and `:` with no insignificant whitespace.
//! - Strings are JSON-escaped but non-ASCII characters pass through as
//!   UTF-8, not `\uXXXX` escapes.
//! - Every number in the wire model is an integer. Timestamps are
//!   string-encoded unix seconds; amounts, versions, fids and cids are
//!   plain JSON integers. Floats never appear in a transaction, so float
//!   formatting is not part of the contract.
//!
//! The writer is hand-rolled over [`serde_json::Value`] rather than
//! delegating to `serde_json::to_string`, so key ordering is enforced here
//! explicitly instead of depending on which map type serde_json was
//! compiled with.

use serde_json::Value;

/// Serialize a JSON value into its canonical string form.
///
/// Deterministic: identical logical content always yields an identical
/// string, independent of construction order.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use opal_ledger::canonical::serialize;
///
/// let a = serialize(&json!({"b": 1, "a": 2}));
/// let b = serialize(&json!({"a": 2, "b": 1}));
/// assert_eq!(a, b);
/// assert_eq!(a, r#"{"a":2,"b":1}"#);
/// ```
pub fn serialize(value: &Value) -> String {
    let mut out = String::with_capacity(256);
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Sort keys by byte order. serde_json's default map is already
            // a BTreeMap, but the ordering is enforced here so enabling
            // `preserve_order` elsewhere in a workspace cannot change the
            // wire format.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(&map[key], out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            // Non-ASCII passes through as UTF-8.
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted() {
        let v = json!({"zebra": 1, "apple": 2, "mango": 3});
        assert_eq!(serialize(&v), r#"{"apple":2,"mango":3,"zebra":1}"#);
    }

    #[test]
    fn nested_keys_are_sorted() {
        let v = json!({"outer": {"b": {"d": 1, "c": 2}, "a": 3}});
        assert_eq!(serialize(&v), r#"{"outer":{"a":3,"b":{"c":2,"d":1}}}"#);
    }

    #[test]
    fn no_insignificant_whitespace() {
        let v = json!({"a": [1, 2, 3], "b": {"c": null}});
        let s = serialize(&v);
        assert!(!s.contains(' '));
        assert_eq!(s, r#"{"a":[1,2,3],"b":{"c":null}}"#);
    }

    #[test]
    fn construction_order_is_irrelevant() {
        let mut first = serde_json::Map::new();
        first.insert("x".to_string(), json!(1));
        first.insert("a".to_string(), json!(2));

        let mut second = serde_json::Map::new();
        second.insert("a".to_string(), json!(2));
        second.insert("x".to_string(), json!(1));

        assert_eq!(
            serialize(&Value::Object(first)),
            serialize(&Value::Object(second))
        );
    }

    #[test]
    fn array_order_is_preserved() {
        // Arrays are ordered content — only object keys get sorted.
        let v = json!([3, 1, 2]);
        assert_eq!(serialize(&v), "[3,1,2]");
    }

    #[test]
    fn scalars() {
        assert_eq!(serialize(&json!(null)), "null");
        assert_eq!(serialize(&json!(true)), "true");
        assert_eq!(serialize(&json!(false)), "false");
        assert_eq!(serialize(&json!(42)), "42");
        assert_eq!(serialize(&json!(0)), "0");
        assert_eq!(serialize(&json!("hello")), r#""hello""#);
    }

    #[test]
    fn large_integers_are_exact() {
        assert_eq!(serialize(&json!(u64::MAX)), u64::MAX.to_string());
    }

    #[test]
    fn string_escapes() {
        assert_eq!(serialize(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(serialize(&json!("a\\b")), r#""a\\b""#);
        assert_eq!(serialize(&json!("line\nbreak")), r#""line\nbreak""#);
        assert_eq!(serialize(&json!("\u{01}")), "\"\\u0001\"");
    }

    #[test]
    fn non_ascii_passes_through() {
        // ensure_ascii=False semantics: UTF-8 output, no \uXXXX for
        // printable non-ASCII.
        assert_eq!(serialize(&json!("héllo wörld")), "\"héllo wörld\"");
        assert_eq!(serialize(&json!("日本語")), "\"日本語\"");
    }

    #[test]
    fn empty_containers() {
        assert_eq!(serialize(&json!({})), "{}");
        assert_eq!(serialize(&json!([])), "[]");
    }
}
