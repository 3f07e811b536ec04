//! JSON body decoding with an optional key rewrite.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// How object keys on the wire are matched against struct field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDecoding {
    /// Keys must match the declared names exactly.
    #[default]
    UseDefaultKeys,
    /// `snake_case` keys are rewritten to `camelCase` at every depth before
    /// decoding. Keys already in camelCase are left alone.
    ConvertFromSnakeCase,
}

/// Decode `body` as `T`.
///
/// An empty body is a decode error like any other malformed input.
pub fn decode<T: DeserializeOwned>(body: &[u8], keys: KeyDecoding) -> Result<T, serde_json::Error> {
    match keys {
        KeyDecoding::UseDefaultKeys => serde_json::from_slice(body),
        KeyDecoding::ConvertFromSnakeCase => {
            let value: Value = serde_json::from_slice(body)?;
            serde_json::from_value(convert_keys(value))
        }
    }
}

fn convert_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (convert_from_snake_case(&key), convert_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(convert_keys).collect()),
        other => other,
    }
}

/// `trace_id` -> `traceId`, `_menu_BILLER_id_` -> `_menuBillerId_`.
///
/// Leading and trailing underscores are preserved. A key with no inner
/// underscore is returned unchanged.
pub fn convert_from_snake_case(key: &str) -> String {
    let core = key.trim_matches('_');
    if !core.contains('_') {
        return key.to_string();
    }
    let leading = key.len() - key.trim_start_matches('_').len();
    let trailing = key.len() - key.trim_end_matches('_').len();

    let mut words = core.split('_').filter(|w| !w.is_empty());
    let Some(first) = words.next() else {
        return key.to_string();
    };

    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..leading]);
    out.push_str(&first.to_lowercase());
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(&key[key.len() - trailing..]);
    out
}
