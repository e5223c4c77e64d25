//! [`Record`] impls for dynamic JSON records.
//!
//! Records fetched from a REST backend are plain JSON objects. Field lookup
//! tries the exact key first, then a dotted path (`seller.name`) through
//! nested objects. Arrays, objects and nulls are not flat values and read
//! as [`Value::None`].

use serde_json::{Map, Value as Json};

use crate::traits::Record;
use crate::value::{Number, Value};

impl Record for Map<String, Json> {
    fn field_value(&self, field: &str) -> Value<'_> {
        lookup(self, field).map(json_value).unwrap_or(Value::None)
    }
}

impl Record for Json {
    fn field_value(&self, field: &str) -> Value<'_> {
        match self {
            Json::Object(map) => map.field_value(field),
            _ => Value::None,
        }
    }
}

fn lookup<'a>(map: &'a Map<String, Json>, field: &str) -> Option<&'a Json> {
    if let Some(v) = map.get(field) {
        return Some(v);
    }
    let mut parts = field.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Converts a flat JSON value into a [`Value`].
pub fn json_value(v: &Json) -> Value<'_> {
    match v {
        Json::String(s) => Value::Text(s),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map(|f| Value::Number(Number::F64(f)))
                    .unwrap_or(Value::None)
            }
        }
        Json::Null | Json::Array(_) | Json::Object(_) => Value::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_fields() {
        let rec = json!({"name": "Rice", "qty": 5, "price": "20", "active": true, "note": null});
        assert_eq!(rec.field_value("name"), Value::Text("Rice"));
        assert_eq!(rec.field_value("qty"), Value::Number(Number::I64(5)));
        assert_eq!(rec.field_value("price"), Value::Text("20"));
        assert_eq!(rec.field_value("active"), Value::Bool(true));
        assert_eq!(rec.field_value("note"), Value::None);
        assert_eq!(rec.field_value("missing"), Value::None);
    }

    #[test]
    fn dotted_paths() {
        let rec = json!({"seller": {"name": "Ana"}, "cart": [{"name": "Oil"}]});
        assert_eq!(rec.field_value("seller.name"), Value::Text("Ana"));
        assert_eq!(rec.field_value("seller.email"), Value::None);
        assert_eq!(rec.field_value("seller"), Value::None);
        assert_eq!(rec.field_value("cart"), Value::None);
    }

    #[test]
    fn exact_key_wins_over_path() {
        let rec = json!({"a.b": "flat", "a": {"b": "nested"}});
        assert_eq!(rec.field_value("a.b"), Value::Text("flat"));
    }

    #[test]
    fn non_object_records_are_empty() {
        assert_eq!(json!([1, 2]).field_value("0"), Value::None);
        assert_eq!(json!("text").field_value("name"), Value::None);
    }
}
