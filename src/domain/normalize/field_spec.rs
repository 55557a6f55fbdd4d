use serde_json::Value;

use crate::domain::common::model::{CellValue, NormalizedRow};
use crate::domain::normalize::raw_record::{lookup, present, RawRecord};

/// A logical column and where its value may live in a raw item.
///
/// `keys` are aliases in priority order; `fallback` keys are only consulted
/// once every alias has missed in every location.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub column: &'static str,
    pub keys: &'static [&'static str],
    pub fallback: &'static [&'static str],
}

impl FieldSpec {
    pub const fn new(column: &'static str, keys: &'static [&'static str]) -> Self {
        Self {
            column,
            keys,
            fallback: &[],
        }
    }

    pub const fn with_fallback(mut self, fallback: &'static [&'static str]) -> Self {
        self.fallback = fallback;
        self
    }
}

/// One place a value can come from.
pub type Lookup = fn(&RawRecord<'_>, &str) -> Option<Value>;

/// Locations searched for every alias, in this order. Changing the order
/// changes what is displayed.
pub const LOOKUP_ORDER: [(&str, Lookup); 3] = [
    ("attributes", from_attributes),
    ("custom", from_custom),
    ("tags", from_tags),
];

/// `attributes.<key>`
pub fn from_attributes(record: &RawRecord<'_>, key: &str) -> Option<Value> {
    record.attribute(key).and_then(present).cloned()
}

/// `attributes.custom.<key>`, then the `attributes.attributes` bag.
pub fn from_custom(record: &RawRecord<'_>, key: &str) -> Option<Value> {
    ["custom", "attributes"].iter().find_map(|bag| {
        record
            .attributes()
            .and_then(|attrs| attrs.get(*bag))
            .and_then(|b| bag_lookup(b, key))
    })
}

/// `attributes.tags`, as `"key:value"` strings, `{key, value}` objects or a map.
pub fn from_tags(record: &RawRecord<'_>, key: &str) -> Option<Value> {
    record
        .attributes()
        .and_then(|attrs| attrs.get("tags"))
        .and_then(|tags| bag_lookup(tags, key))
}

/// Fallback keys, read from `attributes` and then from the item root.
pub fn from_fallback(record: &RawRecord<'_>, key: &str) -> Option<Value> {
    from_attributes(record, key).or_else(|| record.at_root(key).and_then(present).cloned())
}

/// Finds `key` in a map, or in a list of `{key, value}` objects, plain
/// objects or `"key:value"` strings (split on the first `:`).
fn bag_lookup(bag: &Value, key: &str) -> Option<Value> {
    match bag {
        Value::Object(map) => lookup(map, key).and_then(present).cloned(),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => {
                let (k, v) = s.split_once(':')?;
                (k.trim() == key)
                    .then(|| Value::String(v.trim().to_string()))
                    .and_then(|v| present(&v).cloned())
            }
            Value::Object(obj) => match (obj.get("key"), obj.get("value")) {
                (Some(Value::String(k)), Some(v)) => {
                    (k == key).then(|| present(v).cloned()).flatten()
                }
                _ => lookup(obj, key).and_then(present).cloned(),
            },
            _ => None,
        }),
        _ => None,
    }
}

/// Raw JSON for `field`: each alias through [`LOOKUP_ORDER`], then the
/// fallback keys. `None` when nothing yields a value.
pub fn resolve(record: &RawRecord<'_>, field: &FieldSpec) -> Option<Value> {
    field
        .keys
        .iter()
        .find_map(|key| LOOKUP_ORDER.iter().find_map(|(_, find)| find(record, key)))
        .or_else(|| field.fallback.iter().find_map(|key| from_fallback(record, key)))
}

pub fn normalize(record: &RawRecord<'_>, field: &FieldSpec) -> Option<CellValue> {
    resolve(record, field).and_then(|v| to_cell(&v))
}

pub fn normalize_row(record: &RawRecord<'_>, fields: &[FieldSpec]) -> NormalizedRow {
    let mut row = NormalizedRow::new();
    for field in fields {
        row.set(field.column, normalize(record, field));
    }
    row
}

/// Strings stay text, numbers stay numeric, string lists are comma-joined
/// and anything else is shown as compact JSON.
pub fn to_cell(value: &Value) -> Option<CellValue> {
    match present(value)? {
        Value::String(s) => Some(CellValue::Text(s.clone())),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::Bool(b) => Some(CellValue::Text(b.to_string())),
        Value::Array(items) if items.iter().all(Value::is_string) => Some(CellValue::Text(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )),
        other => Some(CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const METHOD: FieldSpec =
        FieldSpec::new("method", &["http_method"]).with_fallback(&["operation_name"]);

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    #[test]
    fn custom_takes_precedence_over_tags() {
        let item = json!({"attributes": {
            "custom": {"http_method": "GET"},
            "tags": ["http_method:POST"],
        }});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), text("GET"));
    }

    #[test]
    fn top_level_attribute_comes_first() {
        let item = json!({"attributes": {
            "http_method": "PUT",
            "custom": {"http_method": "GET"},
        }});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), text("PUT"));
    }

    #[test]
    fn tags_split_on_first_colon() {
        let item = json!({"attributes": {"tags": ["env:prd", "http_method:POST:x"]}});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), text("POST:x"));
    }

    #[test]
    fn tags_as_key_value_objects_and_maps() {
        let objects = json!({"attributes": {"tags": [{"key": "http_method", "value": "DELETE"}]}});
        assert_eq!(normalize(&RawRecord::new(&objects), &METHOD), text("DELETE"));

        let map = json!({"attributes": {"tags": {"http_method": "PATCH"}}});
        assert_eq!(normalize(&RawRecord::new(&map), &METHOD), text("PATCH"));
    }

    #[test]
    fn fallback_field_is_last_resort() {
        let item = json!({"attributes": {"operation_name": "rack.request"}});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), text("rack.request"));

        let both = json!({"attributes": {
            "operation_name": "rack.request",
            "tags": ["http_method:GET"],
        }});
        assert_eq!(normalize(&RawRecord::new(&both), &METHOD), text("GET"));
    }

    #[test]
    fn nothing_found_is_none() {
        let item = json!({"attributes": {"custom": {}, "tags": []}});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), None);
        assert_eq!(normalize(&RawRecord::new(&json!(null)), &METHOD), None);
    }

    #[test]
    fn empty_values_fall_through() {
        let item = json!({"attributes": {
            "http_method": "",
            "custom": {"http_method": null},
            "tags": ["http_method:GET"],
        }});
        assert_eq!(normalize(&RawRecord::new(&item), &METHOD), text("GET"));
    }

    #[test]
    fn nested_attributes_bag_is_searched() {
        let field = FieldSpec::new("status", &["http.status_code"]);
        let item = json!({"attributes": {"attributes": {"http": {"status_code": 502}}}});
        assert_eq!(
            normalize(&RawRecord::new(&item), &field),
            Some(CellValue::Number(502.0))
        );
    }

    #[test]
    fn each_location_is_pure() {
        let item = json!({"attributes": {"custom": {"k": "c"}, "tags": ["k:t"], "k": "a"}});
        let record = RawRecord::new(&item);
        assert_eq!(from_attributes(&record, "k"), Some(json!("a")));
        assert_eq!(from_custom(&record, "k"), Some(json!("c")));
        assert_eq!(from_tags(&record, "k"), Some(json!("t")));
    }

    #[test]
    fn string_lists_are_joined() {
        assert_eq!(to_cell(&json!(["env:prd", "team:core"])), text("env:prd, team:core"));
        assert_eq!(to_cell(&json!(true)), text("true"));
        assert_eq!(to_cell(&json!([])), None);
    }
}
