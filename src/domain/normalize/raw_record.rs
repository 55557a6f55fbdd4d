use serde_json::{Map, Value};

/// Borrowed view over one item of an API response.
///
/// JSON:API items keep their fields under `attributes`; v1 items are flat.
/// `attributes()` hides that difference.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    value: &'a Value,
}

impl<'a> RawRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn attributes(&self) -> Option<&'a Map<String, Value>> {
        match self.value.get("attributes") {
            Some(Value::Object(attrs)) => Some(attrs),
            _ => self.value.as_object(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&'a Value> {
        self.attributes().and_then(|attrs| lookup(attrs, key))
    }

    /// Path lookup from the item root rather than from `attributes`.
    pub fn at_root(&self, key: &str) -> Option<&'a Value> {
        self.value.as_object().and_then(|root| lookup(root, key))
    }
}

/// Dotted keys are tried as a flat key first (`"http.method"`), then as a
/// nested path (`http` → `method`).
pub fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(v) = map.get(key) {
        return Some(v);
    }
    let (head, rest) = key.split_once('.')?;
    match map.get(head)? {
        Value::Object(inner) => lookup(inner, rest),
        _ => None,
    }
}

/// Items of a list response (`data: [...]`). Other shapes yield nothing.
pub fn data_items(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Null, empty strings and empty containers count as absent.
pub fn present(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_key_wins_over_nested_path() {
        let v = json!({"http.method": "GET", "http": {"method": "POST"}});
        let map = v.as_object().unwrap();
        assert_eq!(lookup(map, "http.method"), Some(&json!("GET")));

        let nested = json!({"http": {"status_code": 502}});
        assert_eq!(
            lookup(nested.as_object().unwrap(), "http.status_code"),
            Some(&json!(502))
        );
    }

    #[test]
    fn flat_items_are_their_own_attributes() {
        let monitor = json!({"id": 7, "name": "cpu"});
        let record = RawRecord::new(&monitor);
        assert_eq!(record.attribute("name"), Some(&json!("cpu")));

        let span = json!({"id": "x", "attributes": {"service": "api"}});
        assert_eq!(RawRecord::new(&span).attribute("service"), Some(&json!("api")));
        assert_eq!(RawRecord::new(&span).attribute("id"), None);
    }

    #[test]
    fn list_items_only_from_data_arrays() {
        assert_eq!(data_items(&json!({"data": [1, 2]})).len(), 2);
        assert!(data_items(&json!({"data": {"id": 1}})).is_empty());
        assert!(data_items(&json!(null)).is_empty());
    }

    #[test]
    fn blanks_are_absent() {
        assert!(present(&json!(null)).is_none());
        assert!(present(&json!("  ")).is_none());
        assert!(present(&json!(0)).is_some());
    }
}
