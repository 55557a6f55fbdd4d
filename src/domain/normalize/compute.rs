//! Aggregate (`/analytics/aggregate`) response readers.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Buckets from `data.attributes.buckets`, a `data` list, or top-level
/// `attributes.buckets`. Anything else yields no buckets.
pub fn extract_buckets(response: &Value) -> &[Value] {
    let buckets = match response.get("data") {
        Some(Value::Object(data)) => data.get("attributes").and_then(|a| a.get("buckets")),
        Some(Value::Array(items)) => return items,
        _ => response.get("attributes").and_then(|a| a.get("buckets")),
    };
    buckets.and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Buckets are either JSON:API items or bare objects.
fn bucket_body(bucket: &Value) -> Option<&Map<String, Value>> {
    match bucket.get("attributes") {
        Some(Value::Object(attrs)) => Some(attrs),
        _ => bucket.as_object(),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `compute.c0`, else the legacy `computes[0].value`.
pub fn count(bucket: &Value) -> Option<f64> {
    let body = bucket_body(bucket)?;
    body.get("compute")
        .and_then(|c| c.get("c0"))
        .and_then(as_number)
        .or_else(|| {
            body.get("computes")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("value"))
                .and_then(as_number)
        })
}

/// Group-by key of a bucket (`by.<facet>`), rendered as text.
pub fn bucket_key(bucket: &Value, facet: &str) -> Option<String> {
    let value = bucket_body(bucket)?.get("by")?.get(facet)?;
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `cN` values of one compute holder, from the `compute` map or the
/// positional `computes` list.
fn computes_of(body: &Map<String, Value>) -> BTreeMap<String, f64> {
    if let Some(Value::Object(compute)) = body.get("compute") {
        let values: BTreeMap<String, f64> = compute
            .iter()
            .filter_map(|(k, v)| as_number(v).map(|n| (k.clone(), n)))
            .collect();
        if !values.is_empty() {
            return values;
        }
    }
    body.get("computes")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .enumerate()
                .filter_map(|(i, entry)| {
                    entry
                        .get("value")
                        .and_then(as_number)
                        .map(|n| (format!("c{}", i), n))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Totals of an ungrouped aggregate: the first bucket, else the
/// attributes of `data` or of the response itself.
pub fn compute_values(response: &Value) -> BTreeMap<String, f64> {
    if let Some(first) = extract_buckets(response).first() {
        let values = bucket_body(first).map(computes_of).unwrap_or_default();
        if !values.is_empty() {
            return values;
        }
    }

    let attrs = match response.get("data") {
        Some(Value::Object(data)) => data.get("attributes"),
        _ => response.get("attributes"),
    };
    attrs
        .and_then(Value::as_object)
        .map(computes_of)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_prefers_c0() {
        let bucket = json!({"compute": {"c0": 12}, "computes": [{"value": 99}]});
        assert_eq!(count(&bucket), Some(12.0));
    }

    #[test]
    fn count_falls_back_to_legacy_computes() {
        let bucket = json!({"attributes": {"computes": [{"value": 7}]}});
        assert_eq!(count(&bucket), Some(7.0));
        assert_eq!(count(&json!({"by": {}})), None);
    }

    #[test]
    fn buckets_from_every_known_location() {
        let nested = json!({"data": {"attributes": {"buckets": [{"a": 1}, {"a": 2}]}}});
        assert_eq!(extract_buckets(&nested).len(), 2);

        let listed = json!({"data": [{"a": 1}]});
        assert_eq!(extract_buckets(&listed).len(), 1);

        let top = json!({"attributes": {"buckets": [{"a": 1}]}});
        assert_eq!(extract_buckets(&top).len(), 1);

        assert!(extract_buckets(&json!("oops")).is_empty());
        assert!(extract_buckets(&json!({"data": {"attributes": {"buckets": "x"}}})).is_empty());
    }

    #[test]
    fn bucket_keys_by_facet() {
        let bucket = json!({"attributes": {"by": {"resource_name": "GET /cart", "http.status_code": 500}}});
        assert_eq!(bucket_key(&bucket, "resource_name").as_deref(), Some("GET /cart"));
        assert_eq!(bucket_key(&bucket, "http.status_code").as_deref(), Some("500"));
        assert_eq!(bucket_key(&bucket, "env"), None);
    }

    #[test]
    fn totals_from_first_bucket_or_attributes() {
        let bucketed = json!({"data": [{"type": "bucket", "attributes": {"compute": {"c0": 1200, "c1": 350000000.0}}}]});
        let totals = compute_values(&bucketed);
        assert_eq!(totals.get("c0"), Some(&1200.0));
        assert_eq!(totals.get("c1"), Some(&350_000_000.0));

        let flat = json!({"data": {"attributes": {"computes": [{"value": 5}, {"value": 2.5}]}}});
        let totals = compute_values(&flat);
        assert_eq!(totals.get("c0"), Some(&5.0));
        assert_eq!(totals.get("c1"), Some(&2.5));

        assert!(compute_values(&json!({})).is_empty());
    }
}
