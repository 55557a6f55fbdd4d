use serde_json::{json, Value};

use crate::domain::common::model::TimeRange;
use crate::domain::common::service::time_expression::to_iso8601;
use crate::domain::query::query_params::QueryParams;
use crate::domain::query::query_spec::{Aggregation, QuerySpec};
use crate::errors::AppError;

/// Request shape expected by the target endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// `GET` with `filter[...]`/`page[...]` query parameters.
    GetParams,
    /// Plain JSON body: `{filter, page, sort}`.
    SearchBody,
    /// Same as `SearchBody` wrapped in a JSON:API `search_request`.
    JsonApiSearch,
    /// JSON:API `aggregate_request` with computes and optional group-by.
    Aggregate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Params(QueryParams),
    Body(Value),
}

impl RequestPayload {
    pub fn params(&self) -> &[(String, String)] {
        match self {
            RequestPayload::Params(p) => p.as_slice(),
            RequestPayload::Body(_) => &[],
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            RequestPayload::Params(_) => None,
            RequestPayload::Body(b) => Some(b),
        }
    }

    /// JSON view for debug dumps.
    pub fn to_value(&self) -> Value {
        match self {
            RequestPayload::Params(p) => Value::Object(
                p.as_slice()
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            RequestPayload::Body(b) => b.clone(),
        }
    }
}

pub fn build(
    spec: &QuerySpec,
    range: &TimeRange,
    shape: RequestShape,
) -> Result<RequestPayload, AppError> {
    let from = to_iso8601(range.start);
    let to = to_iso8601(range.end);
    let query = spec.search_string();

    let payload = match shape {
        RequestShape::GetParams => RequestPayload::Params(
            QueryParams::new()
                .push("filter[query]", Some(query))
                .push("filter[from]", Some(from))
                .push("filter[to]", Some(to))
                .push("page[limit]", spec.limit())
                .push("sort", spec.sort()),
        ),
        RequestShape::SearchBody => RequestPayload::Body(search_attributes(spec, from, to, query)),
        RequestShape::JsonApiSearch => RequestPayload::Body(json!({
            "data": {
                "type": "search_request",
                "attributes": search_attributes(spec, from, to, query),
            }
        })),
        RequestShape::Aggregate => {
            if !spec.has_filter() {
                return Err(AppError::MissingField(
                    "aggregate queries need at least one of --service, --env or --query".into(),
                ));
            }
            RequestPayload::Body(aggregate_body(spec, from, to, query))
        }
    };

    Ok(payload)
}

fn search_attributes(spec: &QuerySpec, from: String, to: String, query: String) -> Value {
    let mut attrs = json!({
        "filter": { "from": from, "to": to, "query": query },
    });
    if let Some(limit) = spec.limit() {
        attrs["page"] = json!({ "limit": limit });
    }
    if let Some(sort) = spec.sort() {
        attrs["sort"] = json!(sort);
    }
    attrs
}

/// The first compute is returned by the API as `c0`, the next as `c1`.
fn aggregate_body(spec: &QuerySpec, from: String, to: String, query: String) -> Value {
    let computes: Vec<Value> = if spec.computes().is_empty() {
        vec![Aggregation::Count.to_compute()]
    } else {
        spec.computes().iter().map(Aggregation::to_compute).collect()
    };

    let mut attrs = json!({
        "filter": { "from": from, "to": to, "query": query },
        "compute": computes,
    });

    if let Some(group) = spec.group_by() {
        attrs["group_by"] = json!([{
            "facet": group.facet,
            "limit": group.limit,
            "sort": { "type": "measure", "aggregation": "count", "order": "desc" },
        }]);
    }

    json!({ "data": { "type": "aggregate_request", "attributes": attrs } })
}

/// `{"tests":[{"public_id":..},..]}` for one trigger call covering every id.
pub fn synthetics_trigger_body(public_ids: &[String]) -> Result<Value, AppError> {
    let tests: Vec<Value> = public_ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| json!({ "public_id": id }))
        .collect();

    if tests.is_empty() {
        return Err(AppError::MissingField("at least one --public-id is required".into()));
    }

    Ok(json!({ "tests": tests }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range() -> TimeRange {
        TimeRange {
            start: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn get_params_skip_unset_keys() {
        let spec = QuerySpec::builder().service(Some("api".into())).build();
        let payload = build(&spec, &range(), RequestShape::GetParams).unwrap();
        let params = payload.params();
        assert_eq!(
            params,
            &[
                ("filter[query]".to_string(), "service:api".to_string()),
                ("filter[from]".to_string(), "2024-01-01T11:00:00Z".to_string()),
                ("filter[to]".to_string(), "2024-01-01T12:00:00Z".to_string()),
            ]
        );
        assert!(payload.body().is_none());
    }

    #[test]
    fn get_params_include_limit_and_sort() {
        let spec = QuerySpec::builder()
            .limit(50)
            .sort(Some("-timestamp".into()))
            .build();
        let payload = build(&spec, &range(), RequestShape::GetParams).unwrap();
        let value = payload.to_value();
        assert_eq!(value["page[limit]"], "50");
        assert_eq!(value["sort"], "-timestamp");
        assert_eq!(value["filter[query]"], "*");
    }

    #[test]
    fn search_body_shape() {
        let spec = QuerySpec::builder()
            .service(Some("api".into()))
            .query(Some("status:error".into()))
            .limit(10)
            .sort(Some("-timestamp".into()))
            .build();
        let payload = build(&spec, &range(), RequestShape::SearchBody).unwrap();
        assert_eq!(
            payload.body().unwrap(),
            &json!({
                "filter": {
                    "from": "2024-01-01T11:00:00Z",
                    "to": "2024-01-01T12:00:00Z",
                    "query": "status:error service:api",
                },
                "page": { "limit": 10 },
                "sort": "-timestamp",
            })
        );
    }

    #[test]
    fn jsonapi_search_wraps_attributes() {
        let spec = QuerySpec::builder().query(Some("@http.status_code:500".into())).build();
        let body = build(&spec, &range(), RequestShape::JsonApiSearch)
            .unwrap()
            .to_value();
        assert_eq!(body["data"]["type"], "search_request");
        assert_eq!(body["data"]["attributes"]["filter"]["query"], "@http.status_code:500");
    }

    #[test]
    fn aggregate_envelope_with_group_by() {
        let spec = QuerySpec::builder()
            .service(Some("api".into()))
            .errors_only()
            .group_by("resource_name", 10)
            .build();
        let body = build(&spec, &range(), RequestShape::Aggregate)
            .unwrap()
            .to_value();
        let attrs = &body["data"]["attributes"];
        assert_eq!(body["data"]["type"], "aggregate_request");
        assert_eq!(attrs["compute"], json!([{"aggregation": "count", "type": "total"}]));
        assert_eq!(
            attrs["group_by"],
            json!([{
                "facet": "resource_name",
                "limit": 10,
                "sort": {"type": "measure", "aggregation": "count", "order": "desc"},
            }])
        );
    }

    #[test]
    fn aggregate_without_group_by_has_no_key() {
        let spec = QuerySpec::builder()
            .env(Some("prd".into()))
            .compute(Aggregation::Count)
            .compute(Aggregation::Pc95("duration".into()))
            .build();
        let body = build(&spec, &range(), RequestShape::Aggregate)
            .unwrap()
            .to_value();
        let attrs = &body["data"]["attributes"];
        assert!(attrs.get("group_by").is_none());
        assert_eq!(attrs["compute"][1]["metric"], "duration");
    }

    #[test]
    fn aggregate_without_filter_is_missing_field() {
        let spec = QuerySpec::builder().build();
        let err = build(&spec, &range(), RequestShape::Aggregate).unwrap_err();
        assert!(matches!(err, AppError::MissingField(_)));
    }

    #[test]
    fn synthetics_ids_share_one_body() {
        let body = synthetics_trigger_body(&["abc-123".into(), "def-456".into()]).unwrap();
        assert_eq!(
            body,
            json!({"tests": [{"public_id": "abc-123"}, {"public_id": "def-456"}]})
        );
        assert!(matches!(
            synthetics_trigger_body(&[]),
            Err(AppError::MissingField(_))
        ));
    }
}
