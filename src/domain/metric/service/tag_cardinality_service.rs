use anyhow::Result;
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::cli::dto::metrics_dto::TagCardinalityRequest;
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::common::model::{CellValue, NormalizedRow};
use crate::domain::normalize::field_spec::{normalize_row, to_cell, FieldSpec};
use crate::domain::normalize::raw_record::RawRecord;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer, ValueFormat};
use crate::errors::validation_error;

const CARDINALITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("tag_key", &["tag_key", "name"]).with_fallback(&["id"]),
    FieldSpec::new("cardinality", &["cardinality", "count"]),
];

pub fn cardinality_path(metric: &str) -> String {
    format!(
        "/api/v2/metrics/{}/tag-cardinality-details",
        urlencoding::encode(metric.trim())
    )
}

/// Entries come as a `data` list, a `metrics` list, or a `metrics` map
/// keyed by tag.
pub fn cardinality_rows(response: &Value) -> Vec<NormalizedRow> {
    let data = match response.get("data") {
        Some(Value::Null) | None => response,
        Some(data) => data,
    };
    let entries = match data {
        Value::Array(_) => Some(data),
        _ => data.get("metrics"),
    };

    match entries {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| normalize_row(&RawRecord::new(item), CARDINALITY_FIELDS))
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| {
                let card = match value {
                    Value::Object(inner) => inner.get("cardinality").and_then(to_cell),
                    other => to_cell(other),
                };
                let mut row = NormalizedRow::new().with("tag_key", CellValue::from(key.as_str()));
                row.set("cardinality", card);
                row
            })
            .collect(),
        _ => {
            warn!("Tag cardinality response has no recognizable entries");
            Vec::new()
        }
    }
}

pub async fn tag_cardinality(api: &dyn ApiTransport, req: TagCardinalityRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let path = cardinality_path(&req.metric);
    debug!("Fetching {}", path);
    let response = api.get(&path, &[]).await?;
    let rows = cardinality_rows(&response);

    let table = TableRenderer::new(&format!("Tag cardinality for {}", req.metric.trim()))
        .column(ColumnSpec::text("tag_key"))
        .column(ColumnSpec::new("cardinality", ValueFormat::Decimal))
        .render(&rows);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("tag cardinality", None, response))
        .view(View::Table(table)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::recording_transport::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn metric_name_is_path_encoded() {
        let api = RecordingTransport::with_responses(vec![json!({"data": []})]);
        let req = TagCardinalityRequest { metric: "trace.http request".into() };
        tag_cardinality(&api, req).await.unwrap();
        assert_eq!(
            api.requests()[0].path,
            "/api/v2/metrics/trace.http%20request/tag-cardinality-details"
        );
    }

    #[tokio::test]
    async fn json_api_items() {
        let api = RecordingTransport::with_responses(vec![json!({"data": [
            {"id": "host", "type": "tag_cardinality", "attributes": {"cardinality": 120}},
            {"id": "env", "type": "tag_cardinality", "attributes": {"cardinality": 3}},
        ]})]);
        let req = TagCardinalityRequest { metric: "system.cpu.user".into() };
        let report = tag_cardinality(&api, req).await.unwrap();

        let table = report.tables()[0];
        assert_eq!(table.spec.title, "Tag cardinality for system.cpu.user");
        assert_eq!(table.rows, vec![vec!["host", "120"], vec!["env", "3"]]);
    }

    #[test]
    fn metrics_list_and_map_shapes() {
        let list = cardinality_rows(&json!({"data": {"metrics": [{"tag_key": "pod", "count": 40}]}}));
        assert_eq!(list[0].get("tag_key"), Some(&CellValue::from("pod")));
        assert_eq!(list[0].get("cardinality"), Some(&CellValue::Number(40.0)));

        let map = cardinality_rows(&json!({"metrics": {"region": {"cardinality": 4}, "az": 9}}));
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].get("tag_key"), Some(&CellValue::from("az")));
        assert_eq!(map[0].get("cardinality"), Some(&CellValue::Number(9.0)));
    }
}
