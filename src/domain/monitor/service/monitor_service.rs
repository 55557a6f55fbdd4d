use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use crate::cli::dto::monitors_dto::{MonitorListRequest, MonitorMuteRequest};
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::normalize::field_spec::normalize_row;
use crate::domain::normalize::raw_record::RawRecord;
use crate::domain::normalize::standard_fields::MONITOR_FIELDS;
use crate::domain::query::query_builder::RequestPayload;
use crate::domain::query::query_params::QueryParams;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, TableRenderer};
use crate::errors::validation_error;

pub async fn list_monitors(api: &dyn ApiTransport, req: MonitorListRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let params = QueryParams::new()
        .push_list("monitor_tags", &req.tags)
        .push_list("ids", &req.ids.iter().map(u64::to_string).collect::<Vec<_>>());

    let response = api.get("/api/v1/monitor", params.as_slice()).await?;
    let request = RequestPayload::Params(params).to_value();
    let monitors = filter_by_name(&response, req.name.as_deref());
    debug!("Listing {} monitor(s)", monitors.len());

    let rows: Vec<_> = monitors
        .iter()
        .map(|m| normalize_row(&RawRecord::new(m), MONITOR_FIELDS))
        .collect();
    let table = TableRenderer::new("Monitors")
        .column(ColumnSpec::text("id"))
        .column(ColumnSpec::text("name"))
        .column(ColumnSpec::text("type"))
        .column(ColumnSpec::text("state"))
        .render(&rows);

    Ok(CommandReport::new()
        .exchange(ApiExchange::new("monitors", Some(request), response))
        .view(View::Table(table)))
}

/// v1 returns a bare list of monitors.
fn filter_by_name<'a>(response: &'a Value, name: Option<&str>) -> Vec<&'a Value> {
    let needle = name.map(str::to_lowercase);
    response
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|m| match &needle {
                    Some(n) => m
                        .get("name")
                        .and_then(Value::as_str)
                        .is_some_and(|name| name.to_lowercase().contains(n.as_str())),
                    None => true,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub async fn mute_monitor(api: &dyn ApiTransport, req: MonitorMuteRequest) -> Result<CommandReport> {
    let path = format!("/api/v1/monitor/{}/mute", req.id);
    let body = json!({});
    let response = api.post(&path, &body).await?;
    debug!("Muted monitor {}", req.id);
    Ok(CommandReport::json("mute", Some(body), response))
}
