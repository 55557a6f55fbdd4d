use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use crate::cli::dto::catalog_dto::{ServiceApplyRequest, ServiceGetRequest};
use crate::core::client::api_transport_trait::ApiTransport;
use crate::domain::normalize::field_spec::normalize_row;
use crate::domain::normalize::raw_record::{data_items, RawRecord};
use crate::domain::normalize::standard_fields::CATALOG_FIELDS;
use crate::domain::query::query_builder::RequestPayload;
use crate::domain::query::query_params::QueryParams;
use crate::domain::render::report::{ApiExchange, CommandReport, View};
use crate::domain::render::table_renderer::{ColumnSpec, RenderedTable, TableRenderer};
use crate::errors::{validation_error, AppError};

pub const CATALOG_ENTITY_PATH: &str = "/api/v2/catalog/entity";

const TIERS: std::ops::RangeInclusive<u8> = 1..=4;

fn catalog_table(response: &Value) -> RenderedTable {
    let rows: Vec<_> = data_items(response)
        .iter()
        .map(|item| normalize_row(&RawRecord::new(item), CATALOG_FIELDS))
        .collect();
    debug!("Catalog returned {} entit(ies)", rows.len());
    TableRenderer::new("Service Catalog")
        .column(ColumnSpec::text("service"))
        .column(ColumnSpec::text("owner"))
        .column(ColumnSpec::text("tier"))
        .column(ColumnSpec::text("tags"))
        .render(&rows)
}

pub async fn list_services(api: &dyn ApiTransport) -> Result<CommandReport> {
    let response = api.get(CATALOG_ENTITY_PATH, &[]).await?;
    let table = catalog_table(&response);
    Ok(CommandReport::new()
        .exchange(ApiExchange::new("catalog", None, response))
        .view(View::Table(table)))
}

pub async fn get_service(api: &dyn ApiTransport, req: ServiceGetRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let params = QueryParams::new().push("filter[name]", Some(req.service.trim()));
    let response = api.get(CATALOG_ENTITY_PATH, params.as_slice()).await?;
    let table = catalog_table(&response);
    Ok(CommandReport::new()
        .exchange(ApiExchange::new(
            "catalog",
            Some(RequestPayload::Params(params).to_value()),
            response,
        ))
        .view(View::Table(table)))
}

/// `--tier` must be an integer from 1 to 4; it is sent as a string.
fn parse_tier(tier: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(raw) = tier.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u8>() {
        Ok(n) if TIERS.contains(&n) => Ok(Some(n.to_string())),
        _ => Err(AppError::InvalidArgument(format!(
            "--tier must be an integer (1-4), got '{}'",
            raw
        ))),
    }
}

/// Service definition (schema v3) for the catalog upsert.
pub fn entity_payload(req: &ServiceApplyRequest) -> Result<Value, AppError> {
    let tier = parse_tier(req.tier.as_deref())?;
    let service = req.service.trim();

    let mut tags = Vec::new();
    if let Some(env) = req.env.as_deref().filter(|e| !e.is_empty()) {
        tags.push(format!("env:{}", env));
    }
    if let Some(team) = req.team.as_deref().filter(|t| !t.is_empty()) {
        tags.push(format!("team:{}", team));
    }
    tags.extend(req.tags.iter().cloned());

    let mut spec = json!({});
    if let Some(tier) = tier {
        spec["tier"] = json!(tier);
    }

    Ok(json!({
        "apiVersion": "v3",
        "kind": "service",
        "metadata": {
            "name": service,
            "displayName": service.replace('-', " ").to_uppercase(),
            "description": req.description.clone().unwrap_or_default(),
            "tags": tags,
            "owner": req.team,
        },
        "spec": spec,
    }))
}

pub async fn apply_service(api: &dyn ApiTransport, req: ServiceApplyRequest) -> Result<CommandReport> {
    req.validate().map_err(validation_error)?;

    let payload = entity_payload(&req)?;
    debug!("Applying catalog entity for {}", req.service);
    let response = api.post(CATALOG_ENTITY_PATH, &payload).await?;
    Ok(CommandReport::json("catalog apply", Some(payload), response))
}
