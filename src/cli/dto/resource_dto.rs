//! Single-resource commands: dashboards, incidents, synthetics.

use clap::Args;
use validator::Validate;

#[derive(Debug, Clone, Args, Validate)]
pub struct DashboardGetRequest {
    /// Dashboard ID
    #[arg(long)]
    #[validate(length(min = 1))]
    pub id: String,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct IncidentCreateRequest {
    /// Incident title
    #[arg(long)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Severity (e.g. SEV-1, SEV-2)
    #[arg(long, default_value = "SEV-2")]
    #[validate(length(min = 1))]
    pub severity: String,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct SyntheticsTriggerRequest {
    /// Public ID of the test (repeatable)
    #[arg(long = "public-id", required = true)]
    #[validate(length(min = 1))]
    pub public_ids: Vec<String>,
}
