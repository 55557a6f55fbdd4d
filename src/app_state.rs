use std::sync::Arc;

use crate::core::client::api_transport_trait::ApiTransport;
use crate::core::client::datadog_client::DatadogClient;
use crate::core::config::context_config::ApiContext;
use crate::domain::render::report::CommandReport;
use crate::errors::AppError;

macro_rules! delegate_api_service {
    ($(fn $name:ident($($arg:ident : $typ:ty),*) => $path:path;)+) => {
        $(
            pub async fn $name(&self, $($arg: $typ),*) -> anyhow::Result<CommandReport> {
                $path(self.transport.as_ref(), $($arg),*).await
            }
        )+
    };
}

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn ApiTransport>,
}

pub fn build_app_state(context: ApiContext) -> Result<AppState, AppError> {
    Ok(AppState::new(Arc::new(DatadogClient::new(context)?)))
}

impl AppState {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    delegate_api_service! {
        fn auth_status() => crate::domain::auth::service::auth_service::status;

        fn list_monitors(req: crate::cli::dto::monitors_dto::MonitorListRequest) => crate::domain::monitor::service::monitor_service::list_monitors;
        fn mute_monitor(req: crate::cli::dto::monitors_dto::MonitorMuteRequest) => crate::domain::monitor::service::monitor_service::mute_monitor;

        fn get_dashboard(req: crate::cli::dto::resource_dto::DashboardGetRequest) => crate::domain::dashboard::service::dashboard_service::get_dashboard;
        fn create_incident(req: crate::cli::dto::resource_dto::IncidentCreateRequest) => crate::domain::incident::service::incident_service::create_incident;
        fn trigger_synthetics(req: crate::cli::dto::resource_dto::SyntheticsTriggerRequest) => crate::domain::synthetics::service::synthetics_service::trigger_tests;

        fn query_logs(req: crate::cli::dto::logs_dto::LogsQueryRequest) => crate::domain::logs::service::logs_service::query_logs;

        fn list_spans(req: crate::cli::dto::apm_dto::SpansListRequest) => crate::domain::apm::service::spans_service::list_spans;
        fn search_spans(req: crate::cli::dto::apm_dto::SpansSearchRequest) => crate::domain::apm::service::spans_service::search_spans;
        fn top_error_resources(req: crate::cli::dto::apm_dto::ErrorsTopResourcesRequest) => crate::domain::apm::service::errors_service::top_resources;
        fn error_rate(req: crate::cli::dto::apm_dto::ErrorsRateRequest) => crate::domain::apm::service::errors_service::error_rate;

        fn list_services() => crate::domain::catalog::service::catalog_service::list_services;
        fn get_service(req: crate::cli::dto::catalog_dto::ServiceGetRequest) => crate::domain::catalog::service::catalog_service::get_service;
        fn apply_service(req: crate::cli::dto::catalog_dto::ServiceApplyRequest) => crate::domain::catalog::service::catalog_service::apply_service;
        fn troubleshoot_service(req: crate::cli::dto::catalog_dto::ServiceTroubleshootRequest) => crate::domain::troubleshoot::service::troubleshoot_service::troubleshoot;

        fn query_metrics(req: crate::cli::dto::metrics_dto::MetricsQueryRequest) => crate::domain::metric::service::metric_query_service::query_metrics;
        fn k8s_resources(req: crate::cli::dto::metrics_dto::K8sResourcesRequest) => crate::domain::metric::service::k8s_resources_service::k8s_resources;
        fn tag_cardinality(req: crate::cli::dto::metrics_dto::TagCardinalityRequest) => crate::domain::metric::service::tag_cardinality_service::tag_cardinality;
    }
}
