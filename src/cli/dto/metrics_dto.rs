use clap::Args;
use validator::Validate;

use crate::core::util::format_util::CpuUnit;
use crate::domain::render::sparkline::DEFAULT_SPARK_POINTS;

#[derive(Debug, Clone, Args, Validate)]
pub struct MetricsQueryRequest {
    /// Query, e.g. avg:system.cpu.user{*}
    #[arg(long)]
    #[validate(length(min = 1))]
    pub query: String,

    /// Range start
    #[arg(long = "from", default_value = "now-1h")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    /// Rollup seconds
    #[arg(long)]
    #[validate(range(min = 1))]
    pub rollup: Option<u32>,

    /// Max series to display
    #[arg(long, default_value_t = 20)]
    #[validate(range(min = 1))]
    pub limit: usize,

    /// Show only this tag from the scope (e.g. kube_deployment)
    #[arg(long = "scope-tag")]
    pub scope_tag: Option<String>,

    /// Show a sparkline per series
    #[arg(long)]
    pub spark: bool,

    /// Points per sparkline
    #[arg(long = "spark-points", default_value_t = DEFAULT_SPARK_POINTS)]
    #[validate(range(min = 1, max = 500))]
    pub spark_points: usize,
}

/// CPU/memory requests, limits and usage for one workload.
#[derive(Debug, Clone, Args, Validate)]
pub struct K8sResourcesRequest {
    /// cluster:<name> tag value
    #[arg(long)]
    #[validate(length(min = 1))]
    pub cluster: String,

    /// kube_service tag value
    #[arg(long = "kube-service")]
    pub kube_service: Option<String>,

    /// kube_deployment tag value
    #[arg(long = "kube-deployment")]
    pub kube_deployment: Option<String>,

    /// Range start
    #[arg(long = "from", default_value = "now-1h")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    /// Rollup seconds
    #[arg(long, default_value_t = 60)]
    #[validate(range(min = 1))]
    pub rollup: u32,

    /// CPU unit (cores|mcores)
    #[arg(long = "cpu-unit", default_value = "cores", value_parser = parse_cpu_unit)]
    pub cpu_unit: CpuUnit,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct TagCardinalityRequest {
    /// Metric name
    #[arg(long)]
    #[validate(length(min = 1))]
    pub metric: String,
}

fn parse_cpu_unit(s: &str) -> Result<CpuUnit, String> {
    CpuUnit::from_code(s).ok_or_else(|| format!("unknown CPU unit '{}' (expected cores|mcores)", s))
}
