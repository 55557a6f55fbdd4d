use clap::Args;
use validator::Validate;

#[derive(Debug, Clone, Args, Validate)]
pub struct ServiceGetRequest {
    /// Service name
    #[arg(long)]
    #[validate(length(min = 1))]
    pub service: String,
}

/// Create or update a Software Catalog (v3) service entity.
#[derive(Debug, Clone, Args, Validate)]
pub struct ServiceApplyRequest {
    /// Service name
    #[arg(long)]
    #[validate(length(min = 1))]
    pub service: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Environment tag
    #[arg(long)]
    pub env: Option<String>,

    /// Owning team
    #[arg(long)]
    pub team: Option<String>,

    /// Service tier (1-4)
    #[arg(long)]
    pub tier: Option<String>,

    /// Extra tag key:value (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct ServiceTroubleshootRequest {
    /// Service name
    #[arg(long)]
    #[validate(length(min = 1))]
    pub service: String,

    /// Environment (e.g. prd/dev)
    #[arg(long)]
    pub env: Option<String>,

    /// Range start; the range always ends now
    #[arg(long = "from", default_value = "now-1h")]
    pub from: String,

    /// Filter by cluster:<name>
    #[arg(long)]
    pub cluster: Option<String>,
}
