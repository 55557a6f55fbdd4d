use clap::Args;
use validator::Validate;

#[derive(Debug, Clone, Args, Validate)]
pub struct SpansListRequest {
    /// Filter by service
    #[arg(long)]
    pub service: Option<String>,

    /// Filter by env (e.g. prd/dev)
    #[arg(long)]
    pub env: Option<String>,

    /// Range start
    #[arg(long = "from", default_value = "now-15m")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    #[arg(long, default_value_t = 50)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: u32,

    /// Additional query
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long, default_value = "-timestamp")]
    pub sort: String,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct SpansSearchRequest {
    /// Span query (Trace Explorer syntax)
    #[arg(long)]
    #[validate(length(min = 1))]
    pub query: String,

    /// Filter by env (e.g. prd/dev)
    #[arg(long)]
    pub env: Option<String>,

    /// Range start
    #[arg(long = "from", default_value = "now-1h")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    #[arg(long, default_value_t = 50)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: u32,

    #[arg(long, default_value = "-timestamp")]
    pub sort: String,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct ErrorsTopResourcesRequest {
    /// Service to analyze
    #[arg(long)]
    #[validate(length(min = 1))]
    pub service: String,

    /// Filter by env
    #[arg(long)]
    pub env: Option<String>,

    /// Range start
    #[arg(long = "from", default_value = "now-24h")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    #[arg(long, default_value_t = 10)]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct ErrorsRateRequest {
    /// Service to analyze
    #[arg(long)]
    #[validate(length(min = 1))]
    pub service: String,

    /// Facet to group by
    #[arg(long = "group-by", default_value = "resource_name")]
    #[validate(length(min = 1))]
    pub group_by: String,

    /// Filter by env
    #[arg(long)]
    pub env: Option<String>,

    /// Range start
    #[arg(long = "from", default_value = "now-1h")]
    pub from: String,

    /// Range end
    #[arg(long, default_value = "now")]
    pub to: String,

    #[arg(long, default_value_t = 10)]
    #[validate(range(min = 1, max = 100))]
    pub limit: u32,
}
