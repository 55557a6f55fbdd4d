use clap::Args;
use validator::Validate;

#[derive(Debug, Clone, Args, Validate)]
pub struct LogsQueryRequest {
    /// Range start (relative or ISO-8601)
    #[arg(long = "from", default_value = "-1h")]
    pub from: String,

    /// Range end (relative or ISO-8601)
    #[arg(long, default_value = "now")]
    pub to: String,

    /// Filter by service
    #[arg(long)]
    pub service: Option<String>,

    /// Filter by env (e.g. prd/dev)
    #[arg(long)]
    pub env: Option<String>,

    /// Additional query
    #[arg(long)]
    pub query: Option<String>,

    /// Events limit
    #[arg(long, default_value_t = 50)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: u32,
}
