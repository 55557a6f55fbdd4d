use clap::Args;
use validator::Validate;

#[derive(Debug, Clone, Default, Args, Validate)]
pub struct MonitorListRequest {
    /// Case-insensitive substring filter on the monitor name
    #[arg(long)]
    pub name: Option<String>,

    /// Monitor tag filter (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Monitor ID filter (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Args, Validate)]
pub struct MonitorMuteRequest {
    /// Monitor ID to mute
    #[arg(long)]
    pub id: u64,
}
