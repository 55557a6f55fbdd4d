use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app_state::AppState;
use crate::cli::routes::apm_routes::{apm_routes, ApmCommand};
use crate::cli::routes::auth_routes::{auth_routes, AuthCommand};
use crate::cli::routes::catalog_routes::{service_routes, services_routes, ServiceCommand, ServicesCommand};
use crate::cli::routes::logs_routes::{logs_routes, LogsCommand};
use crate::cli::routes::metrics_routes::{metrics_routes, MetricsCommand};
use crate::cli::routes::monitors_routes::{monitors_routes, MonitorsCommand};
use crate::cli::routes::resource_routes::{
    dashboards_routes, incidents_routes, synthetics_routes, DashboardsCommand, IncidentsCommand, SyntheticsCommand,
};
use crate::domain::render::report::CommandReport;

/// Datadog from the command line
#[derive(Debug, Parser)]
#[command(name = "ddctl", version)]
pub struct Cli {
    /// Named context from the config file (default: prd)
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Config file (default: ~/.config/ddctl/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print raw request and response JSON instead of tables
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// API key validation
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Monitors
    Monitors {
        #[command(subcommand)]
        command: MonitorsCommand,
    },
    /// Dashboards
    Dashboards {
        #[command(subcommand)]
        command: DashboardsCommand,
    },
    /// Incidents
    Incidents {
        #[command(subcommand)]
        command: IncidentsCommand,
    },
    /// Synthetic tests
    Synthetics {
        #[command(subcommand)]
        command: SyntheticsCommand,
    },
    /// Log search
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },
    /// APM spans and error analytics
    Apm {
        #[command(subcommand)]
        command: ApmCommand,
    },
    /// Service Catalog
    Services {
        #[command(subcommand)]
        command: ServicesCommand,
    },
    /// Per-service diagnostics
    Service {
        #[command(subcommand)]
        command: ServiceCommand,
    },
    /// Metrics queries
    Metrics {
        #[command(subcommand)]
        command: MetricsCommand,
    },
}

/// Routes a parsed command to its controller.
pub async fn dispatch(state: &AppState, command: Commands) -> Result<CommandReport> {
    match command {
        Commands::Auth { command } => auth_routes(state, command).await,
        Commands::Monitors { command } => monitors_routes(state, command).await,
        Commands::Dashboards { command } => dashboards_routes(state, command).await,
        Commands::Incidents { command } => incidents_routes(state, command).await,
        Commands::Synthetics { command } => synthetics_routes(state, command).await,
        Commands::Logs { command } => logs_routes(state, command).await,
        Commands::Apm { command } => apm_routes(state, command).await,
        Commands::Services { command } => services_routes(state, command).await,
        Commands::Service { command } => service_routes(state, command).await,
        Commands::Metrics { command } => metrics_routes(state, command).await,
    }
}
