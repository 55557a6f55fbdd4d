use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use ddctl::app_state::build_app_state;
use ddctl::cli::util::output::{emit, render_error};
use ddctl::core::config::context_config::resolve_context;
use ddctl::errors::exit_code_for;
use ddctl::logging::init_tracing;
use ddctl::routes::{dispatch, Cli};

async fn run(cli: Cli) -> anyhow::Result<()> {
    let context = resolve_context(cli.context.as_deref(), cli.config.as_deref())?;
    debug!("Using site {}", context.site);
    let state = build_app_state(context)?;
    let report = dispatch(&state, cli.command).await?;
    emit(&report, cli.debug)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let debug = cli.debug;
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", render_error(&err, debug));
            ExitCode::from(exit_code_for(&err) as u8)
        }
    }
}
