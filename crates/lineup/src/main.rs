mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use lineup_core::{QueueSession, SessionConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "lineup",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let server = config::resolve_server_config(&cli.global, &cfg)?;

            // Commands run once and exit: no polling, and a move is an
            // explicit request, so reordering is always allowed here.
            let session_config = SessionConfig {
                poll_interval: Duration::ZERO,
                reorder_enabled: true,
                ..config::session_config(&cfg)
            };
            let session = QueueSession::new(server.build_client()?, session_config);

            tracing::debug!(command = ?cmd, server = %server.url, "dispatching command");
            let result = commands::dispatch(cmd, &session, &server, &cli.global).await;
            session.close().await;
            result
        }
    }
}
