//! `lineup-tui`: terminal front desk for Smart Line Up waiting queues.
//!
//! Two screens, switched with `1`/`2` or Tab: the line list and the
//! selected line's queue. With reordering turned on (`r`), rows can be
//! dragged with the mouse or carried with Space and `j`/`k`; the new order
//! shows immediately and is rolled back if the server refuses it.
//!
//! Logs go to a file (default `/tmp/lineup-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lineup_config::Config;
use lineup_core::{LineId, QueueSession, ServerConfig, TlsVerification};

use crate::app::App;

/// Work a waiting queue from the terminal.
#[derive(Parser, Debug)]
#[command(name = "lineup-tui", version, about)]
struct Cli {
    /// Profile from the config file
    #[arg(short, long, env = "LINEUP_PROFILE")]
    profile: Option<String>,

    /// Server URL (overrides the profile)
    #[arg(long, env = "LINEUP_SERVER")]
    server: Option<String>,

    /// Access token (overrides the profile's credentials)
    #[arg(long, env = "LINEUP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Line to open on start (defaults to the profile's `default_line`)
    #[arg(short, long)]
    line: Option<i64>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long, env = "LINEUP_INSECURE")]
    insecure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/lineup-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard until exit so buffered lines flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("lineup_tui={level},lineup_core={level},lineup_api={level}"))
    });

    let dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let file_name = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lineup-tui.log"));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Flags override the profile; `--server` plus `--token` needs no config.
fn server_config(cli: &Cli, cfg: &Config) -> Result<(ServerConfig, Option<LineId>)> {
    let name = cfg.profile_name(cli.profile.as_deref());

    let Some(profile) = cfg.profiles.get(&name) else {
        if cli.profile.is_some() {
            return Err(eyre!("profile '{name}' not found in {}", lineup_config::config_path().display()));
        }
        let (Some(server), Some(token)) = (cli.server.as_deref(), cli.token.as_deref()) else {
            return Err(eyre!(
                "no profile configured; run `lineup config init` or pass --server and --token"
            ));
        };
        let server = ServerConfig {
            url: server.parse().wrap_err_with(|| format!("invalid server URL: {server}"))?,
            token: SecretString::from(token.to_owned()),
            tls: if cli.insecure || cfg.defaults.insecure {
                TlsVerification::DangerAcceptInvalid
            } else {
                TlsVerification::SystemDefaults
            },
            timeout: Duration::from_secs(cfg.defaults.timeout),
        };
        return Ok((server, cli.line.map(LineId::new)));
    };

    let raw_url = cli.server.as_deref().unwrap_or(&profile.server);
    let token = match cli.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => lineup_config::resolve_token(profile, &name)?,
    };
    let server = ServerConfig {
        url: raw_url.parse().wrap_err_with(|| format!("invalid server URL: {raw_url}"))?,
        token,
        tls: if cli.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            lineup_config::tls_for(profile, &cfg.defaults)
        },
        timeout: Duration::from_secs(profile.timeout.unwrap_or(cfg.defaults.timeout)),
    };
    let line = cli.line.or(profile.default_line).map(LineId::new);
    Ok((server, line))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a panic while the terminal is raw still restores it.
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let cfg = lineup_config::load_config_or_default();
    let (server, initial_line) = server_config(&cli, &cfg)?;
    info!(server = %server.url, line = ?initial_line, "starting lineup-tui");

    let session = QueueSession::new(server.build_client()?, lineup_config::session_config(&cfg));
    let mut app = App::new(session, cfg, initial_line);
    app.run().await
}
