//! CLI configuration: a thin layer over `lineup_config`.
//!
//! Resolution order for each setting is flag, then environment (handled by
//! clap), then profile, then `[defaults]`.

use std::time::Duration;

use secrecy::SecretString;

use lineup_core::{ServerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use lineup_config::{
    Config, Profile, config_path, load_config_or_default, save_config, session_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Build the server connection for this invocation.
///
/// Works without any config file when both `--server` and `--token` are
/// given.
pub fn resolve_server_config(global: &GlobalOpts, config: &Config) -> Result<ServerConfig, CliError> {
    let name = active_profile_name(global, config);

    if let Some(profile) = config.profiles.get(&name) {
        return resolve_profile(profile, &name, global, config);
    }

    if global.profile.is_some() {
        return Err(profile_not_found(name, config));
    }

    if let Some(server) = global.server.as_deref() {
        let token = global
            .token
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: name.clone(),
            })?;
        return Ok(ServerConfig {
            url: parse_url(server)?,
            token: SecretString::from(token),
            tls: if global.insecure || config.defaults.insecure {
                TlsVerification::DangerAcceptInvalid
            } else {
                TlsVerification::SystemDefaults
            },
            timeout: Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout)),
        });
    }

    let path = config_path();
    if path.exists() {
        Err(profile_not_found(name, config))
    } else {
        Err(CliError::NoConfig {
            path: path.display().to_string(),
        })
    }
}

/// Translate a `Profile` plus flag overrides into a `ServerConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    config: &Config,
) -> Result<ServerConfig, CliError> {
    let url = parse_url(global.server.as_deref().unwrap_or(&profile.server))?;

    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => lineup_config::resolve_token(profile, profile_name)?,
    };

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        lineup_config::tls_for(profile, &config.defaults)
    };

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(ServerConfig {
        url,
        token,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

pub fn profile_not_found(name: String, config: &Config) -> CliError {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    CliError::ProfileNotFound {
        name,
        available: if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        },
    }
}
