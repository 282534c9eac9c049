//! Config subcommand handlers. None of these contact the server.

use std::fmt::Write as _;

use dialoguer::{Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext tokens masked, safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut out = cfg.clone();
    for profile in out.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    out
}

/// TOML-like rendering of a (redacted) config for table mode.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"\n");
    }

    let d = &cfg.defaults;
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", d.output);
    let _ = writeln!(out, "color = \"{}\"", d.color);
    let _ = writeln!(out, "insecure = {}", d.insecure);
    let _ = writeln!(out, "timeout = {}", d.timeout);
    let _ = writeln!(out, "poll_interval_secs = {}", d.poll_interval_secs);

    let p = &cfg.display;
    let _ = writeln!(out, "\n[display]");
    let _ = writeln!(out, "hide_entered = {}", p.hide_entered);
    let _ = writeln!(out, "show_sequence_numbers = {}", p.show_sequence_numbers);
    let _ = writeln!(out, "reorder_enabled = {}", p.reorder_enabled);
    let _ = writeln!(out, "drag_activation_distance = {}", p.drag_activation_distance);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(profile) = cfg.profiles.get(name) else {
            continue;
        };
        let _ = writeln!(out, "\n[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", profile.server);
        if let Some(ref token) = profile.token {
            let _ = writeln!(out, "token = \"{token}\"");
        }
        if let Some(ref env) = profile.token_env {
            let _ = writeln!(out, "token_env = \"{env}\"");
        }
        if let Some(ref ca) = profile.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = profile.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = profile.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(line) = profile.default_line {
            let _ = writeln!(out, "default_line = {line}");
        }
    }
    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("Access token: ").map_err(prompt_err)?;
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "access token cannot be empty".into(),
        });
    }
    Ok(token)
}

/// Keyring or plaintext. Returns the token when it belongs in the file.
fn store_token_interactive(profile_name: &str, token: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the token be kept?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_token(profile_name, &SecretString::from(token))?;
        eprintln!("   ✓ token stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(token))
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {e}"),
            })?;
            profile.server = value;
        }
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse_value(key, &value, "'true' or 'false'")?),
        "timeout" => profile.timeout = Some(parse_value(key, &value, "a number of seconds")?),
        "default_line" | "default-line" => {
            profile.default_line = Some(parse_value(key, &value, "a line id")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: server, token_env, ca_cert, \
                     insecure, timeout, default_line"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: lineup config init");
                return Ok(());
            }
            let default = cfg.profile_name(None);
            let mut names: Vec<_> = cfg.profiles.keys().collect();
            names.sort();
            let listing = names
                .into_iter()
                .map(|name| {
                    if *name == default {
                        format!("{name} *")
                    } else {
                        name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&listing, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(profile_name, &cfg));
            }
            let token = prompt_token()?;
            config::store_token(&profile_name, &SecretString::from(token))?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}

/// Interactive first-run wizard.
fn init() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("lineup configuration");
    eprintln!("   Config path: {}\n", path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Server URL")
        .default("https://lineup.example.com/api".into())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input).map(drop).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let token = prompt_token()?;
    let token = store_token_interactive(&profile_name, token)?;

    let default_line: String = Input::new()
        .with_prompt("Default line id (blank for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let default_line = if default_line.trim().is_empty() {
        None
    } else {
        Some(parse_value("default_line", &default_line, "a line id")?)
    };

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            server,
            token,
            default_line,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: lineup lines list");
    Ok(())
}
