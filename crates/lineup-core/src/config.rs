// ── Runtime connection configuration ──
//
// These types describe how to reach the queue backend and how a session
// behaves. They carry credential data but never touch disk: the CLI/TUI
// resolves a profile and hands a `ServerConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use lineup_api::{QueueClient, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::drag::DEFAULT_ACTIVATION_DISTANCE;
use crate::error::CoreError;
use crate::view::DisplayOptions;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Where the backend lives and how to authenticate with it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Backend base URL (e.g. `https://lineup.example.com/api`).
    pub url: Url,
    /// Pre-issued bearer token.
    pub token: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ServerConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }

    /// Build the HTTP client for this server.
    pub fn build_client(&self) -> Result<QueueClient, CoreError> {
        Ok(QueueClient::from_token(
            self.url.as_str(),
            &self.token,
            &self.transport(),
        )?)
    }
}

/// Behaviour of a [`QueueSession`](crate::QueueSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Background re-fetch interval. Zero disables polling.
    pub poll_interval: Duration,
    pub display: DisplayOptions,
    pub reorder_enabled: bool,
    /// Pointer travel before a press becomes a drag.
    pub drag_activation_distance: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            display: DisplayOptions::default(),
            reorder_enabled: false,
            drag_activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}
