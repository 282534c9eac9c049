// ── Core error types ──
//
// User-facing errors from lineup-core. Consumers never see raw HTTP
// details; `From<lineup_api::Error>` translates transport failures into
// domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach queue server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Queue entry not found: {identifier}")]
    EntryNotFound { identifier: String },

    #[error("Line not found: {identifier}")]
    LineNotFound { identifier: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("No line selected")]
    NoLineSelected,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by server: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Reordering is disabled")]
    ReorderDisabled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Session closed")]
    SessionClosed,

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short, non-technical text for the error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => {
                "Your access token was rejected. Update it and try again."
            }
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => {
                "Could not reach the queue server. Please try again."
            }
            _ => "Something went wrong while updating the queue. Please try again.",
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lineup_api::Error> for CoreError {
    fn from(err: lineup_api::Error) -> Self {
        match err {
            lineup_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            lineup_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            lineup_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lineup_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            lineup_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lineup_api::Error::Api {
                message,
                status: 404,
                ..
            } => CoreError::NotFound { message },
            lineup_api::Error::Api {
                message,
                status: 409,
                ..
            } => CoreError::Rejected { message },
            lineup_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            lineup_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_statuses_map_to_domain_variants() {
        let not_found: CoreError = lineup_api::Error::Api {
            message: "no such entry".into(),
            code: None,
            status: 404,
        }
        .into();
        assert!(matches!(not_found, CoreError::NotFound { .. }));

        let conflict: CoreError = lineup_api::Error::Api {
            message: "phone already queued".into(),
            code: Some("DUPLICATE_PHONE".into()),
            status: 409,
        }
        .into();
        assert!(matches!(conflict, CoreError::Rejected { .. }));

        let server: CoreError = lineup_api::Error::Api {
            message: "boom".into(),
            code: None,
            status: 500,
        }
        .into();
        assert!(matches!(server, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn user_message_is_generic() {
        let err = CoreError::Api {
            message: "constraint violation on queue_order_idx".into(),
            code: None,
            status: Some(500),
        };
        assert!(!err.user_message().contains("queue_order_idx"));

        let auth: CoreError = lineup_api::Error::Authentication {
            message: "expired".into(),
        }
        .into();
        assert!(auth.user_message().contains("token"));
    }
}
