use serde::Deserialize;
use thiserror::Error;

/// Failures while turning a service-account key into a bearer token.
///
/// All variants are configuration errors: the run halts before any catalog
/// call is made.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("service account key not found at {path}")]
    CredentialNotFound { path: String },

    #[error("service account key at {path} is invalid: {reason}")]
    CredentialInvalid { path: String, reason: String },

    #[error("failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token request failed: {0}")]
    TokenRequest(#[from] reqwest::Error),

    #[error("token endpoint rejected the assertion (HTTP {status}): {message}")]
    TokenRejected { status: u16, message: String },
}

/// Errors returned by the Android Publisher client.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Android Publisher API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        /// Canonical Google status, e.g. `"ALREADY_EXISTS"`, when the body carried one.
        code: Option<String>,
        message: String,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl PublisherError {
    /// Builds an [`PublisherError::Api`] from a non-2xx response, pulling
    /// the structured fields out of Google's `{"error": {...}}` envelope when
    /// the body has one.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: GoogleError,
        }
        #[derive(Deserialize)]
        struct GoogleError {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            status: Option<String>,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => PublisherError::Api {
                status,
                code: envelope.error.status,
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| "no message".to_string()),
            },
            Err(_) => PublisherError::Api {
                status,
                code: None,
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// Returns `true` when the remote catalog already holds the entry.
    ///
    /// Checks the HTTP 409 status and the `ALREADY_EXISTS` code first; the
    /// message text is only consulted when neither is present, since some
    /// Play endpoints report duplicates as a plain 400.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            PublisherError::Api {
                status,
                code,
                message,
            } => {
                *status == 409
                    || code.as_deref() == Some("ALREADY_EXISTS")
                    || message.to_lowercase().contains("already exists")
            }
            _ => false,
        }
    }
}
