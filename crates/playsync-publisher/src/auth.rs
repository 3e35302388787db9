//! Service-account authentication for the Android Publisher API.
//!
//! Implements Google's OAuth 2.0 JWT bearer grant: an RS256 assertion signed
//! with the service account's private key is exchanged at the key's
//! `token_uri` for a short-lived bearer token. The token outlives any
//! provisioning run, so it is fetched once and never refreshed.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// OAuth scope granting edit access to Play Console resources.
pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// On-disk shape of a Google Cloud service-account key.
#[derive(Deserialize)]
struct ServiceAccountKeyFile {
    #[serde(rename = "type")]
    key_type: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default)]
    private_key: String,
    #[serde(default)]
    client_email: String,
    #[serde(default)]
    token_uri: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// A parsed service-account key, ready to sign assertions.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    client_email: String,
    private_key_id: Option<String>,
    token_uri: String,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("encoding_key", &"[redacted]")
            .finish()
    }
}

impl ServiceAccountCredentials {
    /// Reads and validates a service-account JSON key.
    ///
    /// # Errors
    ///
    /// - [`AuthError::CredentialNotFound`] if nothing exists at `path`.
    /// - [`AuthError::CredentialInvalid`] if the file cannot be read, is not
    ///   a service-account key, or carries an unusable private key.
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuthError::CredentialNotFound {
                    path: display.clone(),
                }
            } else {
                AuthError::CredentialInvalid {
                    path: display.clone(),
                    reason: e.to_string(),
                }
            }
        })?;
        Self::from_json(&display, &content)
    }

    /// Parses a service-account key from its JSON text. `source` names the
    /// key in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CredentialInvalid`] on malformed JSON, a `type`
    /// other than `service_account`, a missing or blank `client_email` or
    /// `private_key`, or a private key that is not an RSA PEM. The `type`
    /// check runs first, so user credentials are reported as such.
    pub fn from_json(source: &str, json: &str) -> Result<Self, AuthError> {
        let invalid = |reason: String| AuthError::CredentialInvalid {
            path: source.to_string(),
            reason,
        };

        let key: ServiceAccountKeyFile =
            serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

        if key.key_type != "service_account" {
            return Err(invalid(format!(
                "expected type \"service_account\", found \"{}\"",
                key.key_type
            )));
        }
        if key.client_email.trim().is_empty() {
            return Err(invalid("client_email is missing or empty".to_string()));
        }
        if key.private_key.trim().is_empty() {
            return Err(invalid("private_key is missing or empty".to_string()));
        }

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| invalid(format!("private_key is not a usable RSA key: {e}")))?;

        Ok(Self {
            client_email: key.client_email,
            private_key_id: key.private_key_id,
            token_uri: key
                .token_uri
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            encoding_key,
        })
    }

    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    #[must_use]
    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Overrides the token endpoint, e.g. to point at a mock server.
    #[must_use]
    pub fn with_token_uri(mut self, token_uri: &str) -> Self {
        self.token_uri = token_uri.to_string();
        self
    }

    /// Signs the RS256 assertion presented to the token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if the key cannot produce a signature.
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.private_key_id);

        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
        };

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Exchanges a freshly signed assertion for a bearer token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Signing`] if the assertion cannot be signed.
    /// - [`AuthError::TokenRequest`] on network failure or an unparseable
    ///   success body.
    /// - [`AuthError::TokenRejected`] if the endpoint answers non-2xx.
    pub async fn fetch_access_token(
        &self,
        http: &Client,
        scope: &str,
    ) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let assertion = self.assertion(scope, now)?;

        tracing::debug!(
            client_email = %self.client_email,
            token_uri = %self.token_uri,
            "requesting access token"
        );

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected {
                status: status.as_u16(),
                message: describe_token_error(&body),
            });
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = now + Duration::seconds(token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS));
        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }
}

fn describe_token_error(body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error: Some(error),
            error_description: Some(desc),
        }) => format!("{error}: {desc}"),
        Ok(TokenErrorResponse {
            error: Some(error), ..
        }) => error,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

/// A bearer token for the Android Publisher API.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    #[must_use]
    pub fn new(value: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at,
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
