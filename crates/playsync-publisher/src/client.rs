//! HTTP client for the Android Publisher v3 REST API.
//!
//! Wraps `reqwest` with bearer-token authentication and Google's JSON error
//! envelope. Only the two create endpoints used for provisioning are exposed;
//! nothing is read back.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use playsync_core::AppConfig;
use reqwest::{Client, Url};

use crate::api::CatalogApi;
use crate::auth::{AccessToken, ServiceAccountCredentials, ANDROID_PUBLISHER_SCOPE};
use crate::error::PublisherError;
use crate::payload::{InAppProductPayload, SubscriptionPayload};

const DEFAULT_BASE_URL: &str = "https://androidpublisher.googleapis.com/";

/// Pricing-region set the regional prices are expressed against. Required by
/// `monetization.subscriptions.create`.
const REGIONS_VERSION: &str = "2022/02";

/// Connection settings shared by the token exchange and the catalog calls.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: "playsync/0.1 (catalog-provisioning)".to_string(),
        }
    }
}

/// Authenticated client for the Android Publisher API.
///
/// Build one with [`PublisherClient::authenticate`] from a service-account
/// key, or with [`PublisherClient::with_token`] when a bearer token is
/// already at hand (tests use this against a wiremock server).
#[derive(Debug)]
pub struct PublisherClient {
    client: Client,
    base_url: Url,
    token: AccessToken,
}

impl PublisherClient {
    /// Loads the service-account key at `key_path`, exchanges it for a bearer
    /// token and returns a client ready to issue create calls.
    ///
    /// # Errors
    ///
    /// - [`PublisherError::Auth`] if the key is missing or invalid, or the
    ///   token endpoint refuses the assertion.
    /// - [`PublisherError::Http`] if the HTTP client cannot be constructed.
    /// - [`PublisherError::InvalidBaseUrl`] if `settings.base_url` does not parse.
    pub async fn authenticate(
        key_path: &Path,
        settings: &ClientSettings,
    ) -> Result<Self, PublisherError> {
        let credentials = ServiceAccountCredentials::from_file(key_path)?;
        Self::authenticate_with(&credentials, settings).await
    }

    /// Same as [`PublisherClient::authenticate`] for already-parsed credentials.
    ///
    /// # Errors
    ///
    /// See [`PublisherClient::authenticate`].
    pub async fn authenticate_with(
        credentials: &ServiceAccountCredentials,
        settings: &ClientSettings,
    ) -> Result<Self, PublisherError> {
        let client = build_http_client(settings)?;
        let base_url = parse_base_url(&settings.base_url)?;
        let token = credentials
            .fetch_access_token(&client, ANDROID_PUBLISHER_SCOPE)
            .await?;

        tracing::info!(
            client_email = %credentials.client_email(),
            expires_at = %token.expires_at(),
            "authenticated with Android Publisher API"
        );

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Creates a client around an existing bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PublisherError::InvalidBaseUrl`] if
    /// `settings.base_url` is not a valid URL.
    pub fn with_token(token: AccessToken, settings: &ClientSettings) -> Result<Self, PublisherError> {
        Ok(Self {
            client: build_http_client(settings)?,
            base_url: parse_base_url(&settings.base_url)?,
            token,
        })
    }

    /// `POST applications/{packageName}/inappproducts`
    ///
    /// # Errors
    ///
    /// - [`PublisherError::Api`] if the API answers non-2xx; check
    ///   [`PublisherError::is_conflict`] for an existing SKU.
    /// - [`PublisherError::Http`] on network failure.
    pub async fn insert_in_app_product(
        &self,
        package_name: &str,
        payload: &InAppProductPayload,
    ) -> Result<(), PublisherError> {
        let url = self.build_url(&[package_name, "inappproducts"], &[])?;
        self.post_json(url, payload).await
    }

    /// `POST applications/{packageName}/subscriptions?productId=...`
    ///
    /// # Errors
    ///
    /// Same as [`PublisherClient::insert_in_app_product`].
    pub async fn create_subscription_product(
        &self,
        package_name: &str,
        product_id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<(), PublisherError> {
        let url = self.build_url(
            &[package_name, "subscriptions"],
            &[
                ("productId", product_id),
                ("regionsVersion.version", REGIONS_VERSION),
            ],
        )?;
        self.post_json(url, payload).await
    }

    /// Builds `{base}/androidpublisher/v3/applications/{segments...}` with
    /// each segment and query value percent-encoded.
    fn build_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, PublisherError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PublisherError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["androidpublisher", "v3", "applications"])
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn post_json<T: serde::Serialize + Sync>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<(), PublisherError> {
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token.secret())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(PublisherError::from_response(status.as_u16(), &text))
    }
}

#[async_trait]
impl CatalogApi for PublisherClient {
    async fn create_consumable_product(
        &self,
        package_name: &str,
        payload: &InAppProductPayload,
    ) -> Result<(), PublisherError> {
        self.insert_in_app_product(package_name, payload).await
    }

    async fn create_subscription(
        &self,
        package_name: &str,
        product_id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<(), PublisherError> {
        self.create_subscription_product(package_name, product_id, payload)
            .await
    }
}

fn build_http_client(settings: &ClientSettings) -> Result<Client, PublisherError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.clone())
        .build()?)
}

/// Normalise: ensure the base URL ends with exactly one slash.
fn parse_base_url(base_url: &str) -> Result<Url, PublisherError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PublisherError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
