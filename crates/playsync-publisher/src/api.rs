use async_trait::async_trait;

use crate::error::PublisherError;
use crate::payload::{InAppProductPayload, SubscriptionPayload};

/// The two create operations the synchronizer consumes from the remote
/// catalog. [`crate::PublisherClient`] is the production implementation;
/// tests substitute in-memory catalogs.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Creates a one-time product under `package_name`.
    async fn create_consumable_product(
        &self,
        package_name: &str,
        payload: &InAppProductPayload,
    ) -> Result<(), PublisherError>;

    /// Creates a subscription, with its base plan, under `package_name`.
    async fn create_subscription(
        &self,
        package_name: &str,
        product_id: &str,
        payload: &SubscriptionPayload,
    ) -> Result<(), PublisherError>;
}
