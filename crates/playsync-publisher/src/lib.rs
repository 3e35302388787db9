pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod payload;
pub mod sync;

pub use api::CatalogApi;
pub use auth::{AccessToken, ServiceAccountCredentials, ANDROID_PUBLISHER_SCOPE};
pub use client::{ClientSettings, PublisherClient};
pub use error::{AuthError, PublisherError};
pub use payload::{build_consumable_payload, build_subscription_payload};
pub use sync::{
    sync_consumables, sync_subscriptions, ItemKind, ItemReport, Progress, SyncOptions, SyncOutcome,
};
