pub mod app_config;
pub mod catalog;
pub mod config;
pub mod price;

pub use app_config::{AppConfig, MIN_INTER_CALL_DELAY_MS, PLACEHOLDER_PACKAGE_NAME};
pub use catalog::{
    load_catalog, BasePlan, BillingPeriod, Catalog, ConsumableProduct, PurchaseType, Subscription,
};
pub use config::{load_app_config, load_app_config_from_env, validate_package_name};
pub use price::Micros;

use thiserror::Error;

/// ISO 4217 code every catalog price is expressed in.
pub const CURRENCY_CODE: &str = "USD";
/// Play region the single regional price is configured for.
pub const REGION_CODE: &str = "US";
/// BCP-47 language of the default store listing.
pub const LISTING_LANGUAGE: &str = "en-US";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
