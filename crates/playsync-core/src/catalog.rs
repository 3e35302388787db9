//! Declarative product catalog.
//!
//! A [`Catalog`] is fixed before a run starts and never mutated afterwards.
//! It comes either from [`Catalog::builtin`] or from a YAML file via
//! [`load_catalog`]. Identifier uniqueness is left to the remote API: a
//! repeated SKU simply surfaces as an "already exists" response.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::price::Micros;
use crate::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseType {
    #[default]
    Consumable,
}

impl PurchaseType {
    /// Value of the `purchaseType` field on the Play `InAppProduct` resource.
    #[must_use]
    pub fn api_value(self) -> &'static str {
        match self {
            PurchaseType::Consumable => "managedUser",
        }
    }
}

impl std::fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseType::Consumable => write!(f, "consumable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    /// ISO-8601 duration the API expects in `billingPeriodDuration`.
    #[must_use]
    pub fn iso8601(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "P1M",
            BillingPeriod::Yearly => "P1Y",
        }
    }

    /// Singular unit used in human-readable prices, e.g. `$20.99/month`.
    #[must_use]
    pub fn unit_label(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "month",
            BillingPeriod::Yearly => "year",
        }
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingPeriod::Monthly => write!(f, "monthly"),
            BillingPeriod::Yearly => write!(f, "yearly"),
        }
    }
}

/// A one-time purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableProduct {
    pub sku: String,
    pub title: String,
    pub description: String,
    pub price_micros: Micros,
    #[serde(default)]
    pub purchase_type: PurchaseType,
}

/// Billing terms of a subscription. Exactly one per [`Subscription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePlan {
    pub base_plan_id: String,
    pub billing_period: BillingPeriod,
    pub price_micros: Micros,
    #[serde(default = "default_auto_renewing")]
    pub auto_renewing: bool,
}

fn default_auto_renewing() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub base_plan: BasePlan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub consumables: Vec<ConsumableProduct>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl Catalog {
    /// The compiled-in catalog: four consumable readings and three
    /// auto-renewing subscriptions.
    #[must_use]
    pub fn builtin() -> Self {
        let consumable = |sku: &str, title: &str, description: &str, micros: u64| {
            ConsumableProduct {
                sku: sku.to_owned(),
                title: title.to_owned(),
                description: description.to_owned(),
                price_micros: Micros(micros),
                purchase_type: PurchaseType::Consumable,
            }
        };
        let subscription = |product_id: &str,
                            title: &str,
                            description: &str,
                            base_plan_id: &str,
                            billing_period: BillingPeriod,
                            micros: u64| Subscription {
            product_id: product_id.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            base_plan: BasePlan {
                base_plan_id: base_plan_id.to_owned(),
                billing_period,
                price_micros: Micros(micros),
                auto_renewing: true,
            },
        };

        Self {
            consumables: vec![
                consumable(
                    "single_system",
                    "Single System Reading",
                    "Get a personalized reading for one astrological system \u{2014} approximately 40 minutes of narrated audio and a 10-page PDF.",
                    13_990_000,
                ),
                consumable(
                    "complete_reading",
                    "Complete Reading (All 5 Systems)",
                    "All 5 astrological systems analyzed for one person \u{2014} 200 minutes of audio, 50 pages. Save 50% vs buying individually.",
                    33_990_000,
                ),
                consumable(
                    "compatibility_overlay",
                    "Compatibility Overlay",
                    "Compare two people in one astrological system \u{2014} individual readings plus a deep compatibility analysis. 120 minutes of audio.",
                    40_990_000,
                ),
                consumable(
                    "nuclear_package",
                    "Nuclear Package (Everything)",
                    "The ultimate package: all 5 systems for both people, all overlays, plus a final verdict. 640+ minutes of audio, 160+ pages. 50% off.",
                    107_990_000,
                ),
            ],
            subscriptions: vec![
                subscription(
                    "basic_monthly",
                    "Basic Monthly",
                    "1 extended reading per month, daily compatibility matching, and ongoing background resonance updates.",
                    "basic-monthly-plan",
                    BillingPeriod::Monthly,
                    20_990_000,
                ),
                subscription(
                    "yearly_subscription",
                    "108 Yearly",
                    "3 extended readings per month, daily compatibility matching, narrated readings with audio and PDF. Best value!",
                    "yearly-plan",
                    BillingPeriod::Yearly,
                    107_990_000,
                ),
                subscription(
                    "billionaire_yearly",
                    "Billionaire",
                    "108 readings per month \u{2014} unlimited compatibility readings, all systems, all overlays. The ultimate experience.",
                    "billionaire-yearly-plan",
                    BillingPeriod::Yearly,
                    10_007_990_000,
                ),
            ],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.consumables.len() + self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumables.is_empty() && self.subscriptions.is_empty()
    }
}

/// Load and validate a catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: Catalog = serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    if catalog.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must define at least one product or subscription".to_string(),
        ));
    }

    for product in &catalog.consumables {
        validate_product_id("sku", &product.sku)?;
        require_text(&product.sku, "title", &product.title)?;
        require_text(&product.sku, "description", &product.description)?;
    }

    for sub in &catalog.subscriptions {
        validate_product_id("product_id", &sub.product_id)?;
        require_text(&sub.product_id, "title", &sub.title)?;
        require_text(&sub.product_id, "description", &sub.description)?;
        validate_base_plan_id(&sub.product_id, &sub.base_plan.base_plan_id)?;
    }

    Ok(())
}

fn require_text(owner: &str, field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "'{owner}' has an empty {field}"
        )));
    }
    Ok(())
}

/// Play product IDs: start with a lowercase letter or digit, then lowercase
/// letters, digits, underscores and periods.
fn validate_product_id(field: &str, id: &str) -> Result<(), ConfigError> {
    let mut chars = id.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_rest =
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.');
    if !valid_start || !valid_rest {
        return Err(ConfigError::Validation(format!(
            "invalid {field} '{id}'; use lowercase letters, digits, '_' or '.', starting with a letter or digit"
        )));
    }
    Ok(())
}

/// Base plan IDs: lowercase letters, digits and hyphens, starting with a
/// letter or digit, at most 63 characters.
fn validate_base_plan_id(product_id: &str, id: &str) -> Result<(), ConfigError> {
    let mut chars = id.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_start || !valid_rest || id.len() > 63 {
        return Err(ConfigError::Validation(format!(
            "subscription '{product_id}' has invalid base_plan_id '{id}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
