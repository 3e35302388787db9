//! Create-request bodies for the Android Publisher API.
//!
//! Builders here are pure: the same definition always yields the same
//! payload, and maps are ordered so the serialized JSON is byte-stable.

use std::collections::BTreeMap;

use playsync_core::{
    ConsumableProduct, Subscription, CURRENCY_CODE, LISTING_LANGUAGE, REGION_CODE,
};
use serde::Serialize;

/// Body of `inappproducts.insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppProductPayload {
    pub sku: String,
    pub status: String,
    pub purchase_type: String,
    pub default_language: String,
    pub listings: BTreeMap<String, InAppProductListing>,
    pub default_price: DefaultPrice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InAppProductListing {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPrice {
    /// Decimal string, e.g. `"13990000"`.
    pub price_micros: String,
    pub currency: String,
}

/// Body of `monetization.subscriptions.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPayload {
    pub product_id: String,
    pub listings: Vec<SubscriptionListing>,
    pub base_plans: Vec<BasePlanPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListing {
    pub language_code: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePlanPayload {
    pub base_plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renewing_base_plan_type: Option<BillingPeriodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepaid_base_plan_type: Option<BillingPeriodType>,
    pub regional_configs: Vec<RegionalConfig>,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriodType {
    pub billing_period_duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalConfig {
    pub region_code: String,
    pub price: Money,
}

/// Google's `Money` type: whole `units` as a decimal string plus `nanos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub units: String,
    pub nanos: u32,
}

#[must_use]
pub fn build_consumable_payload(product: &ConsumableProduct) -> InAppProductPayload {
    let mut listings = BTreeMap::new();
    listings.insert(
        LISTING_LANGUAGE.to_string(),
        InAppProductListing {
            title: product.title.clone(),
            description: product.description.clone(),
        },
    );

    InAppProductPayload {
        sku: product.sku.clone(),
        status: "active".to_string(),
        purchase_type: product.purchase_type.api_value().to_string(),
        default_language: LISTING_LANGUAGE.to_string(),
        listings,
        default_price: DefaultPrice {
            price_micros: product.price_micros.get().to_string(),
            currency: CURRENCY_CODE.to_string(),
        },
    }
}

/// Builds the subscription body with its single base plan nested inside.
///
/// Auto-renewing plans use `autoRenewingBasePlanType`; a plan with
/// `auto_renewing: false` is sent as a prepaid plan with the same period.
#[must_use]
pub fn build_subscription_payload(sub: &Subscription) -> SubscriptionPayload {
    let plan = &sub.base_plan;
    let period = BillingPeriodType {
        billing_period_duration: plan.billing_period.iso8601().to_string(),
    };
    let (auto_renewing, prepaid) = if plan.auto_renewing {
        (Some(period), None)
    } else {
        (None, Some(period))
    };

    SubscriptionPayload {
        product_id: sub.product_id.clone(),
        listings: vec![SubscriptionListing {
            language_code: LISTING_LANGUAGE.to_string(),
            title: sub.title.clone(),
            description: sub.description.clone(),
        }],
        base_plans: vec![BasePlanPayload {
            base_plan_id: plan.base_plan_id.clone(),
            auto_renewing_base_plan_type: auto_renewing,
            prepaid_base_plan_type: prepaid,
            regional_configs: vec![RegionalConfig {
                region_code: REGION_CODE.to_string(),
                price: Money {
                    currency_code: CURRENCY_CODE.to_string(),
                    units: plan.price_micros.units().to_string(),
                    nanos: plan.price_micros.nanos(),
                },
            }],
            state: "ACTIVE".to_string(),
        }],
    }
}
