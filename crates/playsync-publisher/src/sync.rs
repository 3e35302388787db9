//! Sequential create-or-skip synchronization of catalog definitions.
//!
//! Each definition is turned into a payload, sent once, and classified as
//! [`SyncOutcome::Created`], [`SyncOutcome::AlreadyExists`] or
//! [`SyncOutcome::Failed`]. A failed item never stops the run, and every call
//! is followed by a fixed pause of at least [`MIN_INTER_CALL_DELAY_MS`].

use std::time::Duration;

use playsync_core::{AppConfig, ConsumableProduct, Micros, Subscription, MIN_INTER_CALL_DELAY_MS};

use crate::api::CatalogApi;
use crate::error::PublisherError;
use crate::payload::{build_consumable_payload, build_subscription_payload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    /// The remote catalog already holds the entry. Counts as success; the
    /// existing entry is left untouched.
    AlreadyExists,
    Failed(String),
}

impl SyncOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, SyncOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Consumable,
    Subscription,
}

/// Result of provisioning one catalog definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub kind: ItemKind,
    /// SKU or subscription product ID.
    pub id: String,
    pub title: String,
    pub outcome: SyncOutcome,
}

/// Per-item progress, reported before and after each remote call.
#[derive(Debug)]
pub enum Progress<'a> {
    Attempting {
        kind: ItemKind,
        id: &'a str,
        title: &'a str,
        price: Micros,
    },
    Finished(&'a ItemReport),
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    package_name: String,
    inter_call_delay: Duration,
}

impl SyncOptions {
    /// `inter_call_delay` is raised to the 500 ms floor if set lower.
    #[must_use]
    pub fn new(package_name: &str, inter_call_delay: Duration) -> Self {
        Self {
            package_name: package_name.to_string(),
            inter_call_delay: inter_call_delay.max(Duration::from_millis(MIN_INTER_CALL_DELAY_MS)),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(&config.package_name, config.inter_call_delay())
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    #[must_use]
    pub fn inter_call_delay(&self) -> Duration {
        self.inter_call_delay
    }
}

/// Creates each consumable in list order, continuing past failures.
pub async fn sync_consumables<A, F>(
    api: &A,
    options: &SyncOptions,
    products: &[ConsumableProduct],
    mut on_progress: F,
) -> Vec<ItemReport>
where
    A: CatalogApi + ?Sized,
    F: FnMut(Progress<'_>),
{
    let mut reports = Vec::with_capacity(products.len());

    for product in products {
        on_progress(Progress::Attempting {
            kind: ItemKind::Consumable,
            id: &product.sku,
            title: &product.title,
            price: product.price_micros,
        });

        let payload = build_consumable_payload(product);
        let result = api
            .create_consumable_product(&options.package_name, &payload)
            .await;

        let report = ItemReport {
            kind: ItemKind::Consumable,
            id: product.sku.clone(),
            title: product.title.clone(),
            outcome: classify(result),
        };
        log_outcome(&report);
        on_progress(Progress::Finished(&report));
        reports.push(report);

        tokio::time::sleep(options.inter_call_delay).await;
    }

    reports
}

/// Creates each subscription, with its base plan, in list order, continuing
/// past failures.
pub async fn sync_subscriptions<A, F>(
    api: &A,
    options: &SyncOptions,
    subscriptions: &[Subscription],
    mut on_progress: F,
) -> Vec<ItemReport>
where
    A: CatalogApi + ?Sized,
    F: FnMut(Progress<'_>),
{
    let mut reports = Vec::with_capacity(subscriptions.len());

    for sub in subscriptions {
        on_progress(Progress::Attempting {
            kind: ItemKind::Subscription,
            id: &sub.product_id,
            title: &sub.title,
            price: sub.base_plan.price_micros,
        });

        let payload = build_subscription_payload(sub);
        let result = api
            .create_subscription(&options.package_name, &sub.product_id, &payload)
            .await;

        let report = ItemReport {
            kind: ItemKind::Subscription,
            id: sub.product_id.clone(),
            title: sub.title.clone(),
            outcome: classify(result),
        };
        log_outcome(&report);
        on_progress(Progress::Finished(&report));
        reports.push(report);

        tokio::time::sleep(options.inter_call_delay).await;
    }

    reports
}

fn classify(result: Result<(), PublisherError>) -> SyncOutcome {
    match result {
        Ok(()) => SyncOutcome::Created,
        Err(e) if e.is_conflict() => SyncOutcome::AlreadyExists,
        Err(e) => SyncOutcome::Failed(e.to_string()),
    }
}

/// Consumables are logged under `sku`, subscriptions under `product_id`.
fn log_outcome(report: &ItemReport) {
    let id = report.id.as_str();
    match (report.kind, &report.outcome) {
        (ItemKind::Consumable, SyncOutcome::Created) => {
            tracing::info!(sku = %id, "created in-app product");
        }
        (ItemKind::Consumable, SyncOutcome::AlreadyExists) => {
            tracing::info!(sku = %id, "in-app product already exists, skipping");
        }
        (ItemKind::Consumable, SyncOutcome::Failed(reason)) => {
            tracing::warn!(sku = %id, error = %reason, "failed to create in-app product");
        }
        (ItemKind::Subscription, SyncOutcome::Created) => {
            tracing::info!(product_id = %id, "created subscription");
        }
        (ItemKind::Subscription, SyncOutcome::AlreadyExists) => {
            tracing::info!(product_id = %id, "subscription already exists, skipping");
        }
        (ItemKind::Subscription, SyncOutcome::Failed(reason)) => {
            tracing::warn!(product_id = %id, error = %reason, "failed to create subscription");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Metadata, Subscriber};

    use super::*;

    /// Collects the field names of every event it sees.
    #[derive(Clone, Default)]
    struct FieldNames(Arc<Mutex<Vec<String>>>);

    impl Visit for FieldNames {
        fn record_debug(&mut self, field: &Field, _value: &dyn std::fmt::Debug) {
            self.0.lock().unwrap().push(field.name().to_string());
        }
    }

    impl Subscriber for FieldNames {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _span: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }
        fn record(&self, _span: &Id, _values: &Record<'_>) {}
        fn record_follows_from(&self, _span: &Id, _follows: &Id) {}
        fn event(&self, event: &Event<'_>) {
            event.record(&mut self.clone());
        }
        fn enter(&self, _span: &Id) {}
        fn exit(&self, _span: &Id) {}
    }

    fn logged_fields(report: &ItemReport) -> Vec<String> {
        let names = FieldNames::default();
        tracing::subscriber::with_default(names.clone(), || log_outcome(report));
        let fields = names.0.lock().unwrap().clone();
        fields
    }

    fn report(kind: ItemKind, outcome: SyncOutcome) -> ItemReport {
        ItemReport {
            kind,
            id: "single_system".to_string(),
            title: "Single System Reading".to_string(),
            outcome,
        }
    }

    #[test]
    fn consumable_outcomes_are_logged_under_sku() {
        for outcome in [
            SyncOutcome::Created,
            SyncOutcome::AlreadyExists,
            SyncOutcome::Failed("boom".to_string()),
        ] {
            let fields = logged_fields(&report(ItemKind::Consumable, outcome));
            assert!(fields.iter().any(|f| f == "sku"), "got {fields:?}");
            assert!(!fields.iter().any(|f| f == "product_id" || f == "id"));
        }
    }

    #[test]
    fn subscription_outcomes_are_logged_under_product_id() {
        for outcome in [
            SyncOutcome::Created,
            SyncOutcome::AlreadyExists,
            SyncOutcome::Failed("boom".to_string()),
        ] {
            let fields = logged_fields(&report(ItemKind::Subscription, outcome));
            assert!(fields.iter().any(|f| f == "product_id"), "got {fields:?}");
            assert!(!fields.iter().any(|f| f == "sku" || f == "id"));
        }
    }

    #[test]
    fn failures_carry_the_error_field() {
        let fields = logged_fields(&report(
            ItemKind::Subscription,
            SyncOutcome::Failed("HTTP 403".to_string()),
        ));
        assert!(fields.iter().any(|f| f == "error"));
    }

    #[test]
    fn classify_ok_is_created() {
        assert_eq!(classify(Ok(())), SyncOutcome::Created);
    }

    #[test]
    fn classify_conflict_is_already_exists() {
        let err = PublisherError::Api {
            status: 409,
            code: Some("ALREADY_EXISTS".to_string()),
            message: "exists".to_string(),
        };
        assert_eq!(classify(Err(err)), SyncOutcome::AlreadyExists);
    }

    #[test]
    fn classify_other_error_is_failed_with_reason() {
        let err = PublisherError::Api {
            status: 403,
            code: Some("PERMISSION_DENIED".to_string()),
            message: "The caller does not have permission".to_string(),
        };
        match classify(Err(err)) {
            SyncOutcome::Failed(reason) => {
                assert!(reason.contains("HTTP 403"));
                assert!(reason.contains("does not have permission"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn options_clamp_delay_to_floor() {
        let options = SyncOptions::new("com.example.app", Duration::from_millis(10));
        assert_eq!(options.inter_call_delay(), Duration::from_millis(500));
        let options = SyncOptions::new("com.example.app", Duration::from_secs(2));
        assert_eq!(options.inter_call_delay(), Duration::from_secs(2));
        assert_eq!(options.package_name(), "com.example.app");
    }

    #[test]
    fn already_exists_counts_as_success() {
        assert!(SyncOutcome::Created.is_success());
        assert!(SyncOutcome::AlreadyExists.is_success());
        assert!(!SyncOutcome::Failed("boom".to_string()).is_success());
    }
}
