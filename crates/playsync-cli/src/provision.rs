//! The `sync` run: confirmation gates, then consumables followed by
//! subscriptions, with progress written as it happens.

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use playsync_core::{load_catalog, AppConfig, Catalog, ConfigError};
use playsync_publisher::payload::{InAppProductPayload, SubscriptionPayload};
use playsync_publisher::{
    build_consumable_payload, build_subscription_payload, sync_consumables, sync_subscriptions,
    AuthError, CatalogApi, PublisherError, SyncOptions,
};
use serde::Serialize;

use crate::prompt::Confirm;
use crate::report::{
    progress_line, render_summary, section_header, RunReport, CREDENTIAL_HELP, PLACEHOLDER_WARNING,
};

/// Restricts a run to one catalog section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Section {
    Consumables,
    Subscriptions,
}

impl Section {
    fn includes(only: Option<Section>, section: Section) -> bool {
        only.is_none_or(|s| s == section)
    }
}

/// The part of `catalog` a run restricted to `only` will provision.
pub(crate) fn selected(catalog: &Catalog, only: Option<Section>) -> Catalog {
    Catalog {
        consumables: if Section::includes(only, Section::Consumables) {
            catalog.consumables.clone()
        } else {
            Vec::new()
        },
        subscriptions: if Section::includes(only, Section::Subscriptions) {
            catalog.subscriptions.clone()
        } else {
            Vec::new()
        },
    }
}

fn proceed_question(only: Option<Section>) -> &'static str {
    match only {
        None => "\nProceed with creating all products?",
        Some(Section::Consumables) => "\nProceed with creating in-app products only?",
        Some(Section::Subscriptions) => "\nProceed with creating subscriptions only?",
    }
}

/// Line sink for run progress. After the first failed write (e.g. a closed
/// pipe) it logs once and drops later lines; the run itself continues.
struct Console<'w, W: Write> {
    out: &'w mut W,
    broken: bool,
}

impl<'w, W: Write> Console<'w, W> {
    fn new(out: &'w mut W) -> Self {
        Self { out, broken: false }
    }

    fn line(&mut self, text: &str) {
        if self.broken {
            return;
        }
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "console output failed, continuing without progress lines");
            self.broken = true;
        }
    }
}

/// Catalog from `override_path`, else the configured file, else the
/// built-in catalog.
pub(crate) fn resolve_catalog(
    config: &AppConfig,
    override_path: Option<&Path>,
) -> Result<Catalog, ConfigError> {
    match override_path.or(config.catalog_path.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading catalog file");
            load_catalog(path)
        }
        None => Ok(Catalog::builtin()),
    }
}

/// Runs both confirmation gates. Returns `false` when the operator declines
/// either one; nothing remote has happened at that point.
///
/// The summary shows only the sections `only` selects.
pub(crate) fn confirm_run<C, W>(
    config: &AppConfig,
    catalog: &Catalog,
    only: Option<Section>,
    confirm: &mut C,
    out: &mut W,
) -> std::io::Result<bool>
where
    C: Confirm + ?Sized,
    W: Write,
{
    if config.uses_placeholder_package() {
        writeln!(out, "{PLACEHOLDER_WARNING}")?;
        if !confirm.confirm("\nContinue anyway?")? {
            writeln!(out, "Cancelled.")?;
            return Ok(false);
        }
    }

    writeln!(
        out,
        "{}",
        render_summary(
            &config.package_name,
            &config.service_account_key_path,
            &selected(catalog, only)
        )
    )?;

    if !confirm.confirm(proceed_question(only))? {
        writeln!(out, "Cancelled.")?;
        return Ok(false);
    }
    Ok(true)
}

/// Provisions the selected sections in order and returns what happened to
/// each item. Per-item failures are recorded in the report, never returned.
pub(crate) async fn provision<A, W>(
    api: &A,
    options: &SyncOptions,
    catalog: &Catalog,
    only: Option<Section>,
    out: &mut W,
) -> RunReport
where
    A: CatalogApi + ?Sized,
    W: Write,
{
    let mut report = RunReport::default();
    let mut console = Console::new(out);

    if Section::includes(only, Section::Consumables) {
        console.line(&section_header("CREATING IN-APP PRODUCTS"));
        report.consumables = sync_consumables(api, options, &catalog.consumables, |p| {
            console.line(&progress_line(&p));
        })
        .await;
    }

    if Section::includes(only, Section::Subscriptions) {
        console.line(&section_header("CREATING SUBSCRIPTIONS"));
        report.subscriptions = sync_subscriptions(api, options, &catalog.subscriptions, |p| {
            console.line(&progress_line(&p));
        })
        .await;
    }

    report
}

/// Operator-facing explanation for an authentication failure, when there is
/// a concrete fix to suggest.
pub(crate) fn auth_guidance(err: &PublisherError) -> Option<String> {
    match err {
        PublisherError::Auth(AuthError::CredentialNotFound { path }) => Some(format!(
            "❌ Service account key not found at: {path}\n{CREDENTIAL_HELP}"
        )),
        PublisherError::Auth(AuthError::CredentialInvalid { path, reason }) => Some(format!(
            "❌ Service account key at {path} is not usable: {reason}\n{CREDENTIAL_HELP}"
        )),
        PublisherError::Auth(AuthError::TokenRejected { message, .. }) => Some(format!(
            "❌ Google rejected the service account: {message}\n\
             Check that the account is linked in Play Console > Users and permissions."
        )),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionRequest {
    #[serde(rename = "productId")]
    product_id: String,
    body: SubscriptionPayload,
}

#[derive(Debug, Serialize)]
struct PayloadDump {
    inappproducts: Vec<InAppProductPayload>,
    subscriptions: Vec<SubscriptionRequest>,
}

/// Every create request body for `catalog`, as pretty-printed JSON.
pub(crate) fn render_payloads(catalog: &Catalog) -> serde_json::Result<String> {
    let dump = PayloadDump {
        inappproducts: catalog
            .consumables
            .iter()
            .map(build_consumable_payload)
            .collect(),
        subscriptions: catalog
            .subscriptions
            .iter()
            .map(|sub| SubscriptionRequest {
                product_id: sub.product_id.clone(),
                body: build_subscription_payload(sub),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&dump)
}

#[cfg(test)]
#[path = "provision_test.rs"]
mod tests;
