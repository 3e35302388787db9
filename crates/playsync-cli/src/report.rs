//! Human-readable console output.
//!
//! Everything here is a pure function returning a `String`; callers decide
//! where it is written. Nothing in this module influences a run's outcome.

use std::fmt::Write as _;
use std::path::Path;

use playsync_core::Catalog;
use playsync_publisher::{ItemKind, ItemReport, Progress, SyncOutcome};

const RULE_WIDTH: usize = 60;

pub(crate) const BANNER: &str = "\n\
╔══════════════════════════════════════════════════════════════╗\n\
║  playsync — Google Play Product Setup                        ║\n\
╚══════════════════════════════════════════════════════════════╝";

pub(crate) const NEXT_STEPS: &str = "\n  Next steps:\n\
  1. Verify products in Google Play Console > Monetize\n\
  2. Upload the service account JSON to RevenueCat\n\
  3. Create Offerings in RevenueCat\n\
  4. Test with an internal testing track\n\
  \n\
  App Store in-app purchases have no creation API; set them up\n\
  manually in App Store Connect.\n";

pub(crate) const CREDENTIAL_HELP: &str = "Download a key from Google Cloud Console > IAM > Service Accounts > Keys,\n\
and save it at that path (or point PLAYSYNC_SERVICE_ACCOUNT_KEY_PATH / --key at it).";

pub(crate) const PLACEHOLDER_WARNING: &str = "\n⚠️  WARNING: You haven't set your package name yet!\n   \
Set PLAYSYNC_PACKAGE_NAME (or pass --package) to your app's\n   \
applicationId from android/app/build.gradle.";

/// Per-section tallies of a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub created: usize,
    pub already_exists: usize,
    pub failed: usize,
}

impl Tally {
    pub(crate) fn of(reports: &[ItemReport]) -> Self {
        reports.iter().fold(Self::default(), |mut t, r| {
            match r.outcome {
                SyncOutcome::Created => t.created += 1,
                SyncOutcome::AlreadyExists => t.already_exists += 1,
                SyncOutcome::Failed(_) => t.failed += 1,
            }
            t
        })
    }
}

/// Outcome of a whole run, one list per catalog section.
#[derive(Debug, Default)]
pub(crate) struct RunReport {
    pub consumables: Vec<ItemReport>,
    pub subscriptions: Vec<ItemReport>,
}

impl RunReport {
    pub(crate) fn failed_count(&self) -> usize {
        Tally::of(&self.consumables).failed + Tally::of(&self.subscriptions).failed
    }
}

pub(crate) fn section_header(title: &str) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    format!("\n{rule}\n  {title}\n{rule}")
}

/// Catalog overview shown before the operator confirms a run.
pub(crate) fn render_summary(package_name: &str, key_path: &Path, catalog: &Catalog) -> String {
    let mut out = section_header("SUMMARY");
    let _ = writeln!(out);
    let _ = writeln!(out, "\n  Package Name: {package_name}");
    let _ = writeln!(out, "  Service Key:  {}", key_path.display());

    let _ = writeln!(out, "\n  In-App Products ({}):", catalog.consumables.len());
    for p in &catalog.consumables {
        let _ = writeln!(out, "    • {:<30} ${:>10}", p.sku, p.price_micros.amount());
    }

    let _ = writeln!(out, "\n  Subscriptions ({}):", catalog.subscriptions.len());
    for s in &catalog.subscriptions {
        let plan = &s.base_plan;
        let _ = writeln!(
            out,
            "    • {:<30} ${:>10}/{}",
            s.product_id,
            plan.price_micros.amount(),
            plan.billing_period.unit_label()
        );
    }
    out
}

/// Console line for a synchronizer progress event.
pub(crate) fn progress_line(progress: &Progress<'_>) -> String {
    match progress {
        Progress::Attempting {
            kind: ItemKind::Consumable,
            id,
            price,
            ..
        } => format!("\n  → Creating: {id} ({price})"),
        Progress::Attempting {
            kind: ItemKind::Subscription,
            id,
            ..
        } => format!("\n  → Creating subscription: {id}"),
        Progress::Finished(report) => match &report.outcome {
            SyncOutcome::Created => match report.kind {
                ItemKind::Consumable => "    ✅ Created successfully".to_string(),
                ItemKind::Subscription => {
                    format!("    ✅ Created: {} ({})", report.id, report.title)
                }
            },
            SyncOutcome::AlreadyExists => "    ⚠️  Already exists (skipping)".to_string(),
            SyncOutcome::Failed(reason) => format!("    ❌ Error: {reason}"),
        },
    }
}

/// Totals and failure reasons after a run.
pub(crate) fn render_run_report(report: &RunReport) -> String {
    let mut out = section_header("RESULTS");
    let _ = writeln!(out);

    for (label, items) in [
        ("In-App Products", &report.consumables),
        ("Subscriptions", &report.subscriptions),
    ] {
        if items.is_empty() {
            continue;
        }
        let tally = Tally::of(items);
        let _ = writeln!(
            out,
            "\n  {label}: {} created, {} already existed, {} failed",
            tally.created, tally.already_exists, tally.failed
        );
        for item in items {
            if let SyncOutcome::Failed(reason) = &item.outcome {
                let _ = writeln!(out, "    ❌ {}: {reason}", item.id);
            }
        }
    }
    out
}
