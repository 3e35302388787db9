mod prompt;
mod provision;
mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use playsync_core::AppConfig;
use playsync_publisher::{ClientSettings, PublisherClient, SyncOptions};
use tracing_subscriber::EnvFilter;

use crate::prompt::{AssumeYes, Confirm, StdinConfirm};
use crate::provision::Section;

#[derive(Debug, Parser)]
#[command(name = "playsync")]
#[command(about = "Provision Google Play in-app products and subscriptions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create every catalog item that does not exist yet (default)
    Sync(SyncArgs),
    /// Print the catalog summary without contacting Google Play
    Summary(CatalogArgs),
    /// Print the JSON create payloads without authenticating
    Payloads(CatalogArgs),
}

#[derive(Debug, Default, Args)]
struct CatalogArgs {
    /// YAML catalog to use instead of the configured or built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Default, Args)]
struct SyncArgs {
    /// Android applicationId; overrides PLAYSYNC_PACKAGE_NAME
    #[arg(long)]
    package: Option<String>,

    /// Service account key; overrides PLAYSYNC_SERVICE_ACCOUNT_KEY_PATH
    #[arg(long)]
    key: Option<PathBuf>,

    /// Skip both confirmation prompts
    #[arg(short, long)]
    yes: bool,

    /// Provision only one catalog section
    #[arg(long, value_enum)]
    only: Option<Section>,

    #[command(flatten)]
    catalog: CatalogArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = playsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Sync(args)) => run_sync(config, &args).await,
        Some(Commands::Summary(args)) => run_summary(&config, &args),
        Some(Commands::Payloads(args)) => run_payloads(&config, &args),
        None => run_sync(config, &SyncArgs::default()).await,
    }
}

/// Applies command-line overrides on top of the environment configuration.
fn apply_overrides(mut config: AppConfig, args: &SyncArgs) -> anyhow::Result<AppConfig> {
    if let Some(package) = &args.package {
        playsync_core::validate_package_name(package)?;
        config.package_name.clone_from(package);
    }
    if let Some(key) = &args.key {
        config.service_account_key_path.clone_from(key);
    }
    Ok(config)
}

async fn run_sync(config: AppConfig, args: &SyncArgs) -> anyhow::Result<()> {
    let config = apply_overrides(config, args)?;
    let catalog = provision::resolve_catalog(&config, args.catalog.catalog.as_deref())?;
    let mut stdout = std::io::stdout();

    writeln!(stdout, "{}", report::BANNER)?;

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirm)
    };
    if !provision::confirm_run(&config, &catalog, args.only, confirm.as_mut(), &mut stdout)? {
        return Ok(());
    }

    writeln!(stdout, "\n🔐 Authenticating with Google Play...")?;
    let settings = ClientSettings::from_app_config(&config);
    let client = match PublisherClient::authenticate(&config.service_account_key_path, &settings)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            if let Some(guidance) = provision::auth_guidance(&e) {
                eprintln!("\n{guidance}");
            }
            return Err(e).context("authentication with Google Play failed");
        }
    };
    writeln!(stdout, "   ✅ Authenticated")?;

    let options = SyncOptions::from_app_config(&config);
    tracing::info!(
        package = %options.package_name(),
        items = catalog.len(),
        delay = ?options.inter_call_delay(),
        "starting catalog sync"
    );
    let run = provision::provision(&client, &options, &catalog, args.only, &mut stdout).await;

    writeln!(stdout, "{}", report::render_run_report(&run))?;
    writeln!(stdout, "{}", report::section_header("DONE!"))?;
    writeln!(stdout, "{}", report::NEXT_STEPS)?;

    if run.failed_count() > 0 {
        tracing::warn!(
            failed = run.failed_count(),
            "sync finished with failed items"
        );
    }
    Ok(())
}

fn run_summary(config: &AppConfig, args: &CatalogArgs) -> anyhow::Result<()> {
    let catalog = provision::resolve_catalog(config, args.catalog.as_deref())?;
    println!(
        "{}",
        report::render_summary(
            &config.package_name,
            &config.service_account_key_path,
            &catalog
        )
    );
    Ok(())
}

fn run_payloads(config: &AppConfig, args: &CatalogArgs) -> anyhow::Result<()> {
    let catalog = provision::resolve_catalog(config, args.catalog.as_deref())?;
    println!("{}", provision::render_payloads(&catalog)?);
    Ok(())
}
