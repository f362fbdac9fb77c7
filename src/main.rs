use anyhow::{Context, Result};
use clap::Parser;
use peerdraft_settings::cli::{Cli, Command};
use peerdraft_settings::config::OperatorConfig;
use peerdraft_settings::paths;
use peerdraft_settings::render::render_settings;
use peerdraft_settings::settings::{DataStore, FileDataStore, SettingsStore, UuidGenerator};
use peerdraft_settings::subscription::{
    HttpSubscriptionApi, ReconcileOutcome, SubscriptionReconciler,
};
use std::sync::Arc;

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let operator_path = match cli.operator_config {
        Some(path) => Some(path),
        None => paths::operator_config_path()?,
    };
    let operator = OperatorConfig::load_or_default(operator_path.as_deref())?;

    let data: Arc<dyn DataStore> = match cli.data_file {
        Some(path) => Arc::new(FileDataStore::new(path)),
        None => Arc::new(FileDataStore::in_home()?),
    };
    // Migration runs here, before anything reads the settings.
    let store = Arc::new(SettingsStore::open(data, &operator, &UuidGenerator).await?);

    match cli.command {
        Command::Show => {}
        Command::SetName { name } => {
            store.set_name(&name).await?;
        }
        Command::Connect { email } => {
            let reconciler = SubscriptionReconciler::new(HttpSubscriptionApi::new(), store.clone());
            let outcome = reconciler
                .connect(&email)
                .await
                .context("Could not connect subscription")?;
            if outcome == ReconcileOutcome::NoMatch {
                println!("No active subscription found for '{}'.\n", email);
            }
        }
        Command::Refresh => {
            let reconciler = SubscriptionReconciler::new(HttpSubscriptionApi::new(), store.clone());
            let outcome = reconciler
                .refresh()
                .await
                .context("Could not refresh subscription data")?;
            if outcome == ReconcileOutcome::NoMatch {
                println!("No subscription data available yet.\n");
            }
        }
        Command::Migrate => {
            let settings = store.get().await?;
            let json = serde_json::to_string_pretty(&settings.to_value())
                .context("Failed to serialize settings")?;
            println!("{}", json);
            return Ok(());
        }
    }

    print!("{}", render_settings(&store.get().await?, &operator));
    Ok(())
}
