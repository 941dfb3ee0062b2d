use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

use triage::app::{App, AppEvent};
use triage::board::Article;
use triage::config::Config;
use triage::net::{self, SyncNotifier};
use triage::preferences::PreferenceManager;
use triage::storage::{Database, DatabaseError};
use triage::ui;

/// How long unfinished status updates may run after the UI closes.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Get the config directory path (~/.config/triage/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("triage"))
}

/// Create the config directory if needed and restrict it to the current user.
fn prepare_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // SEC-007: user-only access on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "triage", version, about = "Keyboard-driven triage board for syndicated articles")]
struct Args {
    /// Article service base URL (overrides `server_url` in config.toml)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Load articles from a JSON file instead of the service (disables sync)
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Do not report moves to the article service
    #[arg(long)]
    offline: bool,

    /// Delete stored board preferences before starting
    #[arg(long)]
    reset_prefs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so output never lands in the alternate screen buffer
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    prepare_config_dir(&config_dir)?;

    let mut config =
        Config::load(&config_dir.join("config.toml")).context("Failed to load config.toml")?;
    if let Some(server) = args.server {
        config.server_url = server;
    }
    let server_url = config.server_url().context("Invalid server URL")?;

    // Handle --reset-prefs flag
    let db_path = config_dir.join("prefs.db");
    if args.reset_prefs && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete preference database")?;
        println!("Preferences reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of triage appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to open preference database: {}", e)),
    };

    let prefs = match PreferenceManager::load(&config, &db).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read stored preferences, using config only");
            PreferenceManager::from_config(&config)
        }
    };

    let client = net::build_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let articles = load_articles(&args.import, &client, &server_url, &config).await?;

    let sync_on = config.sync_enabled && !args.offline && args.import.is_none();
    let notifier = sync_on.then(|| {
        SyncNotifier::new(client.clone(), server_url.clone(), config.request_timeout())
    });
    if notifier.is_none() {
        tracing::info!("Sync disabled, moves stay local");
    }

    let mut app = App::new(db.clone(), prefs)
        .with_notifier(notifier)
        .with_theme(config.theme_variant());
    let duplicates = app.load_articles(articles);
    if duplicates > 0 {
        tracing::info!(duplicates, "Dropped articles with duplicate links");
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let result = ui::run(&mut app, event_tx, event_rx).await;

    app.drain_syncs(SHUTDOWN_GRACE).await;
    drop(app);
    db.close().await;

    result?;
    println!("Goodbye!");
    Ok(())
}

/// Fetch the article list from the service, or read it from `--import`.
async fn load_articles(
    import: &Option<PathBuf>,
    client: &reqwest::Client,
    server_url: &Url,
    config: &Config,
) -> Result<Vec<Article>> {
    let articles = match import {
        Some(path) => net::load_articles_file(path)
            .await
            .with_context(|| format!("Failed to import articles from {}", path.display()))?,
        None => net::fetch_articles(client, server_url, config.request_timeout())
            .await
            .with_context(|| format!("Failed to load articles from {}", server_url))?,
    };

    println!("Loaded {} articles", articles.len());
    Ok(articles)
}
