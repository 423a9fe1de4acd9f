pub mod cli;
pub mod clipboard;
pub mod config;
pub mod events;
pub mod network;
pub mod pwa;
pub mod session;
pub mod ui;

use config::{AppConfig, SettingsManager};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Log subscriber: `RUST_LOG` filter (default `info`), lines written to `writer`.
pub fn log_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(writer)
        .finish()
}

/// Install the global subscriber. Logs go to stderr; stdout is the page.
pub fn init_tracing() {
    if let Err(e) = tracing::subscriber::set_global_default(log_subscriber(std::io::stderr)) {
        eprintln!("Failed to install log subscriber: {e}");
    }
}

const DOTENV_CANDIDATES: [&str; 3] = [".env", "../.env", "../../.env"];

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    for path in &DOTENV_CANDIDATES {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load settings from .env and the environment, apply CLI overrides, build the config.
pub fn init_foundation(args: &cli::Cli) -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let mut sm = SettingsManager::from_env()?;
    args.apply(&mut sm)?;

    let config = AppConfig::load(&sm)?;

    if let Ok(status) = sm.check_feature_status() {
        for warning in &status.warnings {
            tracing::warn!("{warning}");
        }
    }

    tracing::info!(
        origin = %config.site_origin,
        output_dir = %config.output_dir.display(),
        cache_version = config.cache_version,
        "Settings loaded"
    );
    Ok(config)
}

/// Re-read `.env` and the environment for the cache settings in effect now.
///
/// Values from `.env` override what was loaded at start-up.
pub fn fresh_cache_config() -> Result<offline_cache::CacheConfig, anyhow::Error> {
    for path in &DOTENV_CANDIDATES {
        if dotenvy::from_filename_override(path).is_ok() {
            tracing::debug!("Reloaded .env from: {path}");
            break;
        }
    }
    let sm = SettingsManager::from_env()?;
    Ok(AppConfig::load(&sm)?.cache_config())
}
