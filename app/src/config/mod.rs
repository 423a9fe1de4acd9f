//! Configuration management: defaults, validation, loading from environment.

pub mod app_config;
pub mod defaults;
pub mod manager;
pub mod validation;

pub use app_config::AppConfig;
pub use manager::SettingsManager;

/// Feature availability status.
#[derive(Debug, Clone, Default)]
pub struct FeatureStatus {
    pub offline_cache_enabled: bool,
    pub site_root_configured: bool,
    pub warnings: Vec<String>,
}
