//! SettingsManager: environment-backed settings with defaults and feature status.

use std::collections::HashMap;
use std::path::Path;

use super::FeatureStatus;
use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

/// Resolves settings from explicit overrides, then defaults.
///
/// Nothing is persisted; [`SettingsManager::from_env`] snapshots the
/// process environment once at start-up.
#[derive(Debug, Clone, Default)]
pub struct SettingsManager {
    values: HashMap<String, String>,
}

impl SettingsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up every known key present in the environment.
    ///
    /// Invalid values are rejected with the key named in the error.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let mut sm = Self::new();
        for key in DEFAULT_SETTINGS.keys() {
            if let Ok(env_val) = std::env::var(key) {
                sm.set_setting(key, &env_val)?;
                tracing::debug!("Setting from env: {key}");
            }
        }
        Ok(sm)
    }

    /// Get a setting value. Falls back to default if not set.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.values.get(key) {
            return Ok(val.clone());
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            anyhow::bail!("unknown setting key: {key}");
        }

        let value = value.trim();
        validate_setting(key, value).map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;

        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Check which features are properly configured.
    pub fn check_feature_status(&self) -> Result<FeatureStatus, anyhow::Error> {
        let mut status = FeatureStatus {
            offline_cache_enabled: self.get_setting("LINKZ_OFFLINE_CACHE")? == "true",
            ..FeatureStatus::default()
        };

        let site_root = self.get_setting("LINKZ_SITE_ROOT")?;
        if !site_root.is_empty() {
            status.site_root_configured = true;
            if !Path::new(&site_root).is_dir() {
                status
                    .warnings
                    .push(format!("LINKZ_SITE_ROOT is not a directory: {site_root}"));
            }
        }

        if !status.offline_cache_enabled {
            status
                .warnings
                .push("LINKZ_OFFLINE_CACHE is disabled - assets always come from the network".into());
        }

        Ok(status)
    }
}
