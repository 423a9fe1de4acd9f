//! Runtime application configuration loaded from the environment.

use std::path::PathBuf;

use anyhow::Context;
use flyer_engine::{DEFAULT_EC_LEVEL, EcLevel, parse_ec_level};
use offline_cache::CacheConfig;
use url::Url;

use super::manager::SettingsManager;

const DEFAULT_ORIGIN: &str = "http://localhost:8080/";

/// Runtime configuration populated from the settings manager.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub site_origin: Url,
    pub site_root: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub cache_prefix: String,
    pub cache_version: u32,
    pub offline_cache: bool,
    pub qr_ec_level: EcLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            site_root: None,
            output_dir: default_output_dir(),
            cache_prefix: "zoll-linkz".into(),
            cache_version: 2,
            offline_cache: true,
            qr_ec_level: DEFAULT_EC_LEVEL,
        }
    }
}

impl AppConfig {
    /// Load configuration from the settings manager.
    pub fn load(sm: &SettingsManager) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> String { sm.get_setting(key).unwrap_or_default() };

        let site_origin = Url::parse(&g("LINKZ_SITE_ORIGIN")).context("LINKZ_SITE_ORIGIN")?;
        let cache_version = g("LINKZ_CACHE_VERSION")
            .parse()
            .context("LINKZ_CACHE_VERSION")?;
        let qr_ec_level = parse_ec_level(&g("LINKZ_QR_EC_LEVEL")).unwrap_or(DEFAULT_EC_LEVEL);

        Ok(Self {
            site_origin,
            site_root: non_empty_path(g("LINKZ_SITE_ROOT")),
            output_dir: non_empty_path(g("LINKZ_OUTPUT_DIR")).unwrap_or_else(default_output_dir),
            cache_prefix: g("LINKZ_CACHE_PREFIX"),
            cache_version,
            offline_cache: g("LINKZ_OFFLINE_CACHE") == "true",
            qr_ec_level,
        })
    }

    /// Worker settings for the configured cache version.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.cache_prefix.clone(), self.cache_version)
    }
}

fn non_empty_path(s: String) -> Option<PathBuf> {
    if s.is_empty() { None } else { Some(PathBuf::from(s)) }
}

/// `~/Downloads` if it exists, else the working directory.
fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
