//! Cache naming and the static asset manifest.

use url::Url;

use crate::CacheError;

/// Same-origin paths cached eagerly on install.
pub const STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/flyer.html",
    "/styles.css",
    "/script.js",
    "/qrcode.min.js",
    "/manifest.json",
    "/logo-zoll-w.png",
];

const DEFAULT_PREFIX: &str = "zoll-linkz";
const DEFAULT_VERSION: u32 = 2;

/// Settings for one worker version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub prefix: String,
    pub version: u32,
    pub static_assets: Vec<String>,
    /// Activate straight after install instead of waiting for `SKIP_WAITING`.
    pub skip_waiting_on_install: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.into(),
            version: DEFAULT_VERSION,
            static_assets: STATIC_ASSETS.iter().map(|s| (*s).to_string()).collect(),
            skip_waiting_on_install: true,
        }
    }
}

impl CacheConfig {
    pub fn new(prefix: impl Into<String>, version: u32) -> Self {
        Self {
            prefix: prefix.into(),
            version,
            ..Self::default()
        }
    }

    /// Builder: wait for an explicit `SKIP_WAITING` before activating.
    pub fn with_skip_waiting(mut self, val: bool) -> Self {
        self.skip_waiting_on_install = val;
        self
    }

    /// Bucket filled opportunistically at fetch time.
    pub fn runtime_cache_name(&self) -> String {
        format!("{}-v{}", self.prefix, self.version)
    }

    /// Bucket filled from the manifest at install time.
    pub fn static_cache_name(&self) -> String {
        format!("{}-static-v{}", self.prefix, self.version)
    }

    /// Buckets that survive activation.
    pub fn allow_list(&self) -> [String; 2] {
        [self.static_cache_name(), self.runtime_cache_name()]
    }

    /// Manifest entries resolved against the site origin.
    pub fn manifest_urls(&self, origin: &Url) -> Result<Vec<Url>, CacheError> {
        self.static_assets
            .iter()
            .map(|path| {
                origin.join(path).map_err(|source| CacheError::InvalidPath {
                    path: path.clone(),
                    source,
                })
            })
            .collect()
    }
}
