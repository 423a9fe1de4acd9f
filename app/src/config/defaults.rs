//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    (
        "LINKZ_SITE_ORIGIN",
        "http://localhost:8080/",
        "Origin the resource pages are served from",
    ),
    (
        "LINKZ_SITE_ROOT",
        "",
        "Serve same-origin requests from this directory instead of HTTP",
    ),
    (
        "LINKZ_OUTPUT_DIR",
        "",
        "Directory downloads are written to (default: ~/Downloads)",
    ),
    ("LINKZ_CACHE_PREFIX", "zoll-linkz", "Cache bucket name prefix"),
    ("LINKZ_CACHE_VERSION", "2", "Cache bucket version"),
    (
        "LINKZ_OFFLINE_CACHE",
        "true",
        "Route asset loads through the offline cache",
    ),
    ("LINKZ_QR_EC_LEVEL", "L", "QR error correction level (L, M, Q, H)"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
