//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

use flyer_engine::parse_ec_level;

static RE_CACHE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,63}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "LINKZ_SITE_ORIGIN" => {
            let url = url::Url::parse(value).map_err(|e| format!("must be a URL ({e})"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err("must be an http or https URL".into());
            }
        }
        "LINKZ_CACHE_PREFIX" => {
            if !RE_CACHE_PREFIX.is_match(value) {
                return Err("must be lowercase letters, digits and '-'".into());
            }
        }
        "LINKZ_CACHE_VERSION" => validate_int_range(value, 1, 9999)?,
        "LINKZ_QR_EC_LEVEL" => {
            if parse_ec_level(value).is_none() {
                return Err("must be one of L, M, Q, H".into());
            }
        }
        // Boolean settings
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i32, max: i32) -> Result<(), String> {
    let v: i32 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "LINKZ_OFFLINE_CACHE")
}
