use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::config::SettingsManager;

#[derive(Debug, Parser)]
#[command(name = "linkz")]
#[command(about = "Generate QR-code flyers for ZOLL resource pages", long_about = None)]
pub struct Cli {
    /// Flyer template type, e.g. `xseries-video`
    #[arg(long = "type", short = 't')]
    pub page_type: Option<String>,

    /// Flyer page URL carrying a `type` query parameter
    #[arg(long, conflicts_with = "page_type")]
    pub page_url: Option<Url>,

    /// Serve site files from this directory instead of HTTP
    #[arg(long)]
    pub site_root: Option<PathBuf>,

    /// Where downloaded flyers are written
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Disable the offline cache
    #[arg(long)]
    pub no_cache: bool,
}

impl Cli {
    /// The page type from `--type`, or from `--page-url`'s query.
    pub fn page_type(&self) -> Option<String> {
        self.page_type
            .clone()
            .or_else(|| self.page_url.as_ref().and_then(page_type_from_url))
    }

    /// Layer command-line overrides over environment settings.
    pub fn apply(&self, sm: &mut SettingsManager) -> Result<(), anyhow::Error> {
        if let Some(root) = &self.site_root {
            sm.set_setting("LINKZ_SITE_ROOT", &root.to_string_lossy())?;
        }
        if let Some(dir) = &self.output_dir {
            sm.set_setting("LINKZ_OUTPUT_DIR", &dir.to_string_lossy())?;
        }
        if self.no_cache {
            sm.set_setting("LINKZ_OFFLINE_CACHE", "false")?;
        }
        Ok(())
    }
}

/// Value of the first `type` query parameter.
pub fn page_type_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "type")
        .map(|(_, v)| v.into_owned())
}
