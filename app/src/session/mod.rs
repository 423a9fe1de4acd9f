//! The page session: everything one flyer page holds between events.
//!
//! One session is created per page load and owned by the event loop.
//! Handlers run to completion one at a time, so no state here is shared.

#[cfg(test)]
mod tests;

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use flyer_engine::{
    Breadcrumb, TemplateDescriptor, TemplateError, download_file_name, encode_png, render_flyer,
    resolve_template,
};
use image::{DynamicImage, RgbaImage};
use offline_cache::{CacheConfig, Network, Registration, Request};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::clipboard::{ClipboardImage, ClipboardProvider};
use crate::config::AppConfig;
use crate::events::{HELP, PageEvent};
use crate::pwa::{InstallOutcome, InstallPrompt, update_notification};
use crate::ui::{self, PageUi};

/// Where the background art stands.
#[derive(Debug, Clone)]
pub enum BackgroundState {
    /// Not requested yet, or reloading.
    Pending,
    Loaded(DynamicImage),
    /// Fetch or decode failed; the user has been told.
    Missing,
}

pub struct PageSession<N> {
    config: AppConfig,
    page_type: Option<String>,
    template: Option<TemplateDescriptor>,
    background: BackgroundState,
    flyer: Option<RgbaImage>,
    registration: Registration<N>,
    install_prompt: Option<InstallPrompt>,
    installed: bool,
    update_visible: bool,
    ui: Box<dyn PageUi>,
    clipboard: Box<dyn ClipboardProvider>,
}

impl<N: Network> PageSession<N> {
    pub fn new(
        config: AppConfig,
        page_type: Option<String>,
        network: Arc<N>,
        ui: Box<dyn PageUi>,
        clipboard: Box<dyn ClipboardProvider>,
    ) -> Self {
        let registration = Registration::new(config.site_origin.clone(), network);
        Self {
            config,
            page_type,
            template: None,
            background: BackgroundState::Pending,
            flyer: None,
            registration,
            install_prompt: None,
            installed: false,
            update_visible: false,
            ui,
            clipboard,
        }
    }

    pub fn template(&self) -> Option<&TemplateDescriptor> {
        self.template.as_ref()
    }

    pub fn background(&self) -> &BackgroundState {
        &self.background
    }

    /// The last successfully generated flyer.
    pub fn flyer(&self) -> Option<&RgbaImage> {
        self.flyer.as_ref()
    }

    pub fn registration(&self) -> &Registration<N> {
        &self.registration
    }

    pub fn install_available(&self) -> bool {
        self.install_prompt.is_some()
    }

    pub fn update_visible(&self) -> bool {
        self.update_visible
    }

    pub async fn dispatch(&mut self, event: PageEvent) -> ControlFlow<()> {
        match event {
            PageEvent::Load => self.on_load().await,
            PageEvent::Generate(url) => self.on_generate(&url),
            PageEvent::Download => {
                self.on_download().await;
            }
            PageEvent::Copy => self.on_copy(),
            PageEvent::CheckUpdate(version) => self.on_check_update(version).await,
            PageEvent::Update => self.on_update().await,
            PageEvent::DismissUpdate => self.on_dismiss_update(),
            PageEvent::Install(choice) => self.on_install(choice),
            PageEvent::Help => self.ui.status(HELP),
            PageEvent::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Register the worker, resolve the template, start the background load.
    pub async fn on_load(&mut self) {
        let cache_config = self.config.cache_config();
        self.register_worker(cache_config).await;

        match resolve_template(self.page_type.as_deref()) {
            Ok(template) => {
                self.ui
                    .status(&Breadcrumb::for_template(&template).to_string());
                self.template = Some(template);
            }
            Err(TemplateError::MissingType) => {
                self.ui.alert(ui::MSG_INVALID_ACCESS);
                return;
            }
            Err(e @ TemplateError::InvalidType(_)) => {
                warn!("Rejected page type: {e}");
                self.ui.alert(ui::MSG_INVALID_ACCESS);
                return;
            }
        }

        self.load_background().await;
    }

    /// Install a worker version; an update over a running one shows the notification.
    ///
    /// Registration failures are logged and otherwise ignored.
    pub async fn register_worker(&mut self, cache_config: CacheConfig) {
        if !self.config.offline_cache {
            debug!("Offline cache disabled, skipping Service Worker registration");
            return;
        }

        match self.registration.register(cache_config).await {
            Ok(outcome) => {
                debug!(?outcome, "Service Worker registration finished");
                if outcome.update_available() {
                    self.update_visible = true;
                    self.ui.status(&update_notification());
                }
                if !self.installed && self.install_prompt.is_none() {
                    self.install_prompt = Some(InstallPrompt::new());
                    self.ui
                        .status("Linkz can be installed: type `install` to add it to this device.");
                }
            }
            Err(e) => warn!("Service Worker registration failed: {e}"),
        }
    }

    async fn load_background(&mut self) {
        let Some(template) = self.template.as_ref() else {
            return;
        };
        let page_type = template.id.clone();

        let loaded = match self.registration.origin().join(&template.background_path) {
            Ok(url) => {
                let request = Request::get(url);
                match self.registration.fetch(&request).await {
                    Ok(resp) if resp.ok() => {
                        image::load_from_memory(&resp.body).map_err(|e| e.to_string())
                    }
                    Ok(resp) => Err(format!("status {}", resp.status)),
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(e.to_string()),
        };

        match loaded {
            Ok(img) => {
                info!(
                    page_type = %page_type,
                    width = img.width(),
                    height = img.height(),
                    "Background image loaded"
                );
                self.background = BackgroundState::Loaded(img);
            }
            Err(reason) => {
                warn!(page_type = %page_type, reason = %reason, "Background image not found");
                self.background = BackgroundState::Missing;
                self.ui.alert(&ui::background_missing(&page_type));
            }
        }
    }

    /// Render the flyer for `url`. On failure the previous flyer is kept.
    pub fn on_generate(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            self.ui.alert(ui::MSG_EMPTY_URL);
            return;
        }
        let Some(template) = self.template.as_ref() else {
            self.ui.alert(ui::MSG_INVALID_ACCESS);
            return;
        };
        let BackgroundState::Loaded(background) = &self.background else {
            self.ui.alert(ui::MSG_NOT_LOADED);
            return;
        };

        match render_flyer(template, background, url, self.config.qr_ec_level) {
            Ok(flyer) => {
                info!(page_type = %template.id, url, "Flyer generated");
                self.flyer = Some(flyer);
                self.ui
                    .status("Flyer generated. Type `download` or `copy`.");
            }
            Err(e) => {
                warn!("Flyer generation failed: {e}");
                self.ui.alert(&format!("{} ({e})", ui::MSG_QR_UNAVAILABLE));
            }
        }
    }

    /// Save the flyer as `<type>-flyer.png` in the output directory.
    pub async fn on_download(&mut self) -> Option<PathBuf> {
        let (Some(flyer), Some(template)) = (self.flyer.as_ref(), self.template.as_ref()) else {
            self.ui.alert(ui::MSG_NOTHING_GENERATED);
            return None;
        };

        let png = match encode_png(flyer) {
            Ok(png) => png,
            Err(e) => {
                error!("Failed to encode flyer: {e}");
                self.ui.alert(&format!("Failed to save flyer: {e}"));
                return None;
            }
        };
        let path = self.config.output_dir.join(download_file_name(&template.id));

        let written = match tokio::fs::create_dir_all(&self.config.output_dir).await {
            Ok(()) => tokio::fs::write(&path, &png).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => {
                info!(path = %path.display(), bytes = png.len(), "Flyer saved");
                self.ui.status(&format!("Saved {}", path.display()));
                Some(path)
            }
            Err(e) => {
                error!(path = %path.display(), "Failed to save flyer: {e}");
                self.ui.alert(&format!("Failed to save flyer: {e}"));
                None
            }
        }
    }

    /// Put the flyer on the clipboard as PNG.
    pub fn on_copy(&mut self) {
        let Some(flyer) = self.flyer.as_ref() else {
            self.ui.alert(ui::MSG_NOTHING_GENERATED);
            return;
        };
        if !self.clipboard.is_supported() {
            self.ui.alert(ui::MSG_CLIPBOARD_UNSUPPORTED);
            return;
        }

        let payload = ClipboardImage::from_flyer(flyer);
        match self.clipboard.write_image(&payload) {
            Ok(()) => self.ui.status("Copied!"),
            Err(e) => {
                error!("Failed to copy image: {e}");
                self.ui.alert(&e.alert_message());
            }
        }
    }

    /// Register a new worker version if one is configured.
    ///
    /// `None` re-reads the settings; `Some` names the version directly.
    pub async fn on_check_update(&mut self, version: Option<u32>) {
        if !self.config.offline_cache {
            self.ui.status("Offline cache is disabled; nothing to update.");
            return;
        }

        let cache_config = match version {
            Some(v) => CacheConfig::new(self.config.cache_prefix.clone(), v),
            None => match crate::fresh_cache_config() {
                Ok(config) => config,
                Err(e) => {
                    warn!("Update check failed: {e}");
                    self.ui.alert(&format!("Update check failed: {e}"));
                    return;
                }
            },
        };

        let known = [self.registration.controller(), self.registration.waiting()]
            .into_iter()
            .flatten()
            .any(|w| {
                w.config().prefix == cache_config.prefix && w.version() == cache_config.version
            });
        if known {
            self.ui.status("Linkz is up to date.");
            return;
        }

        self.register_worker(cache_config).await;
    }

    /// Tell a waiting worker to take over, then reload the page.
    pub async fn on_update(&mut self) {
        self.update_visible = false;
        let message = json!({ "type": "SKIP_WAITING" });
        if let Some(version) = self.registration.post_message(&message).await {
            info!(version, "Waiting Service Worker took control");
        }
        self.ui.status("Reloading...");
        self.reload().await;
    }

    pub fn on_dismiss_update(&mut self) {
        self.update_visible = false;
    }

    /// Answer the deferred install prompt. The prompt is used up either way.
    pub fn on_install(&mut self, choice: InstallOutcome) {
        let Some(prompt) = self.install_prompt.take() else {
            self.ui.alert(ui::MSG_INSTALL_UNAVAILABLE);
            return;
        };

        match prompt.prompt(choice) {
            InstallOutcome::Accepted => {
                self.installed = true;
                self.ui.status("App was installed successfully");
            }
            InstallOutcome::Dismissed => self.ui.status("Install dismissed."),
        }
    }

    async fn reload(&mut self) {
        self.flyer = None;
        self.background = BackgroundState::Pending;
        self.load_background().await;
    }
}

/// Drive a session from an event channel until `Quit` or the channel closes.
pub async fn run_event_loop<N: Network>(
    session: &mut PageSession<N>,
    mut rx: mpsc::Receiver<PageEvent>,
) {
    while let Some(event) = rx.recv().await {
        debug!(?event, "Page event");
        if session.dispatch(event).await.is_break() {
            break;
        }
    }
    info!("Page session closed");
}
