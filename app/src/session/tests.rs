use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use flyer_engine::encode_png;
use image::{Rgba, RgbaImage};
use offline_cache::{CacheError, STATIC_ASSETS, Response};
use url::Url;

use super::*;
use crate::clipboard::ClipboardError;
use crate::ui::RecordingUi;

const ORIGIN: &str = "http://localhost:8080/";

#[derive(Default)]
struct StubSite {
    routes: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
}

impl StubSite {
    fn with_assets() -> Self {
        let site = Self::default();
        for path in STATIC_ASSETS {
            site.serve(path, Response::ok_with("text/plain", format!("asset {path}")));
        }
        site
    }

    fn with_background(page_type: &str) -> Self {
        let site = Self::with_assets();
        site.serve(
            &format!("images/{page_type}.png"),
            Response::ok_with("image/png", background_png()),
        );
        site
    }

    fn serve(&self, path: &str, response: Response) {
        let url = Url::parse(ORIGIN).unwrap().join(path).unwrap();
        self.routes.lock().unwrap().insert(url.into(), response);
    }

    fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl Network for StubSite {
    async fn fetch(&self, request: &Request) -> Result<Response, CacheError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Network {
                url: request.cache_key(),
                reason: "offline".into(),
            });
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&request.cache_key())
            .cloned()
            .unwrap_or_else(Response::not_found))
    }
}

fn background_png() -> Vec<u8> {
    let art = RgbaImage::from_pixel(130, 104, Rgba([200, 30, 40, 255]));
    encode_png(&art).unwrap()
}

#[derive(Clone, Default)]
struct MockClipboard {
    unsupported: bool,
    deny: bool,
    writes: Arc<Mutex<Vec<ClipboardImage>>>,
}

impl ClipboardProvider for MockClipboard {
    fn is_supported(&self) -> bool {
        !self.unsupported
    }

    fn write_image(&mut self, image: &ClipboardImage) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::PermissionDenied("denied".into()));
        }
        self.writes.lock().unwrap().push(image.clone());
        Ok(())
    }
}

struct Harness {
    session: PageSession<StubSite>,
    ui: RecordingUi,
    clipboard: MockClipboard,
    site: Arc<StubSite>,
    _out: tempfile::TempDir,
}

fn harness(page_type: Option<&str>, site: StubSite) -> Harness {
    harness_with(page_type, site, MockClipboard::default(), true)
}

fn harness_with(
    page_type: Option<&str>,
    site: StubSite,
    clipboard: MockClipboard,
    offline_cache: bool,
) -> Harness {
    let out = tempfile::tempdir().unwrap();
    let config = AppConfig {
        site_origin: Url::parse(ORIGIN).unwrap(),
        output_dir: out.path().join("flyers"),
        offline_cache,
        ..AppConfig::default()
    };
    let ui = RecordingUi::new();
    let site = Arc::new(site);
    let session = PageSession::new(
        config,
        page_type.map(String::from),
        site.clone(),
        Box::new(ui.clone()),
        Box::new(clipboard.clone()),
    );
    Harness {
        session,
        ui,
        clipboard,
        site,
        _out: out,
    }
}

#[tokio::test]
async fn missing_type_alerts_invalid_access_once() {
    let mut h = harness(None, StubSite::with_assets());
    h.session.on_load().await;

    assert_eq!(h.ui.alerts(), vec![ui::MSG_INVALID_ACCESS.to_string()]);
    assert!(h.session.template().is_none());
    assert!(matches!(h.session.background(), BackgroundState::Pending));
}

#[tokio::test]
async fn path_like_type_is_rejected() {
    let mut h = harness(Some("../secret"), StubSite::with_assets());
    h.session.on_load().await;

    assert_eq!(h.ui.alerts(), vec![ui::MSG_INVALID_ACCESS.to_string()]);
    assert!(h.session.template().is_none());
}

#[tokio::test]
async fn load_shows_breadcrumb_and_decodes_background() {
    let mut h = harness(Some("xseries-video"), StubSite::with_background("xseries-video"));
    h.session.on_load().await;

    assert!(h.ui.alerts().is_empty());
    assert!(
        h.ui.statuses()
            .contains(&"Home > X Series > Video Resources".to_string())
    );
    let BackgroundState::Loaded(bg) = h.session.background() else {
        panic!("background should be loaded");
    };
    assert_eq!((bg.width(), bg.height()), (130, 104));
}

#[tokio::test]
async fn missing_background_alerts_once_and_leaves_canvas_unmodified() {
    let mut h = harness(Some("zenix-video"), StubSite::with_assets());
    h.session.on_load().await;

    assert_eq!(
        h.ui.alerts(),
        vec!["Background image not found for type: zenix-video".to_string()]
    );
    assert!(matches!(h.session.background(), BackgroundState::Missing));
    assert!(h.session.flyer().is_none());

    h.session.on_generate("https://zoll.com/zenix");
    assert_eq!(h.ui.alerts().last().map(String::as_str), Some(ui::MSG_NOT_LOADED));
    assert!(h.session.flyer().is_none());
}

#[tokio::test]
async fn generate_before_load_reports_invalid_access() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_generate("https://zoll.com/zenix");
    assert_eq!(h.ui.alerts(), vec![ui::MSG_INVALID_ACCESS.to_string()]);
}

#[tokio::test]
async fn empty_url_alerts_and_keeps_canvas() {
    let mut h = harness(Some("aedplus-video"), StubSite::with_background("aedplus-video"));
    h.session.on_load().await;

    h.session.on_generate("   ");
    assert_eq!(h.ui.alerts(), vec![ui::MSG_EMPTY_URL.to_string()]);
    assert!(h.session.flyer().is_none());
}

#[tokio::test]
async fn generate_renders_canvas_sized_flyer_and_is_repeatable() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;

    h.session.on_generate("https://zoll.com/zenix/videos");
    let first = h.session.flyer().cloned().expect("flyer rendered");
    assert_eq!(first.dimensions(), (650, 522));
    // QR area is painted over the red background.
    assert_ne!(first.get_pixel(356 + 133, 194 + 133)[1], 30);

    h.session.on_generate("https://zoll.com/zenix/videos");
    assert_eq!(h.session.flyer(), Some(&first));
    assert!(h.ui.alerts().is_empty());
}

#[tokio::test]
async fn download_writes_type_named_png() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;
    h.session.on_generate("https://zoll.com/zenix");

    let path = h.session.on_download().await.expect("flyer saved");
    assert_eq!(path.file_name().unwrap(), "zenix-video-flyer.png");

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (650, 522));
    assert_eq!(&saved.to_rgba8(), h.session.flyer().unwrap());
}

#[tokio::test]
async fn download_without_flyer_alerts() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;

    assert!(h.session.on_download().await.is_none());
    assert_eq!(h.ui.alerts(), vec![ui::MSG_NOTHING_GENERATED.to_string()]);
}

#[tokio::test]
async fn copy_writes_flyer_pixels_and_reports_copied() {
    let mut h = harness(Some("aed3bls-video"), StubSite::with_background("aed3bls-video"));
    h.session.on_load().await;
    h.session.on_generate("https://zoll.com/aed3");
    h.session.on_copy();

    let writes = h.clipboard.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!((writes[0].width, writes[0].height), (650, 522));
    assert_eq!(&writes[0].rgba, h.session.flyer().unwrap().as_raw());
    assert_eq!(h.ui.statuses().last().map(String::as_str), Some("Copied!"));
}

#[tokio::test]
async fn copy_unsupported_alerts_feature_message() {
    let clipboard = MockClipboard {
        unsupported: true,
        ..MockClipboard::default()
    };
    let mut h = harness_with(
        Some("aedplus-video"),
        StubSite::with_background("aedplus-video"),
        clipboard,
        true,
    );
    h.session.on_load().await;
    h.session.on_generate("https://zoll.com/aedplus");
    h.session.on_copy();

    assert_eq!(h.ui.alerts(), vec![ui::MSG_CLIPBOARD_UNSUPPORTED.to_string()]);
}

#[tokio::test]
async fn copy_permission_denied_asks_for_permission() {
    let clipboard = MockClipboard {
        deny: true,
        ..MockClipboard::default()
    };
    let mut h = harness_with(
        Some("aedplus-video"),
        StubSite::with_background("aedplus-video"),
        clipboard,
        true,
    );
    h.session.on_load().await;
    h.session.on_generate("https://zoll.com/aedplus");
    h.session.on_copy();

    let alerts = h.ui.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("grant clipboard permissions"));
    assert!(!h.ui.statuses().contains(&"Copied!".to_string()));
}

#[tokio::test]
async fn install_prompt_is_single_use() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;
    assert!(h.session.install_available());

    h.session.on_install(InstallOutcome::Accepted);
    assert!(!h.session.install_available());
    assert!(
        h.ui.statuses()
            .contains(&"App was installed successfully".to_string())
    );

    h.session.on_install(InstallOutcome::Accepted);
    assert_eq!(h.ui.alerts(), vec![ui::MSG_INSTALL_UNAVAILABLE.to_string()]);
}

#[tokio::test]
async fn disabled_offline_cache_skips_registration() {
    let mut h = harness_with(
        Some("zenix-video"),
        StubSite::with_background("zenix-video"),
        MockClipboard::default(),
        false,
    );
    h.session.on_load().await;

    assert!(h.session.registration().controller().is_none());
    assert!(!h.session.install_available());
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
}

#[tokio::test]
async fn failed_registration_still_loads_background() {
    let site = StubSite::default();
    site.serve(
        "images/zenix-video.png",
        Response::ok_with("image/png", background_png()),
    );
    let mut h = harness(Some("zenix-video"), site);
    h.session.on_load().await;

    assert!(h.session.registration().controller().is_none());
    assert!(h.ui.alerts().is_empty());
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
}

#[tokio::test]
async fn cached_background_survives_going_offline() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;

    h.site.set_offline(true);
    h.session.reload().await;
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
    assert!(h.ui.alerts().is_empty());
}

#[tokio::test]
async fn waiting_update_is_applied_on_request() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;
    h.session.on_generate("https://zoll.com/zenix");

    h.session
        .register_worker(CacheConfig::new("zoll-linkz", 3).with_skip_waiting(false))
        .await;
    assert!(h.session.update_visible());
    assert_eq!(
        h.session.registration().controller().map(|w| w.version()),
        Some(2)
    );

    h.session.on_update().await;
    assert!(!h.session.update_visible());
    assert_eq!(
        h.session.registration().controller().map(|w| w.version()),
        Some(3)
    );
    // Reload drops the flyer and fetches the background again.
    assert!(h.session.flyer().is_none());
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
}

#[tokio::test]
async fn dismissing_update_hides_notification() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.on_load().await;
    h.session
        .register_worker(CacheConfig::new("zoll-linkz", 3).with_skip_waiting(false))
        .await;

    h.session.on_dismiss_update();
    assert!(!h.session.update_visible());
    assert!(h.session.registration().waiting().is_some());
}

#[tokio::test]
async fn update_check_then_update_reloads_through_new_worker() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    for event in [
        PageEvent::Load,
        PageEvent::Generate("https://zoll.com/zenix".into()),
        PageEvent::CheckUpdate(Some(3)),
    ] {
        assert!(h.session.dispatch(event).await.is_continue());
    }

    assert!(h.session.update_visible());
    assert!(h.ui.statuses().contains(&update_notification()));
    assert!(h.session.flyer().is_some());

    h.session.dispatch(PageEvent::Update).await;
    assert!(!h.session.update_visible());
    assert_eq!(
        h.session.registration().controller().map(|w| w.version()),
        Some(3)
    );
    assert!(h.session.flyer().is_none());
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
    assert!(
        h.session
            .registration()
            .storage()
            .has("zoll-linkz-static-v3")
            .await
    );
    assert!(!h.session.registration().storage().has("zoll-linkz-static-v2").await);
}

#[tokio::test]
async fn update_check_for_running_version_is_up_to_date() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.dispatch(PageEvent::Load).await;
    h.session.dispatch(PageEvent::CheckUpdate(Some(2))).await;

    assert!(!h.session.update_visible());
    assert_eq!(
        h.ui.statuses().last().map(String::as_str),
        Some("Linkz is up to date.")
    );
}

#[tokio::test]
async fn update_reloads_even_without_waiting_worker() {
    let mut h = harness(Some("zenix-video"), StubSite::with_background("zenix-video"));
    h.session.dispatch(PageEvent::Load).await;
    h.session
        .dispatch(PageEvent::Generate("https://zoll.com/zenix".into()))
        .await;

    h.session.dispatch(PageEvent::Update).await;
    assert!(h.ui.statuses().contains(&"Reloading...".to_string()));
    assert!(h.session.flyer().is_none());
    assert!(matches!(h.session.background(), BackgroundState::Loaded(_)));
    assert!(h.ui.alerts().is_empty());
}

#[tokio::test]
async fn event_loop_runs_until_quit() {
    let mut h = harness(Some("xseries-video"), StubSite::with_background("xseries-video"));
    let (tx, rx) = crate::events::channel();

    tx.send(PageEvent::Load).await.unwrap();
    tx.send(PageEvent::Generate("https://zoll.com/x".into()))
        .await
        .unwrap();
    tx.send(PageEvent::Quit).await.unwrap();
    tx.send(PageEvent::Copy).await.unwrap();

    run_event_loop(&mut h.session, rx).await;

    assert!(h.session.flyer().is_some());
    // Copy after Quit never ran.
    assert!(h.clipboard.writes.lock().unwrap().is_empty());
}
