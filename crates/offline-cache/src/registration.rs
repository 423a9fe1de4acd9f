//! Page-side view of the worker: who controls the page, who is waiting.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::config::CacheConfig;
use crate::request::{Request, Response};
use crate::storage::CacheStorage;
use crate::worker::{ServiceWorker, WorkerMessage};
use crate::{CacheError, Network};

/// What happened when a worker version was registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First worker for this page; it took control immediately.
    Activated { version: u32 },
    /// Replaced the controlling worker because it skips waiting.
    Updated { version: u32 },
    /// Installed alongside a controller; waits for `SKIP_WAITING`.
    Waiting { version: u32 },
}

impl RegisterOutcome {
    /// A newer version arrived while a controller was running.
    pub fn update_available(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::Waiting { .. })
    }
}

pub struct Registration<N> {
    origin: Url,
    storage: CacheStorage,
    network: Arc<N>,
    active: Option<ServiceWorker<N>>,
    waiting: Option<ServiceWorker<N>>,
}

impl<N: Network> Registration<N> {
    pub fn new(origin: Url, network: Arc<N>) -> Self {
        Self::with_storage(origin, network, CacheStorage::new())
    }

    pub fn with_storage(origin: Url, network: Arc<N>, storage: CacheStorage) -> Self {
        Self {
            origin,
            storage,
            network,
            active: None,
            waiting: None,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// The worker controlling fetches, if any.
    pub fn controller(&self) -> Option<&ServiceWorker<N>> {
        self.active.as_ref()
    }

    pub fn waiting(&self) -> Option<&ServiceWorker<N>> {
        self.waiting.as_ref()
    }

    /// Install a worker version and activate it if nothing blocks it.
    ///
    /// A failed install leaves the current controller untouched.
    pub async fn register(&mut self, config: CacheConfig) -> Result<RegisterOutcome, CacheError> {
        let version = config.version;
        let had_controller = self.active.is_some();

        let mut worker = ServiceWorker::new(
            config,
            self.origin.clone(),
            self.storage.clone(),
            self.network.clone(),
        );
        worker.install().await?;
        info!(version, "Service Worker registered");

        if !had_controller {
            self.promote(worker).await;
            return Ok(RegisterOutcome::Activated { version });
        }

        if worker.skip_waiting_requested() {
            self.promote(worker).await;
            Ok(RegisterOutcome::Updated { version })
        } else {
            if let Some(mut stale) = self.waiting.replace(worker) {
                stale.mark_redundant();
            }
            Ok(RegisterOutcome::Waiting { version })
        }
    }

    /// Post a message to the waiting worker.
    ///
    /// Returns the version that took control if the message promoted it.
    pub async fn post_message(&mut self, data: &serde_json::Value) -> Option<u32> {
        let Some(waiting) = self.waiting.as_mut() else {
            warn!("No waiting Service Worker to receive message");
            return None;
        };

        if waiting.handle_message(data) != Some(WorkerMessage::SkipWaiting) {
            return None;
        }

        let worker = self.waiting.take()?;
        let version = worker.version();
        self.promote(worker).await;
        Some(version)
    }

    /// Route a request through the controller, or straight to the network.
    pub async fn fetch(&self, request: &Request) -> Result<Response, CacheError> {
        match &self.active {
            Some(worker) => worker.handle_fetch(request).await,
            None => self.network.fetch(request).await,
        }
    }

    async fn promote(&mut self, mut worker: ServiceWorker<N>) {
        worker.activate().await;
        if let Some(mut old) = self.active.replace(worker) {
            old.mark_redundant();
        }
    }
}
