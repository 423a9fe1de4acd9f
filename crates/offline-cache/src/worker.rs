//! One worker version: install, activate, fetch, message.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::CacheConfig;
use crate::policy::{ResourceKind, should_persist};
use crate::request::{Request, Response};
use crate::storage::CacheStorage;
use crate::{CacheError, Network};

/// Lifecycle of a worker, in the order it moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// Messages a page can post to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    SkipWaiting,
}

impl WorkerMessage {
    /// Parse a posted JSON message; unknown shapes are ignored.
    pub fn parse(data: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(data.clone()).ok()
    }
}

pub struct ServiceWorker<N> {
    config: CacheConfig,
    origin: Url,
    storage: CacheStorage,
    network: Arc<N>,
    state: WorkerState,
    skip_waiting: bool,
}

impl<N: Network> ServiceWorker<N> {
    pub fn new(config: CacheConfig, origin: Url, storage: CacheStorage, network: Arc<N>) -> Self {
        Self {
            config,
            origin,
            storage,
            network,
            state: WorkerState::Parsed,
            skip_waiting: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn version(&self) -> u32 {
        self.config.version
    }

    /// Whether this worker asked to skip the waiting phase.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting
    }

    pub fn skip_waiting(&mut self) {
        self.skip_waiting = true;
    }

    pub(crate) fn mark_redundant(&mut self) {
        self.state = WorkerState::Redundant;
    }

    /// Fetch every manifest entry and store them in the static bucket.
    ///
    /// All-or-nothing: if any entry fails or is not 2xx, nothing is stored
    /// and the worker becomes redundant.
    pub async fn install(&mut self) -> Result<(), CacheError> {
        info!(version = self.config.version, "Service Worker: Installing");
        self.state = WorkerState::Installing;

        let entries = match self.fetch_manifest().await {
            Ok(entries) => entries,
            Err(e) => {
                self.state = WorkerState::Redundant;
                return Err(e);
            }
        };

        info!(count = entries.len(), "Service Worker: Caching static assets");
        let name = self.config.static_cache_name();
        self.storage.open(&name).await;
        self.storage.put_all(&name, entries).await;

        self.state = WorkerState::Installed;
        if self.config.skip_waiting_on_install {
            self.skip_waiting();
        }
        Ok(())
    }

    async fn fetch_manifest(&self) -> Result<Vec<(String, Response)>, CacheError> {
        let mut entries = Vec::with_capacity(self.config.static_assets.len());
        for url in self.config.manifest_urls(&self.origin)? {
            let request = Request::get(url);
            let response = self.network.fetch(&request).await?;
            if !response.ok() {
                return Err(CacheError::InstallFailed {
                    url: request.cache_key(),
                    status: response.status,
                });
            }
            entries.push((request.cache_key(), response));
        }
        Ok(entries)
    }

    /// Purge buckets outside the allow-list and take control.
    ///
    /// Returns the names of the deleted buckets.
    pub async fn activate(&mut self) -> Vec<String> {
        info!(version = self.config.version, "Service Worker: Activating");
        self.state = WorkerState::Activating;

        let keep = self.config.allow_list();
        let mut deleted = Vec::new();
        for name in self.storage.keys().await {
            if !keep.contains(&name) {
                info!(cache = %name, "Service Worker: Deleting old cache");
                if self.storage.delete(&name).await {
                    deleted.push(name);
                }
            }
        }

        self.state = WorkerState::Activated;
        deleted
    }

    /// Answer a request according to its [`ResourceKind`].
    pub async fn handle_fetch(&self, request: &Request) -> Result<Response, CacheError> {
        let kind = ResourceKind::classify(request);
        if kind.is_network_first() {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    /// Handle a posted message. Returns the message if it was understood.
    pub fn handle_message(&mut self, data: &serde_json::Value) -> Option<WorkerMessage> {
        let message = WorkerMessage::parse(data)?;
        match message {
            WorkerMessage::SkipWaiting => self.skip_waiting(),
        }
        Some(message)
    }

    async fn cache_first(&self, request: &Request) -> Result<Response, CacheError> {
        if let Some(hit) = self.storage.match_request(request).await {
            debug!(url = %request.url, "Cache hit");
            return Ok(hit);
        }

        let response = self.network.fetch(request).await?;
        self.fill_runtime(request, &response).await;
        Ok(response)
    }

    async fn network_first(&self, request: &Request) -> Result<Response, CacheError> {
        match self.network.fetch(request).await {
            Ok(response) => {
                self.fill_runtime(request, &response).await;
                Ok(response)
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Network failed, falling back to cache");
                self.storage
                    .match_request(request)
                    .await
                    .ok_or_else(|| CacheError::NotCached(request.cache_key()))
            }
        }
    }

    async fn fill_runtime(&self, request: &Request, response: &Response) {
        if should_persist(request, response, &self.origin) {
            debug!(url = %request.url, "Caching runtime response");
            self.storage
                .put(&self.config.runtime_cache_name(), request, response.clone())
                .await;
        }
    }
}
