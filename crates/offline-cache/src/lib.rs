//! Offline caching layer for the Linkz pages.
//!
//! Mirrors a browser service worker: a static bucket filled eagerly on
//! install, a runtime bucket filled as requests go by, stale buckets purged
//! on activation, and a `SKIP_WAITING` message to promote a waiting worker.
//! Actual transport is behind the [`Network`] trait.

pub mod config;
pub mod policy;
pub mod registration;
pub mod request;
pub mod storage;
pub mod worker;

use std::future::Future;

pub use config::{CacheConfig, STATIC_ASSETS};
pub use policy::ResourceKind;
pub use registration::{RegisterOutcome, Registration};
pub use request::{Destination, Request, Response};
pub use storage::CacheStorage;
pub use worker::{ServiceWorker, WorkerMessage, WorkerState};

/// Transport used by the worker when the cache cannot answer.
///
/// A transport-level failure is an `Err`; HTTP error statuses are `Ok`
/// responses the policy decides not to persist.
pub trait Network: Send + Sync {
    fn fetch(&self, request: &Request) -> impl Future<Output = Result<Response, CacheError>> + Send;
}

/// Unified error type for the offline-cache crate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("network request failed for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("install failed: {url} returned status {status}")]
    InstallFailed { url: String, status: u16 },

    #[error("offline and no cached response for {0}")]
    NotCached(String),

    #[error("invalid asset path {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
}
