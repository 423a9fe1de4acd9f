//! Named cache buckets, shared between worker versions.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::request::{Request, Response};

/// A stored response and when it was stored.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub response: Response,
    pub stored_at: DateTime<Utc>,
}

struct NamedCache {
    name: String,
    entries: BTreeMap<String, CachedResponse>,
}

/// In-memory equivalent of the browser's `CacheStorage`.
///
/// Buckets keep creation order; [`CacheStorage::match_request`] searches
/// them in that order. Clones share the same buckets.
#[derive(Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<Vec<NamedCache>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the bucket if it does not exist yet.
    pub async fn open(&self, name: &str) {
        let mut caches = self.caches.write().await;
        if !caches.iter().any(|c| c.name == name) {
            caches.push(NamedCache {
                name: name.to_string(),
                entries: BTreeMap::new(),
            });
        }
    }

    pub async fn has(&self, name: &str) -> bool {
        self.caches.read().await.iter().any(|c| c.name == name)
    }

    /// Bucket names in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.caches
            .read()
            .await
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Drop a bucket. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> bool {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|c| c.name != name);
        caches.len() != before
    }

    /// Store one response, creating the bucket if needed.
    pub async fn put(&self, name: &str, request: &Request, response: Response) {
        self.put_all(name, vec![(request.cache_key(), response)]).await;
    }

    /// Store several responses under one write lock.
    pub async fn put_all(&self, name: &str, entries: Vec<(String, Response)>) {
        let stored_at = Utc::now();
        let mut caches = self.caches.write().await;
        let idx = match caches.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                caches.push(NamedCache {
                    name: name.to_string(),
                    entries: BTreeMap::new(),
                });
                caches.len() - 1
            }
        };
        let cache = &mut caches[idx];
        for (key, response) in entries {
            cache
                .entries
                .insert(key, CachedResponse { response, stored_at });
        }
    }

    /// First match across all buckets, in creation order.
    pub async fn match_request(&self, request: &Request) -> Option<Response> {
        let key = request.cache_key();
        self.caches
            .read()
            .await
            .iter()
            .find_map(|c| c.entries.get(&key))
            .map(|cached| cached.response.clone())
    }

    /// Match within a single bucket.
    pub async fn match_in(&self, name: &str, request: &Request) -> Option<CachedResponse> {
        let key = request.cache_key();
        self.caches
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.entries.get(&key).cloned())
    }

    /// Stored URLs of a bucket, sorted. Empty if the bucket is missing.
    pub async fn entries(&self, name: &str) -> Vec<String> {
        self.caches
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn req(s: &str) -> Request {
        Request::get(Url::parse(s).unwrap())
    }

    #[tokio::test]
    async fn open_is_idempotent_and_ordered() {
        let storage = CacheStorage::new();
        storage.open("b").await;
        storage.open("a").await;
        storage.open("b").await;
        assert_eq!(storage.keys().await, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn match_searches_buckets_in_creation_order() {
        let storage = CacheStorage::new();
        let r = req("https://a.test/styles.css");
        storage.put("first", &r, Response::ok_with("text/css", "one")).await;
        storage.put("second", &r, Response::ok_with("text/css", "two")).await;

        let hit = storage.match_request(&r).await.unwrap();
        assert_eq!(hit.body, b"one");
        assert_eq!(
            storage.match_in("second", &r).await.unwrap().response.body,
            b"two"
        );
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let storage = CacheStorage::new();
        storage.open("old").await;
        assert!(storage.delete("old").await);
        assert!(!storage.delete("old").await);
        assert!(!storage.has("old").await);
    }

    #[tokio::test]
    async fn clones_share_buckets() {
        let storage = CacheStorage::new();
        let other = storage.clone();
        other
            .put("x", &req("https://a.test/"), Response::ok_with("text/html", "hi"))
            .await;
        assert_eq!(storage.entries("x").await, vec!["https://a.test/"]);
    }
}
