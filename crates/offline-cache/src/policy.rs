//! Which strategy answers a request, and what gets persisted.

use url::Url;

use crate::request::{Destination, Request, Response};

/// How a request is routed through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Anything under `/images/`: cache first, then fill from network.
    Image,
    /// Navigations: network first, cache as fallback.
    Document,
    /// Everything else: cache first, then fill from network.
    Asset,
}

impl ResourceKind {
    pub fn classify(request: &Request) -> Self {
        if request.url.as_str().contains("/images/") {
            Self::Image
        } else if request.destination == Destination::Document {
            Self::Document
        } else {
            Self::Asset
        }
    }

    pub fn is_network_first(self) -> bool {
        matches!(self, Self::Document)
    }
}

/// Whether two URLs share scheme, host and port.
pub fn is_same_origin(url: &Url, origin: &Url) -> bool {
    url.origin() == origin.origin()
}

/// Only `200` same-origin responses are written to the runtime bucket.
pub fn should_persist(request: &Request, response: &Response, origin: &Url) -> bool {
    response.status == 200 && is_same_origin(&request.url, origin)
}
