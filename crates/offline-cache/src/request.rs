//! Request and response values passed through the cache.

use url::Url;

/// What the request is for, as a browser would tag it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Image,
    Script,
    Style,
    Manifest,
    Other,
}

impl Destination {
    /// Guess the destination from the URL path.
    pub fn infer(url: &Url) -> Self {
        let path = url.path();
        if path.ends_with('/') {
            return Self::Document;
        }
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "html" | "htm" => Self::Document,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico" => Self::Image,
            "js" | "mjs" => Self::Script,
            "css" => Self::Style,
            "webmanifest" => Self::Manifest,
            "json" if path.ends_with("/manifest.json") => Self::Manifest,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub destination: Destination,
}

impl Request {
    /// A GET request whose destination is inferred from the path.
    pub fn get(url: Url) -> Self {
        let destination = Destination::infer(&url);
        Self { url, destination }
    }

    /// A top-level navigation.
    pub fn document(url: Url) -> Self {
        Self {
            url,
            destination: Destination::Document,
        }
    }

    /// Key used to store and match this request (URL without fragment).
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// A `200 OK` response.
    pub fn ok_with(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, Some(content_type.to_string()), body.into())
    }

    /// A `404 Not Found` response with an empty body.
    pub fn not_found() -> Self {
        Self::new(404, None, Vec::new())
    }

    /// Status in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
