//! Transport behind the offline cache: HTTP, or a local site directory.

use std::path::{Component, Path, PathBuf};

use offline_cache::policy::is_same_origin;
use offline_cache::{CacheError, Network, Request, Response};
use url::Url;

use crate::config::AppConfig;

/// Where page assets come from.
pub enum SiteNetwork {
    /// Everything over HTTP.
    Http { client: reqwest::Client },
    /// Same-origin paths read from `root`; other origins over HTTP.
    Directory {
        origin: Url,
        root: PathBuf,
        client: reqwest::Client,
    },
}

impl SiteNetwork {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = reqwest::Client::new();
        match &config.site_root {
            Some(root) => Self::Directory {
                origin: config.site_origin.clone(),
                root: root.clone(),
                client,
            },
            None => Self::Http { client },
        }
    }
}

impl Network for SiteNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, CacheError> {
        match self {
            Self::Directory {
                origin,
                root,
                client,
            } => {
                if is_same_origin(&request.url, origin) {
                    read_site_file(root, &request.url).await
                } else {
                    http_get(client, &request.url).await
                }
            }
            Self::Http { client } => http_get(client, &request.url).await,
        }
    }
}

async fn http_get(client: &reqwest::Client, url: &Url) -> Result<Response, CacheError> {
    let network_error = |e: reqwest::Error| CacheError::Network {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(network_error)?;
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let body = resp.bytes().await.map_err(network_error)?.to_vec();

    tracing::debug!(%url, status, bytes = body.len(), "HTTP fetch");
    Ok(Response::new(status, content_type, body))
}

async fn read_site_file(root: &Path, url: &Url) -> Result<Response, CacheError> {
    let Some(path) = site_path(root, url.path()) else {
        return Ok(Response::not_found());
    };

    match tokio::fs::read(&path).await {
        Ok(body) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            tracing::debug!(path = %path.display(), bytes = body.len(), "Site file read");
            Ok(Response::ok_with(mime.as_ref(), body))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Response::not_found()),
        Err(e) => Err(CacheError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Map a URL path onto the site directory. `/` and `dir/` serve `index.html`.
///
/// Returns `None` for paths that would escape `root`.
fn site_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut path = root.join(relative);
    if url_path.ends_with('/') {
        path.push("index.html");
    }
    Some(path)
}
