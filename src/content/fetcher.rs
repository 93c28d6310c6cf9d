//! Content fetcher - resolves a content source into raw text
//!
//! Sources are either remote URLs (fetched over HTTP) or paths relative to the
//! blog's base directory. Every failure collapses to `None`; callers cannot tell
//! a missing file from an empty one or a network error.

use reqwest::{Client, Url};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Timeout for a single remote fetch
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest remote response accepted, in bytes
pub const MAX_REMOTE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest local source file accepted, in bytes
pub const MAX_LOCAL_BYTES: u64 = 10 * 1024 * 1024;

/// Fetches item sources. Cheap to share; holds a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    max_remote_bytes: u64,
    max_local_bytes: u64,
}

impl ContentFetcher {
    pub fn new() -> Self {
        Self::with_limits(FETCH_TIMEOUT, MAX_REMOTE_BYTES, MAX_LOCAL_BYTES)
    }

    pub fn with_limits(timeout: Duration, max_remote_bytes: u64, max_local_bytes: u64) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jsonblog/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            max_remote_bytes,
            max_local_bytes,
        }
    }

    /// Fetch the text behind `source`, resolving local paths against `base_dir`
    pub async fn fetch(&self, source: &str, base_dir: &Path) -> Option<String> {
        if is_remote(source) {
            self.fetch_remote(source).await
        } else {
            self.fetch_local(source, base_dir).await
        }
    }

    async fn fetch_remote(&self, source: &str) -> Option<String> {
        let url = match cache_busted_url(source) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(source, error = %e, "Invalid content URL");
                return None;
            }
        };

        let mut response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(source, error = %e, "Error fetching remote content");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(source, status = %response.status(), "Remote content request failed");
            return None;
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_remote_bytes)
        {
            tracing::warn!(source, "Remote content exceeds size limit");
            return None;
        }

        let mut body: Vec<u8> = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() as u64 + chunk.len() as u64 > self.max_remote_bytes {
                        tracing::warn!(source, "Remote content exceeds size limit");
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(source, error = %e, "Error reading remote content");
                    return None;
                }
            }
        }

        Some(String::from_utf8_lossy(&body).into_owned())
    }

    async fn fetch_local(&self, source: &str, base_dir: &Path) -> Option<String> {
        let path = base_dir.join(source);
        tracing::debug!("Resolved content path: {:?}", path);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(source, path = %path.display(), error = %e, "Content file not found");
                return None;
            }
        };

        if !metadata.is_file() {
            tracing::warn!(source, path = %path.display(), "Content source is not a file");
            return None;
        }
        if metadata.len() > self.max_local_bytes {
            tracing::warn!(
                source,
                size = metadata.len(),
                "Content file exceeds size limit"
            );
            return None;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(source, error = %e, "Error reading content file");
                None
            }
        }
    }
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a source refers to a network resource
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Append a `cb=<millis>` query parameter so intermediaries never serve a stale copy
fn cache_busted_url(source: &str) -> Result<Url, String> {
    let mut url = Url::parse(source).map_err(|e| e.to_string())?;
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    url.query_pairs_mut().append_pair("cb", &millis.to_string());
    Ok(url)
}
