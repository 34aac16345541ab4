//! HTTP client for embed page fetches.
//!
//! One shared [`EmbedClient`] per process: HTTP/2 multiplexing so parallel
//! provider fetches share connections where hosts allow it, rustls TLS,
//! compression negotiation, a bounded redirect chain, and a realistic
//! Chrome header set (see [`crate::fingerprint`]).
//!
//! The [`PageFetcher`] trait is the network seam: extraction strategies and
//! the resolver talk to it, tests substitute canned pages.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::fingerprint::{chrome_profile, BrowserProfile};

/// Maximum redirects an embed host may chain before the fetch is abandoned.
const MAX_REDIRECTS: usize = 5;

/// A fetched embed page, reduced to what extraction needs.
#[derive(Debug, Clone)]
pub struct Page {
    /// HTTP status code of the final response.
    pub status: u16,
    /// URL after redirects; origin-relative candidates resolve against this.
    pub final_url: String,
    /// `Content-Type` header value, if present.
    pub content_type: Option<String>,
    pub body: String,
}

impl Page {
    /// Whether the response carried a usable text body.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        if !(200..300).contains(&self.status) || self.body.trim().is_empty() {
            return false;
        }
        match &self.content_type {
            // No header: assume text, embed hosts are sloppy about it.
            None => true,
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/")
                    || ct.contains("javascript")
                    || ct.contains("json")
                    || ct.contains("xml")
                    || ct.contains("mpegurl")
            }
        }
    }
}

/// Network seam for everything that fetches provider pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` with `referer` presented as the embedding page.
    async fn fetch_page(&self, url: &str, referer: &str) -> Result<Page>;
}

/// Production fetcher with browser-like fingerprinting.
pub struct EmbedClient {
    client: Client,
    profile: BrowserProfile,
}

impl EmbedClient {
    /// Create a client with a fresh random Chrome profile.
    pub fn new() -> Result<Self> {
        Self::with_profile(chrome_profile())
    }

    /// Create a client with a specific profile.
    pub fn with_profile(profile: BrowserProfile) -> Result<Self> {
        let client = Client::builder()
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(6)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .default_headers(profile.to_headers())
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(20))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, profile })
    }

    /// The profile this client presents.
    #[must_use]
    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }
}

#[async_trait]
impl PageFetcher for EmbedClient {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_page(&self, url: &str, referer: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .headers(self.profile.to_headers_with_referer(referer))
            .send()
            .await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        debug!(status, %final_url, "embed page fetched");

        let body = response.text().await?;
        Ok(Page {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
