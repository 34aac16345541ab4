//! Vidra - multi-provider stream resolver
//!
//! Turns a movie or series-episode id into a ranked list of playable
//! stream descriptors. For each registered embed provider the resolver
//! builds the provider's embed URL and, where the provider supports it,
//! extracts the direct media URL from the embed page (pattern scan or
//! rendered DOM/script inspection). Direct hits rank first; everything
//! else degrades to the embed page itself, never to an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use vidra::{Config, ContentRef, EmbedClient, Registry, Resolver, StreamCache};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let resolver = Resolver::new(
//!         Registry::builtin(),
//!         StreamCache::new(config.cache_ttl),
//!         Arc::new(EmbedClient::new()?),
//!         config,
//!     );
//!     let streams = resolver.resolve(&ContentRef::movie("tt0468569")).await;
//!     println!("{} streams", streams.len());
//!     Ok(())
//! }
//! ```

pub mod addon;
pub mod cache;
pub mod config;
pub mod descriptor;
pub mod extract;
pub mod fingerprint;
pub mod http_client;
pub mod id;
pub mod js_engine;
pub mod provider;
pub mod resolver;

pub use cache::StreamCache;
pub use config::{BackupSource, Config};
pub use descriptor::Stream;
pub use extract::{ExtractError, Outcome};
pub use fingerprint::{chrome_profile, BrowserProfile};
pub use http_client::{EmbedClient, Page, PageFetcher};
pub use id::normalize_id;
pub use js_engine::JsEngine;
pub use provider::{Capability, ContentRef, MediaType, Provider, Registry, Strategy};
pub use resolver::Resolver;

/// Version of vidra
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
