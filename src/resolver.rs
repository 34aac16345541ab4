//! Resolution orchestrator.
//!
//! Fans one content reference out to every addressable provider
//! concurrently, isolates per-provider failures, degrades failed
//! extractions to the provider's own embed page, and assembles a
//! deterministically ordered descriptor sequence. `resolve` never errors:
//! the worst case is an empty vector.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::cache::StreamCache;
use crate::config::Config;
use crate::descriptor::Stream;
use crate::extract::{self, Outcome};
use crate::http_client::PageFetcher;
use crate::id::normalize_id;
use crate::provider::{Capability, ContentRef, Provider, Registry};

/// The resolution engine. Construct once at startup with an injected
/// registry, cache, and fetcher; share behind an `Arc`.
pub struct Resolver {
    registry: Registry,
    cache: StreamCache,
    fetcher: Arc<dyn PageFetcher>,
    config: Config,
}

impl Resolver {
    #[must_use]
    pub fn new(
        registry: Registry,
        cache: StreamCache,
        fetcher: Arc<dyn PageFetcher>,
        config: Config,
    ) -> Self {
        Self {
            registry,
            cache,
            fetcher,
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolve a content reference into a ranked stream list.
    ///
    /// Ordering is deterministic for a fixed registry and outcome set:
    /// direct streams before embed fallbacks and backups, ascending
    /// provider priority within a tier, registry order on ties.
    #[instrument(skip(self), fields(id = %content.id, media_type = ?content.media_type))]
    pub async fn resolve(&self, content: &ContentRef) -> Vec<Stream> {
        let content = ContentRef {
            id: normalize_id(&content.id),
            media_type: content.media_type,
            season: content.season,
            episode: content.episode,
        };

        if let Some(cached) = self.cache.get(&content).await {
            return cached;
        }

        let attempts: Vec<(&Provider, String)> = self
            .registry
            .providers()
            .iter()
            .filter_map(|provider| provider.url_for(&content).map(|url| (provider, url)))
            .collect();

        if attempts.is_empty() {
            debug!("no provider can address this reference");
            return Vec::new();
        }

        let outcomes = join_all(
            attempts
                .iter()
                .map(|(provider, embed_url)| self.attempt(provider, embed_url)),
        )
        .await;

        let mut ranked: Vec<(u8, Stream)> = Vec::with_capacity(attempts.len());
        for ((provider, embed_url), outcome) in attempts.iter().zip(outcomes) {
            // Failed extraction degrades to the provider's own embed page;
            // every addressable provider contributes exactly one entry.
            let outcome = match outcome {
                Outcome::Failed { reason } => {
                    debug!(provider = provider.key, %reason, "degrading to embed fallback");
                    Outcome::Embed {
                        url: embed_url.clone(),
                    }
                }
                other => other,
            };
            if let Some(stream) = Stream::assemble(provider, &outcome, &content) {
                ranked.push((provider.priority, stream));
            }
        }

        if !ranked.iter().any(|(_, stream)| stream.web_ready) {
            for backup in &self.config.backups {
                ranked.push((u8::MAX, Stream::backup(&backup.name, &backup.url, &content)));
            }
        }

        // Stable sort: registry order survives as the tie-break.
        ranked.sort_by_key(|(priority, stream)| (!stream.web_ready, *priority));
        let streams: Vec<Stream> = ranked.into_iter().map(|(_, stream)| stream).collect();

        info!(
            total = streams.len(),
            direct = streams.iter().filter(|s| s.web_ready).count(),
            "resolution complete"
        );

        self.cache.put(content, streams.clone()).await;
        streams
    }

    /// One provider's extraction attempt, individually time-bounded. A
    /// timeout is a local failure for this provider only.
    async fn attempt(&self, provider: &Provider, embed_url: &str) -> Outcome {
        match provider.capability {
            Capability::EmbedOnly => Outcome::Embed {
                url: embed_url.to_string(),
            },
            Capability::Extract(strategy) => {
                let budget = self.config.provider_timeout;
                match timeout(
                    budget,
                    extract::run(strategy, self.fetcher.as_ref(), embed_url),
                )
                .await
                {
                    Ok(Ok(Some(url))) => Outcome::Direct { url, strategy },
                    Ok(Ok(None)) => Outcome::Failed {
                        reason: "no media reference found".into(),
                    },
                    Ok(Err(err)) => Outcome::Failed {
                        reason: err.to_string(),
                    },
                    Err(_) => Outcome::Failed {
                        reason: format!("extraction timed out after {budget:?}"),
                    },
                }
            }
        }
    }
}
