//! Public stream descriptors and their assembly from extraction outcomes.

use crate::extract::Outcome;
use crate::provider::{ContentRef, MediaType, Provider};

/// One playable stream offered to the caller. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    /// Provider display name.
    pub name: String,
    /// Human-readable title encoding media type and episode addressing.
    pub title: String,
    /// Absolute URL: direct media for extracted streams, the embed page
    /// otherwise.
    pub url: String,
    pub description: String,
    /// True only when `url` points straight at playable media.
    pub web_ready: bool,
    /// Binge-advance grouping key, series references only, scoped per
    /// provider and canonical id.
    pub binge_group: Option<String>,
}

impl Stream {
    /// Assemble the public descriptor for a provider's outcome.
    ///
    /// Returns `None` for [`Outcome::Failed`]: the resolver substitutes an
    /// embed fallback before assembly, so a `Failed` here means the
    /// provider has nothing to offer at all.
    #[must_use]
    pub fn assemble(provider: &Provider, outcome: &Outcome, content: &ContentRef) -> Option<Self> {
        let (url, web_ready) = match outcome {
            Outcome::Direct { url, .. } => (url.clone(), true),
            Outcome::Embed { url } => (url.clone(), false),
            Outcome::Failed { .. } => return None,
        };

        let description = if web_ready {
            format!("Direct stream extracted from {}", provider.name)
        } else {
            format!("Stream via {}", provider.name)
        };

        Some(Self {
            name: provider.name.to_string(),
            title: format!("{} - {}", provider.name, content_label(content)),
            url,
            description,
            web_ready,
            binge_group: binge_group(provider.key, content),
        })
    }

    /// Descriptor for a last-resort backup source (no provider involved).
    #[must_use]
    pub fn backup(name: &str, url: &str, content: &ContentRef) -> Self {
        Self {
            name: name.to_string(),
            title: format!("{} - {}", name, content_label(content)),
            url: url.to_string(),
            description: format!("Backup sample stream via {name}"),
            web_ready: false,
            binge_group: None,
        }
    }
}

fn content_label(content: &ContentRef) -> String {
    match (content.media_type, content.season, content.episode) {
        (MediaType::Series, Some(season), Some(episode)) => format!("S{season}E{episode}"),
        (MediaType::Series, _, _) => "Series".to_string(),
        (MediaType::Movie, _, _) => "Movie".to_string(),
    }
}

fn binge_group(provider_key: &str, content: &ContentRef) -> Option<String> {
    match content.media_type {
        MediaType::Series => Some(format!("{provider_key}-{}", content.id)),
        MediaType::Movie => None,
    }
}
