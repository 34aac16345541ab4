//! Embed provider registry.
//!
//! A [`Provider`] describes one third-party embed host: how to address a
//! movie or an episode on it, how it ranks against the other providers, and
//! whether a direct media URL can be extracted from its pages (and with
//! which strategy). The [`Registry`] is an immutable value built once at
//! startup and injected wherever providers are needed; adding or removing
//! a provider is a deployment change, not a runtime one.

use serde::Serialize;

/// Kind of content being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    /// Parse the addon-protocol type string (`"movie"` / `"series"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }
}

/// A normalized content reference: what the caller wants resolved.
///
/// `season`/`episode` are present iff this is an episode-addressed series
/// reference; movies never carry them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRef {
    /// Canonical id after namespace-prefix normalization.
    pub id: String,
    pub media_type: MediaType,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl ContentRef {
    /// Reference to a movie.
    #[must_use]
    pub fn movie(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            media_type: MediaType::Movie,
            season: None,
            episode: None,
        }
    }

    /// Reference to a single series episode.
    #[must_use]
    pub fn episode(id: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            id: id.into(),
            media_type: MediaType::Series,
            season: Some(season),
            episode: Some(episode),
        }
    }
}

/// Which extraction algorithm to run against a provider's embed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Fetch the page once and scan the raw body for media references.
    Pattern,
    /// Execute inline scripts in an isolated JS context and inspect the DOM
    /// and script-scope state. Strictly more capable, far more expensive.
    Rendered,
}

/// What the resolver may attempt against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Only the embed page itself is offered; no extraction attempt.
    EmbedOnly,
    /// Direct-URL extraction with the given strategy.
    Extract(Strategy),
}

/// One embed provider: addressing templates, rank, and capability.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Unique short key (`"vidfast"`). Also scopes binge groups.
    pub key: &'static str,
    /// Display name shown to players.
    pub name: &'static str,
    /// Lower is preferred. Always set explicitly, never inferred.
    pub priority: u8,
    pub capability: Capability,
    /// Movie URL template with an `{id}` placeholder, if the provider
    /// carries movies at all.
    movie_template: Option<&'static str>,
    /// Series URL template with `{id}`, `{season}`, `{episode}`.
    series_template: Option<&'static str>,
}

impl Provider {
    /// Rank used when a table entry does not care about ordering.
    pub const DEFAULT_PRIORITY: u8 = 50;

    /// Build the embed URL for `content`, or `None` when this provider
    /// cannot address it (wrong media type, or a series reference without
    /// season/episode). `None` means "skip me", not an error.
    #[must_use]
    pub fn url_for(&self, content: &ContentRef) -> Option<String> {
        match content.media_type {
            MediaType::Movie => self
                .movie_template
                .map(|t| t.replace("{id}", &content.id)),
            MediaType::Series => {
                let (season, episode) = (content.season?, content.episode?);
                self.series_template.map(|t| {
                    t.replace("{id}", &content.id)
                        .replace("{season}", &season.to_string())
                        .replace("{episode}", &episode.to_string())
                })
            }
        }
    }
}

/// Immutable, ordered provider table.
#[derive(Debug, Clone)]
pub struct Registry {
    providers: Vec<Provider>,
}

impl Registry {
    /// The built-in provider table.
    ///
    /// Order here is the registry order: the deterministic tie-break for
    /// equal priorities, per the resolver's stable sort.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                Provider {
                    key: "vidfast",
                    name: "VidFast",
                    priority: 1,
                    capability: Capability::Extract(Strategy::Pattern),
                    movie_template: Some("https://vidfast.pro/movie/{id}?autoPlay=true"),
                    series_template: Some(
                        "https://vidfast.pro/tv/{id}/{season}/{episode}?autoPlay=true&nextButton=true&autoNext=true",
                    ),
                },
                Provider {
                    key: "vidsrc",
                    name: "VidSrc",
                    priority: 2,
                    capability: Capability::Extract(Strategy::Pattern),
                    movie_template: Some("https://vidsrc.xyz/embed/movie/{id}"),
                    series_template: Some("https://vidsrc.xyz/embed/tv/{id}/{season}/{episode}"),
                },
                Provider {
                    key: "vidlink",
                    name: "VidLink",
                    priority: 3,
                    capability: Capability::Extract(Strategy::Rendered),
                    movie_template: Some("https://vidlink.pro/movie/{id}"),
                    series_template: Some("https://vidlink.pro/tv/{id}/{season}/{episode}"),
                },
                Provider {
                    key: "embedsu",
                    name: "Embed.su",
                    priority: 4,
                    capability: Capability::Extract(Strategy::Pattern),
                    movie_template: Some("https://embed.su/embed/movie/{id}"),
                    series_template: Some("https://embed.su/embed/tv/{id}/{season}/{episode}"),
                },
                Provider {
                    key: "autoembed",
                    name: "AutoEmbed",
                    priority: Provider::DEFAULT_PRIORITY,
                    capability: Capability::EmbedOnly,
                    movie_template: Some("https://player.autoembed.cc/embed/movie/{id}"),
                    series_template: Some(
                        "https://player.autoembed.cc/embed/tv/{id}/{season}/{episode}",
                    ),
                },
                Provider {
                    key: "multiembed",
                    name: "MultiEmbed",
                    priority: Provider::DEFAULT_PRIORITY,
                    capability: Capability::EmbedOnly,
                    movie_template: Some("https://multiembed.mov/?video_id={id}"),
                    series_template: Some(
                        "https://multiembed.mov/?video_id={id}&s={season}&e={episode}",
                    ),
                },
            ],
        }
    }

    /// Build a registry from an explicit provider list (tests, custom
    /// deployments).
    #[must_use]
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Providers in registry order.
    #[must_use]
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Convenience for tests and custom tables.
    #[must_use]
    pub fn provider(
        key: &'static str,
        name: &'static str,
        priority: u8,
        capability: Capability,
        movie_template: Option<&'static str>,
        series_template: Option<&'static str>,
    ) -> Provider {
        Provider {
            key,
            name,
            priority,
            capability,
            movie_template,
            series_template,
        }
    }
}
