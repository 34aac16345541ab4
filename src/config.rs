//! Runtime configuration.
//!
//! Every knob has an explicit default here; the environment can override
//! the common ones (`VIDRA_PORT`, `VIDRA_PROVIDER_TIMEOUT_SECS`,
//! `VIDRA_CACHE_TTL_SECS`). Defaults are declared once at construction,
//! never inferred at use sites.

use std::time::Duration;

/// A last-resort stream offered when every extractor came up empty.
///
/// Which backup sources are legitimate is deployment policy, so the list
/// is injectable rather than baked into the resolver.
#[derive(Debug, Clone)]
pub struct BackupSource {
    pub name: String,
    pub url: String,
}

/// Resolver and server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the addon HTTP server binds on.
    pub port: u16,
    /// Budget for a single provider's extraction attempt.
    pub provider_timeout: Duration,
    /// Cache freshness window.
    pub cache_ttl: Duration,
    /// Appended (not-web-ready) when no provider produced a direct URL.
    pub backups: Vec<BackupSource>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7000,
            provider_timeout: Duration::from_secs(12),
            cache_ttl: Duration::from_secs(20 * 60),
            backups: vec![
                BackupSource {
                    name: "Sample (Big Buck Bunny)".into(),
                    url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4".into(),
                },
                BackupSource {
                    name: "Sample (Elephants Dream)".into(),
                    url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4".into(),
                },
            ],
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = env_parse("VIDRA_PORT") {
            config.port = port;
        }
        if let Some(secs) = env_parse("VIDRA_PROVIDER_TIMEOUT_SECS") {
            config.provider_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse("VIDRA_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}
