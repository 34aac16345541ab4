//! Direct-URL extraction strategies.
//!
//! Given a provider's embed URL, try to recover the direct media URL the
//! page would play. Two strategies exist: [`fetch`] scans the raw response
//! body (cheap, covers most hosts), [`rendered`] additionally executes
//! inline scripts in an isolated JS context (expensive, reserved for hosts
//! that assemble the URL client-side). Both are read-only against the
//! provider and idempotent.

pub mod fetch;
pub mod patterns;
pub mod rendered;

use thiserror::Error;
use url::Url;

use crate::http_client::PageFetcher;
use crate::provider::Strategy;

/// Why an extraction attempt produced nothing. A miss (page fine, no media
/// reference) is `Ok(None)` at the strategy level, not an error.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unusable response (status {status})")]
    UnusablePage { status: u16 },

    #[error("render failure: {0}")]
    Render(String),
}

/// Result of one (request, provider) extraction pass. Created once, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A direct media URL was recovered.
    Direct { url: String, strategy: Strategy },
    /// Extraction failed or was not attempted; the embed page itself is
    /// offered instead.
    Embed { url: String },
    /// Nothing usable at all for this provider.
    Failed { reason: String },
}

impl Outcome {
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }
}

/// Run the given strategy against an embed URL.
pub async fn run(
    strategy: Strategy,
    fetcher: &dyn PageFetcher,
    embed_url: &str,
) -> Result<Option<String>, ExtractError> {
    match strategy {
        Strategy::Pattern => fetch::extract_by_pattern(fetcher, embed_url).await,
        Strategy::Rendered => rendered::extract_by_rendering(fetcher, embed_url).await,
    }
}

/// Referer presented to the embed host: its own origin, the way a hosting
/// page embedding the iframe would look.
pub(crate) fn referer_for(embed_url: &str) -> String {
    Url::parse(embed_url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|host| format!("{}://{host}/", u.scheme()))
        })
        .unwrap_or_default()
}
