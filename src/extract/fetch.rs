//! Pattern-based extraction: fetch once, scan the body.
//!
//! The cheap strategy. Most embed hosts ship the media URL somewhere in the
//! initial response (a jwplayer setup, a JSON config blob, a data
//! attribute), and a single fetch plus the shared rule scan recovers it.

use tracing::{debug, instrument};

use super::{patterns, referer_for, ExtractError};
use crate::http_client::PageFetcher;

/// Fetch `embed_url` and scan the response text for a direct media URL.
///
/// Returns `Ok(None)` when the page was fine but carried no recognizable
/// media reference; errors cover transport problems and unusable responses.
#[instrument(skip(fetcher), fields(url = %embed_url))]
pub async fn extract_by_pattern(
    fetcher: &dyn PageFetcher,
    embed_url: &str,
) -> Result<Option<String>, ExtractError> {
    let referer = referer_for(embed_url);
    let page = fetcher
        .fetch_page(embed_url, &referer)
        .await
        .map_err(|err| ExtractError::Transport(err.to_string()))?;

    if !page.is_usable() {
        return Err(ExtractError::UnusablePage {
            status: page.status,
        });
    }

    let found = patterns::scan(&page.body, &page.final_url);
    debug!(hit = found.is_some(), "pattern scan finished");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::*;
    use crate::http_client::Page;

    struct StubFetcher {
        page: Option<Page>,
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, _url: &str, _referer: &str) -> Result<Page> {
            self.page
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn html_page(body: &str) -> Page {
        Page {
            status: 200,
            final_url: "https://embed.example/movie/tt1".into(),
            content_type: Some("text/html".into()),
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn finds_media_url_in_body() {
        let fetcher = StubFetcher {
            page: Some(html_page(
                r#"<script>var player = { file: "https://cdn.x/a.m3u8" };</script>"#,
            )),
        };
        let found = extract_by_pattern(&fetcher, "https://embed.example/movie/tt1")
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("https://cdn.x/a.m3u8"));
    }

    #[tokio::test]
    async fn clean_page_without_media_is_a_miss_not_an_error() {
        let fetcher = StubFetcher {
            page: Some(html_page("<html><body>nothing here</body></html>")),
        };
        let found = extract_by_pattern(&fetcher, "https://embed.example/movie/tt1")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn error_status_is_an_unusable_page() {
        let fetcher = StubFetcher {
            page: Some(Page {
                status: 403,
                final_url: "https://embed.example/movie/tt1".into(),
                content_type: Some("text/html".into()),
                body: "<html>denied</html>".into(),
            }),
        };
        let err = extract_by_pattern(&fetcher, "https://embed.example/movie/tt1")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::UnusablePage { status: 403 }));
    }

    #[tokio::test]
    async fn transport_failure_propagates_as_error() {
        let fetcher = StubFetcher { page: None };
        let err = extract_by_pattern(&fetcher, "https://embed.example/movie/tt1")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Transport(_)));
    }
}
