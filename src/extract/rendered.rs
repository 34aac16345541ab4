//! Rendered extraction: DOM inspection plus isolated script execution.
//!
//! For hosts that assemble the media URL client-side. The page is parsed
//! into a DOM and its inline scripts are executed in a throwaway `QuickJS`
//! context (see [`crate::js_engine`]); the context is dropped on every exit
//! path. Inspection order, first hit wins:
//!
//! 1. `video`/`source` element `src` attributes
//! 2. Inline script text, through the shared pattern rules
//! 3. Script execution artifacts: player-shim captures, then string-valued
//!    globals left behind by the scripts

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

use super::{patterns, referer_for, ExtractError};
use crate::http_client::{Page, PageFetcher};
use crate::js_engine::JsEngine;

static MEDIA_SRC: Lazy<Selector> =
    Lazy::new(|| Selector::parse("video[src], video source[src], source[src]").expect("selector"));
static SCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("script").expect("selector"));

/// Fetch `embed_url`, render it, and inspect DOM and script state for a
/// direct media URL.
///
/// `Ok(None)` means the page rendered but exposed no media reference.
#[instrument(skip(fetcher), fields(url = %embed_url))]
pub async fn extract_by_rendering(
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

    // DOM parsing and script execution are synchronous and can burn real
    // CPU time on hostile pages; run them on the blocking pool so the
    // caller's timeout can fire while a runaway script is being cut off.
    tokio::task::spawn_blocking(move || render_and_inspect(&page))
        .await
        .map_err(|err| ExtractError::Render(err.to_string()))?
}

fn render_and_inspect(page: &Page) -> Result<Option<String>, ExtractError> {
    let doc = Html::parse_document(&page.body);

    for element in doc.select(&MEDIA_SRC) {
        if let Some(src) = element.value().attr("src") {
            if let Some(found) = patterns::normalize_candidate(src, &page.final_url) {
                debug!(%found, "media element src accepted");
                return Ok(Some(found));
            }
        }
    }

    let scripts: Vec<String> = doc
        .select(&SCRIPT)
        .filter(|el| el.value().attr("src").is_none())
        .map(|el| el.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect();

    for script in &scripts {
        if let Some(found) = patterns::scan(script, &page.final_url) {
            debug!(%found, "inline script text matched");
            return Ok(Some(found));
        }
    }

    inspect_script_state(&scripts, &page.final_url)
}

/// Execute inline scripts in a fresh context and inspect what they left
/// behind. The engine is scoped to this call; drop tears it down on every
/// path, the error ones included.
fn inspect_script_state(
    scripts: &[String],
    page_url: &str,
) -> Result<Option<String>, ExtractError> {
    let engine = JsEngine::new().map_err(|err| {
        warn!(%err, "script context unavailable");
        ExtractError::Render(err.to_string())
    })?;
    engine
        .install_embed_shim(page_url)
        .map_err(|err| ExtractError::Render(err.to_string()))?;

    engine.run_scripts(scripts);
    engine.run_deferred();

    for candidate in engine.captured_sources() {
        if let Some(found) = patterns::normalize_candidate(&candidate, page_url) {
            debug!(%found, "player shim capture accepted");
            return Ok(Some(found));
        }
    }

    for candidate in engine.string_globals() {
        if let Some(found) = patterns::normalize_candidate(&candidate, page_url) {
            debug!(%found, "global string binding accepted");
            return Ok(Some(found));
        }
    }

    Ok(None)
}
