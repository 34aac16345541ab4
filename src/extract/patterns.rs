//! Media-URL pattern rules.
//!
//! Embed pages are untrusted and adversarial: obfuscated players, decoy
//! URLs, subtitle and thumbnail assets that look like media. The scan here
//! trades perfect precision for robustness against format drift: an
//! ordered list of recognized shapes, a candidate normalizer, and a
//! denylist filter. First structurally valid survivor wins.
//!
//! Shapes, in priority order:
//! 1. Quoted string literals ending in a known media extension
//! 2. `file=` / `source=` / `url=` assignments pointing at one
//! 3. JSON-style `"file"` / `"url"` / `"source"` fields

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Recognized media container extensions, lowercase.
pub const MEDIA_EXTENSIONS: &[&str] = &["m3u8", "mpd", "mp4", "webm", "mkv", "mov", "ts"];

/// Substrings that mark a URL as a non-media asset.
const DENYLIST: &[&str] = &[
    "subtitle", "caption", ".vtt", ".srt", "thumb", "poster", "logo", "sprite", "preview",
];

/// Candidates shorter than this cannot be a real media URL.
const MIN_CANDIDATE_LEN: usize = 12;
/// Candidates longer than this are almost certainly obfuscation blobs.
const MAX_CANDIDATE_LEN: usize = 2048;

struct MediaRule {
    name: &'static str,
    regex: Regex,
    group: usize,
}

static RULES: Lazy<Vec<MediaRule>> = Lazy::new(|| {
    let ext = MEDIA_EXTENSIONS.join("|");
    vec![
        MediaRule {
            name: "quoted_literal",
            regex: Regex::new(&format!(
                r#"["'`]([^"'`\s]+?\.(?:{ext})(?:\?[^"'`\s]*)?)["'`]"#
            ))
            .expect("quoted_literal rule compiles"),
            group: 1,
        },
        MediaRule {
            name: "kv_assignment",
            regex: Regex::new(&format!(
                r#"\b(?:file|source|url)\s*=\s*["'`]?([^"'`&\s]+?\.(?:{ext})(?:\?[^"'`&\s]*)?)"#
            ))
            .expect("kv_assignment rule compiles"),
            group: 1,
        },
        MediaRule {
            name: "json_field",
            regex: Regex::new(&format!(
                r#""(?:file|url|source)"\s*:\s*"([^"]+?\.(?:{ext})(?:\?[^"]*)?)""#
            ))
            .expect("json_field rule compiles"),
            group: 1,
        },
    ]
});

/// Scan `text` for a direct media URL. Rules run in priority order; within
/// a rule, matches are tried in document order. The first candidate that
/// survives normalization and filtering wins.
#[must_use]
pub fn scan(text: &str, base_url: &str) -> Option<String> {
    for rule in RULES.iter() {
        for captures in rule.regex.captures_iter(text) {
            let Some(raw) = captures.get(rule.group).map(|m| m.as_str()) else {
                continue;
            };
            if let Some(candidate) = normalize_candidate(raw, base_url) {
                tracing::debug!(rule = rule.name, %candidate, "media candidate accepted");
                return Some(candidate);
            }
        }
    }
    None
}

/// Normalize and vet a raw candidate from any source (rule match, DOM
/// attribute, script global). Returns the absolute URL when the candidate
/// survives, `None` otherwise.
#[must_use]
pub fn normalize_candidate(raw: &str, base_url: &str) -> Option<String> {
    let cleaned = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .replace("\\/", "/");

    if cleaned.len() < MIN_CANDIDATE_LEN || cleaned.len() > MAX_CANDIDATE_LEN {
        return None;
    }

    let lowered = cleaned.to_ascii_lowercase();
    if DENYLIST.iter().any(|marker| lowered.contains(marker)) {
        return None;
    }

    let absolute = if cleaned.starts_with("//") {
        format!("https:{cleaned}")
    } else if cleaned.starts_with('/') {
        let base = Url::parse(base_url).ok()?;
        base.join(&cleaned).ok()?.to_string()
    } else {
        cleaned
    };

    let parsed = Url::parse(&absolute).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if !has_media_extension(parsed.path()) {
        return None;
    }

    Some(parsed.to_string())
}

/// Whether a path or URL string ends in a recognized media container
/// extension (query string ignored).
#[must_use]
pub fn has_media_extension(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let lowered = path.to_ascii_lowercase();
    MEDIA_EXTENSIONS
        .iter()
        .any(|ext| lowered.ends_with(&format!(".{ext}")))
}
