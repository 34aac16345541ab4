//! Content identifier normalization.
//!
//! Incoming ids arrive in external namespaces (IMDb `tt…`, TMDB `tmdb:…`).
//! Provider URL templates want the bare id, so recognized prefixes are
//! stripped here. Unknown formats pass through unchanged; provider URL
//! builders do their own validation, so being permissive here is safe.

/// Namespace prefixes that are stripped from incoming ids.
const STRIPPED_PREFIXES: &[&str] = &["tmdb:"];

/// Normalize a raw content id into its provider-agnostic form.
///
/// IMDb ids (`tt0468569`) are already canonical and pass through. `tmdb:`
/// prefixed ids lose the prefix. Anything else is returned as-is. Pure
/// function, never fails.
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    for prefix in STRIPPED_PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imdb_ids_pass_through() {
        assert_eq!(normalize_id("tt0468569"), "tt0468569");
    }

    #[test]
    fn tmdb_prefix_is_stripped() {
        assert_eq!(normalize_id("tmdb:533535"), "533535");
    }

    #[test]
    fn unknown_formats_pass_through() {
        assert_eq!(normalize_id("63174"), "63174");
        assert_eq!(normalize_id(""), "");
        assert_eq!(normalize_id("anidb:1234"), "anidb:1234");
    }
}
