//! Built-in sample catalogs with search and skip pagination.
//!
//! A real deployment would back this with a metadata API; the built-in
//! tables exist so the addon is browsable out of the box.

use serde::Serialize;

use crate::provider::MediaType;

/// Page size for catalog pagination.
pub const PAGE_SIZE: usize = 20;

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    year: &'static str,
}

const SAMPLE_MOVIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "tt6263850",
        name: "Batman Forever",
        year: "1995",
    },
    CatalogEntry {
        id: "tt0468569",
        name: "The Dark Knight",
        year: "2008",
    },
    CatalogEntry {
        id: "tt1375666",
        name: "Inception",
        year: "2010",
    },
    CatalogEntry {
        id: "533535",
        name: "Deadpool",
        year: "2016",
    },
    CatalogEntry {
        id: "tt0137523",
        name: "Fight Club",
        year: "1999",
    },
];

const SAMPLE_SERIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "tt4052886",
        name: "Lucifer",
        year: "2016",
    },
    CatalogEntry {
        id: "tt0903747",
        name: "Breaking Bad",
        year: "2008",
    },
    CatalogEntry {
        id: "63174",
        name: "Game of Thrones",
        year: "2011",
    },
    CatalogEntry {
        id: "tt0944947",
        name: "Game of Thrones",
        year: "2011",
    },
    CatalogEntry {
        id: "tt2306299",
        name: "Vikings",
        year: "2013",
    },
];

/// Catalog listing item.
#[derive(Debug, Serialize)]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub name: String,
    pub poster: String,
    pub year: String,
}

fn preview(entry: &CatalogEntry, media_type: MediaType) -> MetaPreview {
    MetaPreview {
        id: entry.id.to_string(),
        media_type,
        name: entry.name.to_string(),
        poster: format!("https://images.metahub.space/poster/medium/{}/img", entry.id),
        year: entry.year.to_string(),
    }
}

/// List the catalog for `media_type`. A search term filters by substring
/// (case-insensitive) and ignores pagination; otherwise `skip` pages
/// through in windows of [`PAGE_SIZE`].
#[must_use]
pub fn listing(media_type: MediaType, search: Option<&str>, skip: usize) -> Vec<MetaPreview> {
    let table = match media_type {
        MediaType::Movie => SAMPLE_MOVIES,
        MediaType::Series => SAMPLE_SERIES,
    };

    if let Some(term) = search {
        let term = term.to_lowercase();
        return table
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&term))
            .map(|entry| preview(entry, media_type))
            .collect();
    }

    table
        .iter()
        .skip(skip)
        .take(PAGE_SIZE)
        .map(|entry| preview(entry, media_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_listing_is_complete() {
        let metas = listing(MediaType::Movie, None, 0);
        assert_eq!(metas.len(), 5);
        assert_eq!(metas[0].id, "tt6263850");
        assert!(metas[0].poster.contains("tt6263850"));
    }

    #[test]
    fn search_filters_case_insensitively() {
        let metas = listing(MediaType::Movie, Some("dark"), 0);
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].name, "The Dark Knight");
    }

    #[test]
    fn search_miss_is_empty_not_error() {
        assert!(listing(MediaType::Series, Some("zzz"), 0).is_empty());
    }

    #[test]
    fn skip_past_end_is_empty() {
        assert!(listing(MediaType::Series, None, PAGE_SIZE).is_empty());
    }

    #[test]
    fn series_type_tag_serializes_lowercase() {
        let metas = listing(MediaType::Series, None, 0);
        let json = serde_json::to_value(&metas[0]).unwrap();
        assert_eq!(json["type"], "series");
    }
}
