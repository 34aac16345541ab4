//! Addon manifest: what this service offers and which ids it answers for.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub id: &'static str,
    pub version: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub resources: Vec<&'static str>,
    pub types: Vec<&'static str>,
    pub catalogs: Vec<CatalogDescriptor>,
    #[serde(rename = "idPrefixes")]
    pub id_prefixes: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub media_type: &'static str,
    pub id: &'static str,
    pub name: &'static str,
    pub extra: Vec<ExtraField>,
}

#[derive(Debug, Serialize)]
pub struct ExtraField {
    pub name: &'static str,
    #[serde(rename = "isRequired")]
    pub is_required: bool,
}

fn optional_extras() -> Vec<ExtraField> {
    vec![
        ExtraField {
            name: "search",
            is_required: false,
        },
        ExtraField {
            name: "skip",
            is_required: false,
        },
    ]
}

/// The served manifest. Version tracks the crate version.
#[must_use]
pub fn manifest() -> Manifest {
    Manifest {
        id: "org.vidra.streams",
        version: env!("CARGO_PKG_VERSION"),
        name: "Vidra",
        description: "Multi-provider stream resolver: direct links where extractable, embed pages otherwise",
        resources: vec!["catalog", "stream", "meta"],
        types: vec!["movie", "series"],
        catalogs: vec![
            CatalogDescriptor {
                media_type: "movie",
                id: "vidra_movies",
                name: "Vidra Movies",
                extra: optional_extras(),
            },
            CatalogDescriptor {
                media_type: "series",
                id: "vidra_series",
                name: "Vidra TV Shows",
                extra: optional_extras(),
            },
        ],
        id_prefixes: vec!["tt", "tmdb:"],
    }
}
