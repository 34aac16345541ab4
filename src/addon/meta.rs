//! Templated item metadata.
//!
//! Like the catalogs, metadata here is synthesized rather than fetched
//! from an external metadata API. Series get a fixed three-season,
//! ten-episode grid whose compound video ids feed straight back into the
//! stream route.

use serde::Serialize;

use crate::provider::MediaType;

const SEASONS: u32 = 3;
const EPISODES_PER_SEASON: u32 = 10;

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub meta: MetaDetail,
}

#[derive(Debug, Serialize)]
pub struct MetaDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub name: String,
    pub poster: String,
    pub background: String,
    pub description: String,
    pub year: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    pub genre: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<Video>>,
}

/// One episode entry in a series meta.
#[derive(Debug, Serialize)]
pub struct Video {
    /// Compound id (`"<id>:<season>:<episode>"`), the same shape the
    /// stream route parses back.
    pub id: String,
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub released: String,
    pub thumbnail: String,
}

/// Metadata for one item. `id` is expected pre-normalized; for series a
/// compound id should be reduced to its base before calling.
#[must_use]
pub fn detail(id: &str, media_type: MediaType) -> MetaDetail {
    let poster = format!("https://images.metahub.space/poster/medium/{id}/img");
    MetaDetail {
        id: id.to_string(),
        media_type,
        name: format!("Content {id}"),
        poster: poster.clone(),
        background: format!("https://images.metahub.space/background/medium/{id}/img"),
        description: format!("Content description for {id}"),
        year: "2023".to_string(),
        imdb_rating: "7.5".to_string(),
        genre: vec!["Action".to_string(), "Drama".to_string()],
        runtime: match media_type {
            MediaType::Movie => Some("120 min".to_string()),
            MediaType::Series => None,
        },
        videos: match media_type {
            MediaType::Movie => None,
            MediaType::Series => Some(episode_grid(id, &poster)),
        },
    }
}

fn episode_grid(id: &str, thumbnail: &str) -> Vec<Video> {
    let mut videos = Vec::with_capacity((SEASONS * EPISODES_PER_SEASON) as usize);
    for season in 1..=SEASONS {
        for episode in 1..=EPISODES_PER_SEASON {
            videos.push(Video {
                id: format!("{id}:{season}:{episode}"),
                title: format!("Season {season}, Episode {episode}"),
                season,
                episode,
                released: format!("{}-01-{episode:02}T00:00:00.000Z", 2020 + season),
                thumbnail: thumbnail.to_string(),
            });
        }
    }
    videos
}
