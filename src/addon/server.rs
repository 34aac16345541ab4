//! Axum HTTP server for the addon routes.
//!
//! Routes follow the addon protocol layout:
//!
//! ```text
//! GET /manifest.json
//! GET /catalog/{type}/{catalog_id}.json
//! GET /catalog/{type}/{catalog_id}/{extra}.json
//! GET /meta/{type}/{id}.json
//! GET /stream/{type}/{id}.json
//! ```
//!
//! Every response is JSON with permissive CORS (players are browser
//! contexts on foreign origins). Trailing `.json` is stripped in the
//! handlers since path parameters match whole segments.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use super::{catalog, manifest, meta, StreamsResponse};
use crate::provider::{ContentRef, MediaType};
use crate::resolver::Resolver;

#[derive(Clone)]
struct AppState {
    resolver: Arc<Resolver>,
}

/// Build the addon router around a shared resolver.
#[must_use]
pub fn router(resolver: Arc<Resolver>) -> Router {
    Router::new()
        .route("/manifest.json", get(manifest_route))
        .route("/catalog/{type}/{catalog_id}", get(catalog_route))
        .route("/catalog/{type}/{catalog_id}/{extra}", get(catalog_extra_route))
        .route("/meta/{type}/{id}", get(meta_route))
        .route("/stream/{type}/{id}", get(stream_route))
        .layer(CorsLayer::permissive())
        .with_state(AppState { resolver })
}

/// Bind and serve until the process exits.
pub async fn serve(resolver: Arc<Resolver>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "addon listening");
    axum::serve(listener, router(resolver)).await?;
    Ok(())
}

async fn manifest_route() -> Json<manifest::Manifest> {
    Json(manifest::manifest())
}

async fn catalog_route(
    Path((kind, _catalog_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    catalog_response(&kind, None)
}

async fn catalog_extra_route(
    Path((kind, _catalog_id, extra)): Path<(String, String, String)>,
) -> Result<Json<Value>, StatusCode> {
    catalog_response(&kind, Some(strip_json(&extra)))
}

fn catalog_response(kind: &str, extra: Option<&str>) -> Result<Json<Value>, StatusCode> {
    let media_type = MediaType::parse(strip_json(kind)).ok_or(StatusCode::NOT_FOUND)?;
    let (search, skip) = extra.map(parse_extra).unwrap_or((None, 0));
    let metas = catalog::listing(media_type, search.as_deref(), skip);
    Ok(Json(serde_json::json!({ "metas": metas })))
}

async fn meta_route(
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<meta::MetaResponse>, StatusCode> {
    let media_type = MediaType::parse(strip_json(&kind)).ok_or(StatusCode::NOT_FOUND)?;
    let id = strip_json(&id);
    let (base_id, _, _) = split_compound(id);
    Ok(Json(meta::MetaResponse {
        meta: meta::detail(base_id, media_type),
    }))
}

async fn stream_route(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<StreamsResponse>, StatusCode> {
    let media_type = MediaType::parse(strip_json(&kind)).ok_or(StatusCode::NOT_FOUND)?;
    let id = strip_json(&id);
    debug!(%id, ?media_type, "stream request");

    let content = match media_type {
        MediaType::Movie => ContentRef::movie(id),
        MediaType::Series => {
            let (base_id, season, episode) = split_compound(id);
            ContentRef {
                id: base_id.to_string(),
                media_type: MediaType::Series,
                season,
                episode,
            }
        }
    };

    let streams = state.resolver.resolve(&content).await;
    Ok(Json(StreamsResponse::from_streams(&streams)))
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Split a compound episode id (`"<id>:<season>:<episode>"`) from the end,
/// so namespace prefixes containing `:` survive. A plain id comes back
/// unchanged with no addressing.
fn split_compound(id: &str) -> (&str, Option<u32>, Option<u32>) {
    let mut rest = id;
    let mut tail: [Option<u32>; 2] = [None, None];
    for slot in &mut tail {
        let Some((head, last)) = rest.rsplit_once(':') else {
            break;
        };
        let Ok(number) = last.parse::<u32>() else {
            break;
        };
        *slot = Some(number);
        rest = head;
    }
    match tail {
        [Some(episode), Some(season)] => (rest, Some(season), Some(episode)),
        _ => (id, None, None),
    }
}

/// Parse an extra segment (`"search=dark"`, `"skip=20"`) into its parts.
fn parse_extra(extra: &str) -> (Option<String>, usize) {
    let mut search = None;
    let mut skip = 0;
    for (key, value) in url::form_urlencoded::parse(extra.as_bytes()) {
        match key.as_ref() {
            "search" => search = Some(value.into_owned()),
            "skip" => skip = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    (search, skip)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::StreamCache;
    use crate::config::Config;
    use crate::http_client::{Page, PageFetcher};
    use crate::provider::Registry;

    struct CannedFetcher {
        bodies: HashMap<&'static str, &'static str>,
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch_page(&self, url: &str, _referer: &str) -> anyhow::Result<Page> {
            let body = self
                .bodies
                .iter()
                .find(|(prefix, _)| url.starts_with(**prefix))
                .map_or("", |(_, body)| *body);
            Ok(Page {
                status: 200,
                final_url: url.to_string(),
                content_type: Some("text/html".into()),
                body: body.to_string(),
            })
        }
    }

    fn test_router() -> Router {
        let registry = Registry::new(vec![Registry::provider(
            "vidfast",
            "VidFast",
            1,
            crate::provider::Capability::Extract(crate::provider::Strategy::Pattern),
            Some("https://vidfast.pro/movie/{id}"),
            Some("https://vidfast.pro/tv/{id}/{season}/{episode}"),
        )]);
        let config = Config {
            provider_timeout: Duration::from_millis(500),
            backups: Vec::new(),
            ..Config::default()
        };
        let fetcher = CannedFetcher {
            bodies: [(
                "https://vidfast.pro/movie/tt0468569",
                r#"var cfg = { file: "https://cdn.x/a.m3u8" };"#,
            )]
            .into_iter()
            .collect(),
        };
        let resolver = Resolver::new(
            registry,
            StreamCache::new(config.cache_ttl),
            Arc::new(fetcher),
            config,
        );
        router(Arc::new(resolver))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn manifest_is_served() {
        let (status, json) = get_json(test_router(), "/manifest.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "org.vidra.streams");
        assert_eq!(json["resources"][1], "stream");
    }

    #[tokio::test]
    async fn catalog_lists_movies() {
        let (status, json) = get_json(test_router(), "/catalog/movie/vidra_movies.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metas"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn catalog_extra_search_filters() {
        let (status, json) =
            get_json(test_router(), "/catalog/movie/vidra_movies/search=dark.json").await;
        assert_eq!(status, StatusCode::OK);
        let metas = json["metas"].as_array().unwrap();
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0]["name"], "The Dark Knight");
    }

    #[tokio::test]
    async fn unknown_media_type_is_404() {
        let (status, _) = get_json(test_router(), "/catalog/channel/whatever.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn series_meta_includes_episodes() {
        let (status, json) = get_json(test_router(), "/meta/series/tt4052886.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["videos"].as_array().unwrap().len(), 30);
    }

    #[tokio::test]
    async fn stream_route_returns_direct_hit() {
        let (status, json) = get_json(test_router(), "/stream/movie/tt0468569.json").await;
        assert_eq!(status, StatusCode::OK);
        let streams = json["streams"].as_array().unwrap();
        assert_eq!(streams[0]["url"], "https://cdn.x/a.m3u8");
        assert_eq!(streams[0]["behaviorHints"]["notWebReady"], false);
    }

    #[tokio::test]
    async fn series_stream_parses_compound_id() {
        let (status, json) = get_json(test_router(), "/stream/series/tt4052886:1:2.json").await;
        assert_eq!(status, StatusCode::OK);
        let streams = json["streams"].as_array().unwrap();
        assert!(!streams.is_empty());
        assert_eq!(
            streams[0]["behaviorHints"]["bingeGroup"],
            "vidfast-tt4052886"
        );
    }

    #[test]
    fn compound_split_parses_from_the_end() {
        assert_eq!(split_compound("tt4052886:1:2"), ("tt4052886", Some(1), Some(2)));
        assert_eq!(split_compound("tmdb:63174:3:10"), ("tmdb:63174", Some(3), Some(10)));
        assert_eq!(split_compound("tt4052886"), ("tt4052886", None, None));
        assert_eq!(split_compound("tmdb:63174"), ("tmdb:63174", None, None));
    }

    #[test]
    fn extra_segment_parsing() {
        assert_eq!(parse_extra("search=dark"), (Some("dark".into()), 0));
        assert_eq!(parse_extra("skip=20"), (None, 20));
        assert_eq!(
            parse_extra("search=the%20dark&skip=5"),
            (Some("the dark".into()), 5)
        );
    }
}
