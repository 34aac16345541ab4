//! Stremio-compatible addon boundary.
//!
//! Thin JSON layer over the resolver: the wire types here mirror the
//! addon protocol (camelCase fields, `behaviorHints`), while everything
//! inward of this module speaks the crate's own types. Resolution
//! failures never surface as HTTP errors; the protocol's empty-list
//! responses are the degraded mode.

pub mod catalog;
pub mod manifest;
pub mod meta;
pub mod server;

use serde::Serialize;

use crate::descriptor::Stream;

/// `{"streams": [...]}` envelope.
#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<WireStream>,
}

impl StreamsResponse {
    #[must_use]
    pub fn from_streams(streams: &[Stream]) -> Self {
        Self {
            streams: streams.iter().map(WireStream::from).collect(),
        }
    }
}

/// One stream object on the wire.
#[derive(Debug, Serialize)]
pub struct WireStream {
    pub name: String,
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "behaviorHints")]
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Serialize)]
pub struct BehaviorHints {
    /// Inverse of the internal `web_ready` flag: hints the player that the
    /// URL may need an external handler.
    #[serde(rename = "notWebReady")]
    pub not_web_ready: bool,
    #[serde(rename = "bingeGroup", skip_serializing_if = "Option::is_none")]
    pub binge_group: Option<String>,
}

impl From<&Stream> for WireStream {
    fn from(stream: &Stream) -> Self {
        Self {
            name: stream.name.clone(),
            title: stream.title.clone(),
            url: stream.url.clone(),
            description: stream.description.clone(),
            behavior_hints: BehaviorHints {
                not_web_ready: !stream.web_ready,
                binge_group: stream.binge_group.clone(),
            },
        }
    }
}
