//! Browser-like request profiles.
//!
//! Embed hosts routinely reject obvious bot traffic, so every provider
//! fetch carries a realistic Chrome header set. Profiles are randomized
//! per client to avoid a single static fingerprint across deployments.

use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, REFERER, USER_AGENT,
};

/// Header profile applied to embed page fetches.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
    pub sec_ch_ua: String,
    pub sec_ch_ua_platform: String,
}

/// Recent Chrome versions with high market share.
const CHROME_VERSIONS: &[(&str, &str)] = &[
    ("131", "131.0.0.0"),
    ("130", "130.0.0.0"),
    ("129", "129.0.0.0"),
    ("128", "128.0.0.0"),
];

const PLATFORMS: &[(&str, &str)] = &[
    ("Windows NT 10.0; Win64; x64", "\"Windows\""),
    ("Macintosh; Intel Mac OS X 10_15_7", "\"macOS\""),
    ("X11; Linux x86_64", "\"Linux\""),
];

const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.9",
    "en-US,en;q=0.9,de;q=0.8",
    "en-US,en;q=0.9,es;q=0.8",
];

/// Generate a realistic Chrome profile.
#[must_use]
pub fn chrome_profile() -> BrowserProfile {
    let mut rng = rand::thread_rng();
    let (major, full) = CHROME_VERSIONS.choose(&mut rng).unwrap();
    let (os, sec_ch_platform) = PLATFORMS.choose(&mut rng).unwrap();

    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({os}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{full} Safari/537.36"
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
            .to_string(),
        accept_language: (*ACCEPT_LANGUAGES.choose(&mut rng).unwrap()).to_string(),
        accept_encoding: "gzip, deflate, br, zstd".to_string(),
        sec_ch_ua: format!(
            "\"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""
        ),
        sec_ch_ua_platform: (*sec_ch_platform).to_string(),
    }
}

impl BrowserProfile {
    /// Convert the profile into default request headers.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, header_value(&self.user_agent));
        headers.insert(ACCEPT, header_value(&self.accept));
        headers.insert(ACCEPT_LANGUAGE, header_value(&self.accept_language));
        headers.insert(ACCEPT_ENCODING, header_value(&self.accept_encoding));
        headers.insert("Sec-CH-UA", header_value(&self.sec_ch_ua));
        headers.insert("Sec-CH-UA-Mobile", HeaderValue::from_static("?0"));
        headers.insert("Sec-CH-UA-Platform", header_value(&self.sec_ch_ua_platform));
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("iframe"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));

        headers
    }

    /// Headers for fetching `url` as if embedded from `referer`.
    pub fn to_headers_with_referer(&self, referer: &str) -> HeaderMap {
        let mut headers = self.to_headers();
        if let Ok(value) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, value);
        }
        headers
    }
}

fn header_value(s: &str) -> HeaderValue {
    // Profile strings are ASCII by construction.
    HeaderValue::from_str(s).unwrap_or_else(|_| HeaderValue::from_static(""))
}
