use std::fmt;

use reqwest::Url;

const YOUTUBE_HOSTS: [&str; 4] = ["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"];

/// A video URL from a platform the indexer knows how to acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    url: Url,
    platform: Platform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported video source: {0} (only YouTube URLs are accepted)")]
pub struct UnsupportedSource(pub String);

impl VideoSource {
    pub fn parse(raw: &str) -> Result<Self, UnsupportedSource> {
        let url = Url::parse(raw.trim()).map_err(|_| UnsupportedSource(raw.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UnsupportedSource(raw.to_string()));
        }

        let host = url
            .host_str()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| UnsupportedSource(raw.to_string()))?;

        if YOUTUBE_HOSTS.contains(&host.as_str()) {
            Ok(Self {
                url,
                platform: Platform::YouTube,
            })
        } else {
            Err(UnsupportedSource(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
