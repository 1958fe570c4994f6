use serde::{Deserialize, Serialize};

use super::Platform;

/// Result payload of a processed indexing job, reduced to the insights the
/// audit needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoIndex {
    #[serde(default)]
    pub videos: Vec<IndexedVideo>,
    #[serde(rename = "summarizedInsights", default)]
    pub summarized_insights: Option<SummarizedInsights>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexedVideo {
    #[serde(default)]
    pub insights: VideoInsightSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInsightSet {
    #[serde(default)]
    pub transcript: Vec<TextSegment>,
    #[serde(default)]
    pub ocr: Vec<TextSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextSegment {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizedInsights {
    #[serde(default)]
    pub duration: Option<DurationInsight>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DurationInsight {
    #[serde(default)]
    pub seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub duration_seconds: Option<f64>,
    pub platform: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInsights {
    pub transcript: String,
    pub ocr_text: Vec<String>,
    pub metadata: VideoMetadata,
}

impl VideoIndex {
    pub fn extract(&self, platform: Platform) -> VideoInsights {
        let transcript = self
            .videos
            .iter()
            .flat_map(|v| v.insights.transcript.iter())
            .filter_map(|segment| segment.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ");

        let ocr_text = self
            .videos
            .iter()
            .flat_map(|v| v.insights.ocr.iter())
            .filter_map(|segment| segment.text.clone())
            .collect();

        let duration_seconds = self
            .summarized_insights
            .as_ref()
            .and_then(|s| s.duration.as_ref())
            .and_then(|d| d.seconds);

        VideoInsights {
            transcript,
            ocr_text,
            metadata: VideoMetadata {
                duration_seconds,
                platform: platform.as_str().to_string(),
            },
        }
    }
}
