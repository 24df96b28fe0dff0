// src/types/analysis.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image formats the model accepts for offer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Map a lowercase file extension to a supported format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl FromStr for ImageMime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or(s).trim().to_lowercase();
        match essence.as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            other => Err(format!("Unsupported image type: {}", other)),
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One offer letter submitted for analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Image { bytes: Vec<u8>, mime_type: ImageMime },
    Text { content: String },
}

impl AnalysisInput {
    pub fn image(bytes: Vec<u8>, mime_type: ImageMime) -> Self {
        Self::Image { bytes, mime_type }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image { .. } => "image",
            Self::Text { .. } => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Pass,
    Fail,
    Warning,
}

impl IndicatorStatus {
    pub const ALL: [IndicatorStatus; 3] = [Self::Pass, Self::Fail, Self::Warning];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Warning => "Warning",
        }
    }
}

impl FromStr for IndicatorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown status {:?}, expected one of Pass, Fail, Warning", s))
    }
}

impl fmt::Display for IndicatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fraud-detection criterion and its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyIndicator {
    #[serde(rename = "indicator")]
    pub name: String,
    pub status: IndicatorStatus,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_genuine: bool,
    pub reason: String,
    #[serde(rename = "keyIndicators")]
    pub indicators: Vec<KeyIndicator>,
}

impl AnalysisResult {
    pub fn count_with_status(&self, status: IndicatorStatus) -> usize {
        self.indicators
            .iter()
            .filter(|indicator| indicator.status == status)
            .count()
    }
}
