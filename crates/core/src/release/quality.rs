//! Quality tag extraction from release names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse resolution/encoding classification derived from a release name.
///
/// The variant order doubles as the map-key order in serialized catalog
/// documents, so it is part of the stored format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "4k")]
    Uhd4k,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Sd480 => "480p",
            Quality::Hd720 => "720p",
            Quality::Hd1080 => "1080p",
            Quality::Uhd4k => "4k",
            Quality::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy for quality-ambiguous names (a name carrying both an SD and a UHD
/// marker). The historical scan order checks 480p before 4k/2160p, so such a
/// name resolves to 480p; `UhdFirst` flips that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityOrder {
    #[default]
    UhdLast,
    UhdFirst,
}

/// Substrings that classify a release as 720p when no explicit resolution
/// string is present.
const HD720_MARKERS: &[&str] = &["720p", "dvd", "dvdrip", "web-dl", "webdl", "webrip"];

const UHD_MARKERS: &[&str] = &["4k", "2160p"];

/// Extract the quality tag from a release name under the default
/// (`UhdLast`) scan order.
pub fn extract_quality(name: &str) -> Quality {
    extract_quality_with(name, QualityOrder::UhdLast)
}

/// Extract the quality tag from a release name.
///
/// Markers are tested in priority order: 1080p, then the 720p group (which
/// absorbs DVD/WEB-DL/WEBRip tags), then 480p, then 4k/2160p. The first
/// match wins; a name with no marker is `Unknown`.
pub fn extract_quality_with(name: &str, order: QualityOrder) -> Quality {
    let name = name.to_lowercase();

    if order == QualityOrder::UhdFirst && contains_any(&name, UHD_MARKERS) {
        return Quality::Uhd4k;
    }
    if name.contains("1080p") {
        Quality::Hd1080
    } else if contains_any(&name, HD720_MARKERS) {
        Quality::Hd720
    } else if name.contains("480p") {
        Quality::Sd480
    } else if contains_any(&name, UHD_MARKERS) {
        Quality::Uhd4k
    } else {
        Quality::Unknown
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}
