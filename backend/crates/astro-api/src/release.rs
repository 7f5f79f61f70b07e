use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Latest published launcher release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Release {
    /// Tag without a leading `v`, for comparing against a crate version.
    pub fn version(&self) -> &str {
        normalize_version(&self.tag_name)
    }

    /// Most recently updated asset. Assets without a timestamp lose to
    /// dated ones; among equals the first listed wins.
    pub fn newest_asset(&self) -> Option<&ReleaseAsset> {
        self.assets.iter().fold(None, |best, asset| match best {
            None => Some(asset),
            Some(current) if asset.updated_at > current.updated_at => Some(asset),
            keep => keep,
        })
    }

    /// Whether this release differs from the running version.
    pub fn differs_from(&self, running_version: &str) -> bool {
        self.version() != normalize_version(running_version)
    }
}

fn normalize_version(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}
