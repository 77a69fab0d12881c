//! Release metadata the update service answers with

use serde::{Deserialize, Serialize};

/// The downloadable payload of a release
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    /// File name under the versioned codebase, e.g. "update.gz"
    pub name: String,
    pub size: u64,
    /// Base64 SHA-1 of the payload, sent as `<package hash>`
    pub hash: String,
    /// Base64 SHA-256 of the payload, sent as `<action sha256>`
    pub sha256: String,
}

/// How an installed version is compared against the release version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionComparison {
    /// Any installed version that is not byte-for-byte the release version
    /// is offered the release.
    #[default]
    Exact,
    /// Only installed versions that are semantically older than the release
    /// (or absent, or not semver) are offered the release.
    Semver,
}

impl VersionComparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionComparison::Exact => "exact",
            VersionComparison::Semver => "semver",
        }
    }
}

impl std::str::FromStr for VersionComparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(VersionComparison::Exact),
            "semver" => Ok(VersionComparison::Semver),
            _ => Err(format!("Unknown version comparison: {}", s)),
        }
    }
}

impl std::fmt::Display for VersionComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the decision engine knows about the current release.
/// Read-only for the lifetime of the process.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    /// Name reported in `<response server="..">`
    pub server_name: String,
    pub channel: String,
    /// Base URL of the channel; packages live under `{base}/{version}/`
    pub channel_base_url: String,
    pub version: String,
    pub package: PackageDescriptor,
    /// When set, requests for any other app id are answered with
    /// `error-unknownApplication`.
    pub app_id: Option<String>,
    pub comparison: VersionComparison,
}

impl Default for ReleaseDescriptor {
    fn default() -> Self {
        let server_name = "update.release.core-os.net";
        Self {
            server_name: server_name.to_owned(),
            channel: "stable".to_owned(),
            channel_base_url: format!("https://{}/amd64-usr", server_name),
            version: "1298.7.0".to_owned(),
            package: PackageDescriptor {
                name: "update.gz".to_owned(),
                size: 268_813_155,
                hash: "KN5CSajd3mrFF0wXh81W+S1N6zI=".to_owned(),
                sha256: "PX/41xndZL/AGrobIJEmjiih2SNWQql7p34BMyrJq34=".to_owned(),
            },
            app_id: None,
            comparison: VersionComparison::Exact,
        }
    }
}
