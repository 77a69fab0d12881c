//! Utility functions for version comparison and app id matching

use semver::Version;
use tracing::debug;

use crate::types::VersionComparison;

/// Decide whether a client reporting `installed` should be offered `release`.
///
/// An empty `installed` version means the app is not installed yet, which
/// always needs the release.
pub fn is_update_available(installed: &str, release: &str, comparison: VersionComparison) -> bool {
    match comparison {
        VersionComparison::Exact => installed != release,
        VersionComparison::Semver => {
            if installed == release {
                return false;
            }
            let Ok(installed_ver) = Version::parse(installed) else {
                debug!("Installed version {:?} is not semver, offering release", installed);
                return true;
            };
            match Version::parse(release) {
                Ok(release_ver) => installed_ver < release_ver,
                Err(_) => {
                    debug!(
                        "Release version {:?} is not semver, falling back to exact comparison",
                        release
                    );
                    installed != release
                }
            }
        }
    }
}

/// Omaha app ids are GUIDs whose letter case varies between clients.
pub fn app_id_matches(expected: &str, actual: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(actual.trim())
}
