//! Is the version embedded in its download URL?
//!
//! Two phases: each entry is classified while the run walks the sources, then
//! omissions are reported only if at least one version of the recipe was seen
//! inside its URL. A project that never embeds versions has no convention to
//! violate.

use super::Finding;

/// Prefix of synthetic Conan Center versions with no upstream release tag.
const SYNTHETIC_PREFIX: &str = "cci.";

#[derive(Debug, Default)]
pub struct VersionPresence {
    convention_seen: bool,
    candidates: Vec<(String, String)>,
}

impl VersionPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase one: classify one (version, url) pair.
    pub fn observe(&mut self, version: &str, url: &str) {
        let version_lc = version.to_lowercase();
        if version_lc.starts_with(SYNTHETIC_PREFIX) {
            return;
        }
        if url_contains_version(&url.to_lowercase(), &version_lc) {
            self.convention_seen = true;
        } else {
            self.candidates.push((version.to_string(), url.to_string()));
        }
    }

    /// True once any version was found inside its URL.
    pub fn convention_seen(&self) -> bool {
        self.convention_seen
    }

    /// Phase two: omissions in observation order, or nothing without the convention.
    pub fn finish(self) -> Vec<Finding> {
        if !self.convention_seen {
            if !self.candidates.is_empty() {
                tracing::debug!(
                    "no url embeds its version; {} omission(s) not reported",
                    self.candidates.len()
                );
            }
            return Vec::new();
        }
        self.candidates
            .into_iter()
            .map(|(version, url)| Finding::VersionNotInUrl { version, url })
            .collect()
    }
}

/// Both arguments must already be lowercase.
fn url_contains_version(url: &str, version: &str) -> bool {
    url.contains(version)
        || url.contains(&version.replace('.', ""))
        || url.contains(&version.replace('.', "_"))
        || url.contains(&version.replace('-', ""))
        || version
            .strip_suffix(".0")
            .is_some_and(|stripped| url.contains(stripped))
}
