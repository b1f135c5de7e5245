//! Checksum and URL duplication across versions.

use std::collections::{HashMap, HashSet};

use super::Finding;
use crate::conandata::SourceEntry;

/// Single-pass index of checksums (first-seen version) and URLs.
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    checksums: HashMap<String, String>,
    urls: HashSet<String>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entry` and returns the duplications it introduces, checksum first.
    ///
    /// URLs are compared as raw strings (case-sensitive). Only repeated
    /// occurrences are reported and the message names the repeating version.
    pub fn observe(&mut self, entry: &SourceEntry) -> Vec<Finding> {
        let mut findings = Vec::new();

        match self.checksums.get(&entry.checksum) {
            Some(first) if *first != entry.version => findings.push(Finding::ChecksumReused {
                checksum: entry.checksum.clone(),
                version: entry.version.clone(),
                first_version: first.clone(),
            }),
            Some(_) => {}
            None => {
                self.checksums
                    .insert(entry.checksum.clone(), entry.version.clone());
            }
        }

        if !self.urls.insert(entry.url.clone()) {
            findings.push(Finding::DuplicateUrl {
                url: entry.url.clone(),
                version: entry.version.clone(),
            });
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(version: &str, url: &str, checksum: &str) -> SourceEntry {
        SourceEntry {
            version: version.into(),
            url: url.into(),
            checksum: checksum.into(),
        }
    }

    #[test]
    fn checksum_reused_once_per_later_version() {
        let mut d = DuplicateDetector::new();
        assert!(d.observe(&entry("1.0", "https://a/1", "aaa")).is_empty());
        let f = d.observe(&entry("1.1", "https://a/2", "aaa"));
        assert_eq!(
            f,
            vec![Finding::ChecksumReused {
                checksum: "aaa".into(),
                version: "1.1".into(),
                first_version: "1.0".into(),
            }]
        );
        let f = d.observe(&entry("1.2", "https://a/3", "aaa"));
        assert_eq!(f.len(), 1);
        // Still attributed to the first version.
        assert!(matches!(&f[0], Finding::ChecksumReused { first_version, .. } if first_version == "1.0"));
    }

    #[test]
    fn same_version_mirrors_share_checksum_silently() {
        let mut d = DuplicateDetector::new();
        assert!(d.observe(&entry("1.0", "https://m1/a", "aaa")).is_empty());
        assert!(d.observe(&entry("1.0", "https://m2/a", "aaa")).is_empty());
    }

    #[test]
    fn duplicate_url_reported_on_repeats_only() {
        let mut d = DuplicateDetector::new();
        assert!(d.observe(&entry("1.0", "https://a/x.zip", "a")).is_empty());
        let f = d.observe(&entry("2.0", "https://a/x.zip", "b"));
        assert_eq!(
            f,
            vec![Finding::DuplicateUrl {
                url: "https://a/x.zip".into(),
                version: "2.0".into(),
            }]
        );
        let f = d.observe(&entry("3.0", "https://a/x.zip", "c"));
        assert!(matches!(&f[0], Finding::DuplicateUrl { version, .. } if version == "3.0"));
    }

    #[test]
    fn url_comparison_is_case_sensitive() {
        let mut d = DuplicateDetector::new();
        assert!(d.observe(&entry("1.0", "https://a/X.zip", "a")).is_empty());
        assert!(d.observe(&entry("2.0", "https://a/x.zip", "b")).is_empty());
    }

    #[test]
    fn both_duplications_in_one_entry() {
        let mut d = DuplicateDetector::new();
        d.observe(&entry("1.0", "https://a/x.zip", "a"));
        let f = d.observe(&entry("2.0", "https://a/x.zip", "a"));
        assert_eq!(f.len(), 2);
        assert!(matches!(f[0], Finding::ChecksumReused { .. }));
        assert!(matches!(f[1], Finding::DuplicateUrl { .. }));
    }
}
