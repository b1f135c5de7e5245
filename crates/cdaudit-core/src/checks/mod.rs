//! Individual checks and the findings they produce.
//!
//! Every check is advisory: a finding never aborts the run. Defects are
//! printed on stdout by the CLI, warnings go to the log stream.

pub mod archive;
pub mod checksum;
pub mod duplicates;
pub mod scheme;
pub mod version;

use serde::Serialize;
use std::fmt;

use crate::fetch_head::TransportKind;

/// Where a finding is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Printed on stdout.
    Defect,
    /// Logged with `tracing::warn!`.
    Warning,
}

/// One problem found in `conandata.yml` or behind one of its URLs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    ChecksumReused {
        checksum: String,
        version: String,
        first_version: String,
    },
    DuplicateUrl {
        url: String,
        version: String,
    },
    InsecureScheme {
        url: String,
    },
    UnknownScheme {
        url: String,
    },
    MalformedChecksum {
        checksum: String,
        version: String,
        /// Checksum key the digest was checked against (`sha256`, ...).
        algorithm: String,
    },
    VersionNotInUrl {
        version: String,
        url: String,
    },
    Unavailable {
        url: String,
        status: u32,
    },
    Unreachable {
        url: String,
        reason: TransportKind,
        detail: String,
    },
    SmallerArchive {
        url: String,
        alternative: String,
        /// Saving relative to the declared archive, in percent.
        saving_percent: f64,
    },
    PotentiallySmallerArchive {
        url: String,
        alternative: String,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::InsecureScheme { .. }
            | Finding::UnknownScheme { .. }
            | Finding::MalformedChecksum { .. }
            | Finding::Unreachable { .. } => Severity::Warning,
            Finding::ChecksumReused { .. }
            | Finding::DuplicateUrl { .. }
            | Finding::VersionNotInUrl { .. }
            | Finding::Unavailable { .. }
            | Finding::SmallerArchive { .. }
            | Finding::PotentiallySmallerArchive { .. } => Severity::Defect,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ChecksumReused {
                checksum,
                version,
                first_version,
            } => write!(
                f,
                "checksum {} of version {} is already used by version {}",
                checksum, version, first_version
            ),
            Finding::DuplicateUrl { url, version } => {
                write!(f, "url {} is present twice for version {}", url, version)
            }
            Finding::InsecureScheme { url } => write!(f, "url {} uses non secure http", url),
            Finding::UnknownScheme { url } => write!(f, "unknown url scheme {}", url),
            Finding::MalformedChecksum {
                checksum,
                version,
                algorithm,
            } => write!(
                f,
                "checksum {} of version {} is not a valid {} digest",
                checksum, version, algorithm
            ),
            Finding::VersionNotInUrl { version, url } => {
                write!(f, "url {} of version {} does not contain version", url, version)
            }
            Finding::Unavailable { url, status } => {
                write!(f, "url {} not available (status {})", url, status)
            }
            Finding::Unreachable { url, reason, detail } => {
                write!(f, "{} when contacting {}: {}", reason, url, detail)
            }
            Finding::SmallerArchive {
                alternative,
                saving_percent,
                ..
            } => write!(
                f,
                "a {:.1}% smaller archive exists at {}",
                saving_percent, alternative
            ),
            Finding::PotentiallySmallerArchive { alternative, .. } => {
                write!(f, "a potentially smaller archive exists at {}", alternative)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities() {
        let w = Finding::UnknownScheme {
            url: "ftp://x".into(),
        };
        assert_eq!(w.severity(), Severity::Warning);
        let d = Finding::Unavailable {
            url: "https://x".into(),
            status: 404,
        };
        assert_eq!(d.severity(), Severity::Defect);
    }

    #[test]
    fn smaller_archive_message_has_one_decimal() {
        let f = Finding::SmallerArchive {
            url: "https://example.com/pkg-1.0.tar.gz".into(),
            alternative: "https://example.com/pkg-1.0.tar.xz".into(),
            saving_percent: 40.0,
        };
        assert_eq!(
            f.to_string(),
            "a 40.0% smaller archive exists at https://example.com/pkg-1.0.tar.xz"
        );
    }

    #[test]
    fn unreachable_message_names_url() {
        let f = Finding::Unreachable {
            url: "https://example.com/a.zip".into(),
            reason: TransportKind::Timeout,
            detail: "Timeout was reached".into(),
        };
        assert_eq!(
            f.to_string(),
            "timeout when contacting https://example.com/a.zip: Timeout was reached"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let f = Finding::DuplicateUrl {
            url: "https://example.com/a.zip".into(),
            version: "1.0".into(),
        };
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["kind"], "duplicate_url");
        assert_eq!(json["version"], "1.0");
    }
}
