//! Sibling archives in a better compression format.
//!
//! Upstreams often publish the same release as `.tar.gz`, `.tar.bz2` and
//! `.tar.xz` next to each other. Given a reachable URL and its declared size,
//! probe the siblings and report one that is smaller.

use std::time::Duration;

use super::Finding;
use crate::fetch_head::{HeadProbe, ProbeOutcome};

/// Archive suffixes ranked from best to worst compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArchiveSuffix {
    TarXz,
    TarBz2,
    TarGz,
    Tgz,
    Zip,
}

impl ArchiveSuffix {
    pub const RANKED: [ArchiveSuffix; 5] = [
        ArchiveSuffix::TarXz,
        ArchiveSuffix::TarBz2,
        ArchiveSuffix::TarGz,
        ArchiveSuffix::Tgz,
        ArchiveSuffix::Zip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveSuffix::TarXz => ".tar.xz",
            ArchiveSuffix::TarBz2 => ".tar.bz2",
            ArchiveSuffix::TarGz => ".tar.gz",
            ArchiveSuffix::Tgz => ".tgz",
            ArchiveSuffix::Zip => ".zip",
        }
    }

    /// First ranked suffix `url` ends with, ignoring ASCII case.
    pub fn detect(url: &str) -> Option<ArchiveSuffix> {
        Self::RANKED
            .into_iter()
            .find(|suffix| split_suffix(url, *suffix).is_some())
    }
}

/// Returns the part of `url` before `suffix`, if `url` ends with it.
fn split_suffix(url: &str, suffix: ArchiveSuffix) -> Option<&str> {
    let s = suffix.as_str();
    let start = url.len().checked_sub(s.len())?;
    let tail = url.get(start..)?;
    tail.eq_ignore_ascii_case(s).then(|| &url[..start])
}

/// Probes the siblings of `url` and reports a smaller one.
///
/// `orig_size` is the declared size of `url` itself. When it is unknown, only
/// better-ranked siblings are probed and only a sibling without a declared size
/// can be reported. A sibling that answers without a size is reported at once
/// only when its format ranks better than `url`'s; worse formats are skipped.
/// Transport failures of sibling probes are handed to `emit` as warnings;
/// HTTP errors are not findings.
pub fn find_smaller_archive<P, F>(
    prober: &mut P,
    url: &str,
    orig_size: Option<u64>,
    timeout: Duration,
    emit: &mut F,
) -> Option<Finding>
where
    P: HeadProbe + ?Sized,
    F: FnMut(Finding),
{
    let current = ArchiveSuffix::detect(url)?;
    let stem = split_suffix(url, current)?;

    let mut sized: Vec<(u64, String)> = Vec::new();
    for candidate in ArchiveSuffix::RANKED {
        if candidate == current {
            if orig_size.is_none() {
                tracing::debug!("size of {} unknown; not comparing worse formats", url);
                return None;
            }
            continue;
        }

        let alternative = format!("{}{}", stem, candidate.as_str());
        match prober.head(&alternative, timeout) {
            ProbeOutcome::Success(head) => match head.content_length {
                Some(len) => {
                    tracing::debug!("{} exists ({} bytes)", alternative, len);
                    sized.push((len, alternative));
                }
                None if candidate < current => {
                    return Some(Finding::PotentiallySmallerArchive {
                        url: url.to_string(),
                        alternative,
                    });
                }
                None => tracing::debug!("{} exists without a declared size", alternative),
            },
            ProbeOutcome::HttpError(code) => {
                tracing::debug!("{} returned HTTP {}", alternative, code);
            }
            ProbeOutcome::Transport { kind, message } => emit(Finding::Unreachable {
                url: alternative,
                reason: kind,
                detail: message,
            }),
        }
    }

    let orig = orig_size.filter(|size| *size > 0)?;
    let (best, alternative) = sized.into_iter().min_by_key(|(size, _)| *size)?;
    if best >= orig {
        return None;
    }
    Some(Finding::SmallerArchive {
        url: url.to_string(),
        alternative,
        saving_percent: (orig - best) as f64 * 100.0 / orig as f64,
    })
}
