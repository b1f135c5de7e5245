//! The audit pass over flattened source entries.
//!
//! Each entry goes through every check before the next one starts:
//! duplication, scheme, checksum shape, version classification, liveness and
//! sibling archives. Version omissions are held back and emitted after the
//! last entry. All indexes are local to one [`ArchiveAuditor::run`] call.

use std::collections::HashSet;
use std::time::Duration;

use crate::checks::archive::find_smaller_archive;
use crate::checks::checksum::check_checksum;
use crate::checks::duplicates::DuplicateDetector;
use crate::checks::scheme::check_scheme;
use crate::checks::version::VersionPresence;
use crate::checks::{Finding, Severity};
use crate::config::ProbeConfig;
use crate::conandata::SourceEntry;
use crate::fetch_head::{HeadProbe, ProbeOutcome};

const DEFAULT_CHECKSUM_KEY: &str = "sha256";

/// Probe timeouts used during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTimeouts {
    /// Liveness probe of each declared URL.
    pub primary: Duration,
    /// Each sibling-archive probe.
    pub alternative: Duration,
}

impl Default for AuditTimeouts {
    fn default() -> Self {
        Self::from(&ProbeConfig::default())
    }
}

impl From<&ProbeConfig> for AuditTimeouts {
    fn from(cfg: &ProbeConfig) -> Self {
        Self {
            primary: cfg.timeout(),
            alternative: cfg.alternative_timeout(),
        }
    }
}

/// Counters for the end-of-run log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub entries: usize,
    pub defects: usize,
    pub warnings: usize,
}

/// Runs every check over a sequence of entries.
///
/// Without a prober (offline mode) the liveness and sibling-archive checks are
/// skipped; the lexical checks still run.
pub struct ArchiveAuditor<P> {
    prober: Option<P>,
    timeouts: AuditTimeouts,
    checksum_key: String,
}

impl<P: HeadProbe> ArchiveAuditor<P> {
    pub fn new(prober: P, timeouts: AuditTimeouts) -> Self {
        Self {
            prober: Some(prober),
            timeouts,
            checksum_key: DEFAULT_CHECKSUM_KEY.to_string(),
        }
    }

    pub fn offline() -> Self {
        Self {
            prober: None,
            timeouts: AuditTimeouts::default(),
            checksum_key: DEFAULT_CHECKSUM_KEY.to_string(),
        }
    }

    /// Checksum key whose digest shape is checked (default `sha256`).
    pub fn with_checksum_key(mut self, key: impl Into<String>) -> Self {
        self.checksum_key = key.into();
        self
    }

    /// Audits `entries`, handing each finding to `emit` as soon as it is known.
    pub fn run<I, F>(&mut self, entries: I, mut emit: F) -> AuditSummary
    where
        I: IntoIterator<Item = SourceEntry>,
        F: FnMut(Finding),
    {
        let mut summary = AuditSummary::default();
        let mut sink = |finding: Finding| {
            match finding.severity() {
                Severity::Defect => summary.defects += 1,
                Severity::Warning => summary.warnings += 1,
            }
            emit(finding);
        };

        let mut duplicates = DuplicateDetector::new();
        let mut versions = VersionPresence::new();
        let mut checked_checksums: HashSet<String> = HashSet::new();
        let mut entry_count = 0usize;

        for entry in entries {
            entry_count += 1;
            tracing::debug!("checking {} {}", entry.version, entry.url);

            for finding in duplicates.observe(&entry) {
                sink(finding);
            }
            if let Some(finding) = check_scheme(&entry.url) {
                sink(finding);
            }
            if checked_checksums.insert(entry.checksum.clone()) {
                if let Some(finding) = check_checksum(&self.checksum_key, &entry.version, &entry.checksum) {
                    sink(finding);
                }
            }
            versions.observe(&entry.version, &entry.url);

            if let Some(prober) = self.prober.as_mut() {
                probe_entry(prober, &self.timeouts, &entry.url, &mut sink);
            }
        }

        for finding in versions.finish() {
            sink(finding);
        }

        summary.entries = entry_count;
        tracing::info!(
            "audited {} url(s): {} defect(s), {} warning(s)",
            summary.entries,
            summary.defects,
            summary.warnings
        );
        summary
    }

    /// Like [`run`](Self::run) but collects the findings in emission order.
    pub fn audit<I>(&mut self, entries: I) -> Vec<Finding>
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        let mut findings = Vec::new();
        self.run(entries, |f| findings.push(f));
        findings
    }
}

/// Liveness probe, then sibling archives when the URL answered.
fn probe_entry<P, F>(prober: &mut P, timeouts: &AuditTimeouts, url: &str, sink: &mut F)
where
    P: HeadProbe + ?Sized,
    F: FnMut(Finding),
{
    match prober.head(url, timeouts.primary) {
        ProbeOutcome::Success(head) => {
            if let Some(finding) =
                find_smaller_archive(prober, url, head.content_length, timeouts.alternative, sink)
            {
                sink(finding);
            }
        }
        ProbeOutcome::HttpError(status) => sink(Finding::Unavailable {
            url: url.to_string(),
            status,
        }),
        ProbeOutcome::Transport { kind, message } => sink(Finding::Unreachable {
            url: url.to_string(),
            reason: kind,
            detail: message,
        }),
    }
}
