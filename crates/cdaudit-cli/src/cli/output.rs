//! Rendering findings: defects on stdout, warnings in the log stream.

use anyhow::Result;
use cdaudit_core::checks::{Finding, Severity};
use clap::ValueEnum;
use std::io::Write;

/// Stdout format for defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One message per defect, followed by a blank line.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Writes one finding. Warnings never reach `out`.
pub fn emit<W: Write>(out: &mut W, format: OutputFormat, finding: &Finding) -> Result<()> {
    match finding.severity() {
        Severity::Warning => tracing::warn!("{}", finding),
        Severity::Defect => match format {
            OutputFormat::Text => writeln!(out, "{}\n", finding)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(finding)?)?,
        },
    }
    Ok(())
}
