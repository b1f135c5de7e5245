//! CLI for cdaudit.

mod output;

use anyhow::{Context, Result};
use cdaudit_core::auditor::{ArchiveAuditor, AuditTimeouts};
use cdaudit_core::config::{self, AuditConfig};
use cdaudit_core::conandata;
use cdaudit_core::fetch_head::CurlProber;
use cdaudit_core::logging;
use clap::{ArgAction, Parser};
use std::io::{self, Write};
use std::path::PathBuf;

pub use output::OutputFormat;

/// Audit the source declarations of a Conan recipe's conandata.yml.
///
/// Problems are reported, never enforced: the exit code is 0 whenever the
/// file could be read.
#[derive(Debug, Parser)]
#[command(name = "cdaudit", version)]
#[command(about = "cdaudit: check conandata.yml source URLs and checksums", long_about = None)]
pub struct Cli {
    /// Recipe directory, or the conandata.yml file itself.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Skip liveness and sibling-archive probes (no network access).
    #[arg(long)]
    pub offline: bool,

    /// Read settings from this TOML file instead of ~/.config/cdaudit/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for defects on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Timeout in seconds for the liveness probe of each URL.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Timeout in seconds for each sibling-archive probe.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub alternative_timeout: Option<u64>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        // Initialize logging as early as possible.
        logging::init_logging(cli.verbose);
        cli.run()
    }

    /// Config file (explicit or default) with command-line overrides applied.
    ///
    /// A broken `--config` file is fatal. A default file that cannot be read
    /// or created falls back to built-in defaults.
    fn load_config(&self) -> Result<AuditConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => match config::load_or_init() {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("default config unusable, using built-in defaults: {:#}", e);
                    AuditConfig::default()
                }
            },
        };
        if let Some(secs) = self.timeout {
            cfg.probe.timeout_secs = secs;
        }
        if let Some(secs) = self.alternative_timeout {
            cfg.probe.alternative_timeout_secs = secs;
        }
        Ok(cfg)
    }

    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Runs the audit, writing defects to `out`.
    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let cfg = self.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let data = conandata::load(&self.path)?;
        tracing::info!("auditing {}", data.path.display());

        let auditor = if self.offline {
            ArchiveAuditor::offline()
        } else {
            let prober = CurlProber::new(&cfg.probe).context("create HTTP client")?;
            ArchiveAuditor::new(prober, AuditTimeouts::from(&cfg.probe))
        };

        let mut auditor = auditor.with_checksum_key(cfg.checksum_key.as_str());

        let mut write_error = None;
        auditor.run(data.entries(&cfg.checksum_key), |finding| {
            if write_error.is_none() {
                if let Err(e) = output::emit(&mut *out, self.format, &finding) {
                    write_error = Some(e);
                }
            }
        });
        if let Some(e) = write_error {
            return Err(e.context("write findings"));
        }
        out.flush()?;
        Ok(())
    }
}
