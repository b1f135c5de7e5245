use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// HEAD probe parameters (`[probe]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Total timeout in seconds for the liveness probe of a declared URL.
    pub timeout_secs: u64,
    /// Total timeout in seconds for each sibling-archive probe.
    pub alternative_timeout_secs: u64,
    /// Connect timeout in seconds, applied to every probe.
    pub connect_timeout_secs: u64,
    /// Follow 3xx redirects before judging the status.
    pub follow_redirects: bool,
    /// User-Agent header sent with every probe.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            alternative_timeout_secs: 2,
            connect_timeout_secs: 5,
            follow_redirects: true,
            user_agent: format!("cdaudit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// libcurl reads a zero timeout as "no timeout".
const MIN_TIMEOUT_SECS: u64 = 1;

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }

    pub fn alternative_timeout(&self) -> Duration {
        Duration::from_secs(self.alternative_timeout_secs.max(MIN_TIMEOUT_SECS))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

/// Global configuration loaded from `~/.config/cdaudit/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Key of the checksum field in each version entry; entries without it are skipped.
    pub checksum_key: String,
    pub probe: ProbeConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            checksum_key: "sha256".to_string(),
            probe: ProbeConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cdaudit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AuditConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AuditConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file. The file is never created.
pub fn load_from(path: &Path) -> Result<AuditConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: AuditConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
