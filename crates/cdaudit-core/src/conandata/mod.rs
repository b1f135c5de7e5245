//! Locating and loading `conandata.yml`.
//!
//! Loading is all-or-nothing: a missing file, malformed YAML or a missing
//! `sources` mapping aborts the run before any check executes.

mod entries;

pub use entries::{iterate_entries, SourceEntry};

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up inside the recipe directory.
pub const CONANDATA_FILE: &str = "conandata.yml";

/// Fatal conditions while reading the input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{} has no top-level `sources` key", path.display())]
    MissingSources { path: PathBuf },
    #[error("`sources` in {} is not a mapping", path.display())]
    InvalidSources { path: PathBuf },
}

/// Parsed input: the resolved path and the `sources` mapping in file order.
#[derive(Debug, Clone)]
pub struct ConanData {
    pub path: PathBuf,
    pub sources: Mapping,
}

impl ConanData {
    /// Flattened (version, url, checksum) entries; see [`iterate_entries`].
    pub fn entries<'a>(&'a self, checksum_key: &'a str) -> impl Iterator<Item = SourceEntry> + 'a {
        iterate_entries(&self.sources, checksum_key)
    }
}

/// Resolves the argument to the `conandata.yml` path.
///
/// `path` is either the recipe directory or the file itself.
pub fn resolve_path(path: &Path) -> PathBuf {
    let dir = if path.file_name().is_some_and(|name| name == CONANDATA_FILE) {
        path.parent().unwrap_or_else(|| Path::new(""))
    } else {
        path
    };
    dir.join(CONANDATA_FILE)
}

/// Reads and parses the file that `path` resolves to.
pub fn load(path: &Path) -> Result<ConanData, LoadError> {
    let path = resolve_path(path);
    let text = fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    parse(&text, path)
}

/// Parses YAML text already read from `path` (used for error messages only).
pub fn parse(text: &str, path: PathBuf) -> Result<ConanData, LoadError> {
    let doc: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
        path: path.clone(),
        source,
    })?;

    let sources = match doc.get("sources") {
        None => return Err(LoadError::MissingSources { path }),
        Some(Value::Mapping(m)) => m.clone(),
        Some(_) => return Err(LoadError::InvalidSources { path }),
    };

    tracing::debug!("loaded {} version(s) from {}", sources.len(), path.display());
    Ok(ConanData { path, sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_directory() {
        assert_eq!(
            resolve_path(Path::new("recipes/zlib/all")),
            PathBuf::from("recipes/zlib/all/conandata.yml")
        );
        assert_eq!(resolve_path(Path::new(".")), PathBuf::from("./conandata.yml"));
    }

    #[test]
    fn resolve_file_argument() {
        assert_eq!(
            resolve_path(Path::new("recipes/zlib/all/conandata.yml")),
            PathBuf::from("recipes/zlib/all/conandata.yml")
        );
        assert_eq!(
            resolve_path(Path::new("conandata.yml")),
            PathBuf::from("conandata.yml")
        );
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONANDATA_FILE),
            "sources:\n  \"1.0\":\n    url: https://example.com/a-1.0.tar.gz\n    sha256: abc\n",
        )
        .unwrap();
        let data = load(dir.path()).unwrap();
        assert_eq!(data.path, dir.path().join(CONANDATA_FILE));
        assert_eq!(data.sources.len(), 1);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let err = parse("sources: [unclosed", PathBuf::from("x.yml")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn parse_requires_sources() {
        let err = parse("patches: {}\n", PathBuf::from("x.yml")).unwrap_err();
        assert!(matches!(err, LoadError::MissingSources { .. }));
        assert!(err.to_string().contains("sources"));
    }

    #[test]
    fn parse_rejects_non_mapping_sources() {
        let err = parse("sources:\n  - a\n", PathBuf::from("x.yml")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSources { .. }));
    }
}
