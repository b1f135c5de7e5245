//! Flattening `sources` into one entry per declared URL.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// One (version, url, checksum) triple. A version with several mirrors yields
/// one entry per URL, all sharing the checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub version: String,
    pub url: String,
    pub checksum: String,
}

/// Lazily flattens `sources` in file order.
///
/// Versions without `checksum_key` are skipped silently. Calling this again on
/// the same mapping yields the same sequence.
pub fn iterate_entries<'a>(
    sources: &'a Mapping,
    checksum_key: &'a str,
) -> impl Iterator<Item = SourceEntry> + 'a {
    sources
        .iter()
        .flat_map(move |(version, data)| entries_for_version(version, data, checksum_key))
}

fn entries_for_version(version: &Value, data: &Value, checksum_key: &str) -> Vec<SourceEntry> {
    let Some(checksum) = data.get(checksum_key).and_then(scalar_to_string) else {
        return Vec::new();
    };
    let Some(version) = scalar_to_string(version) else {
        tracing::warn!("skipping source with non-scalar version key {:?}", version);
        return Vec::new();
    };

    let urls: Vec<String> = match data.get("url") {
        Some(Value::String(url)) => vec![url.clone()],
        Some(Value::Sequence(seq)) => seq
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => {
            tracing::warn!("version {} declares {} but no url", version, checksum_key);
            return Vec::new();
        }
    };

    urls.into_iter()
        .map(|url| SourceEntry {
            version: version.clone(),
            url,
            checksum: checksum.clone(),
        })
        .collect()
}

/// Versions such as `1.2` are parsed by YAML as numbers; keep their text form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
