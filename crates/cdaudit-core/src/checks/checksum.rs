//! Checksum shape: a hex digest whose length matches the configured key.

use super::Finding;

/// Digest length in bytes for a checksum key (`sha256`, `sha512`, ...).
/// `None` for keys with no known digest size.
pub fn digest_len(key: &str) -> Option<usize> {
    match key.to_ascii_lowercase().as_str() {
        "md5" => Some(16),
        "sha1" => Some(20),
        "sha256" => Some(32),
        "sha512" => Some(64),
        _ => None,
    }
}

pub fn is_hex_digest(checksum: &str, len: usize) -> bool {
    matches!(hex::decode(checksum), Ok(bytes) if bytes.len() == len)
}

/// Checks `checksum` against the digest shape of `key`. Unknown keys are not
/// checked.
pub fn check_checksum(key: &str, version: &str, checksum: &str) -> Option<Finding> {
    let len = digest_len(key)?;
    if is_hex_digest(checksum, len) {
        None
    } else {
        Some(Finding::MalformedChecksum {
            checksum: checksum.to_string(),
            version: version.to_string(),
            algorithm: key.to_string(),
        })
    }
}
