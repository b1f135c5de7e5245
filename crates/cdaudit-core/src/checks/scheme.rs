//! Lexical URL scheme check.

use super::Finding;

const SECURE: &str = "https://";
const INSECURE: &str = "http://";

/// Warns about plain-http and unrecognized schemes. No network access.
pub fn check_scheme(url: &str) -> Option<Finding> {
    if url.starts_with(INSECURE) {
        Some(Finding::InsecureScheme {
            url: url.to_string(),
        })
    } else if !url.starts_with(SECURE) {
        Some(Finding::UnknownScheme {
            url: url.to_string(),
        })
    } else {
        None
    }
}
