//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Parse collected header lines into HeadResult.
///
/// With redirects followed, curl hands over the headers of every hop; only the
/// block after the last status line describes the final resource.
pub(crate) fn parse_headers(status: u32, lines: &[String]) -> HeadResult {
    let last_block = lines
        .iter()
        .rposition(|line| line.starts_with("HTTP/"))
        .map_or(lines, |idx| &lines[idx..]);

    let mut content_length = None;
    for line in last_block {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.trim().parse::<u64>() {
                    content_length = Some(n);
                }
            }
        }
    }

    HeadResult {
        status,
        content_length,
    }
}
