//! Classify curl errors into the transport failures reported in the log stream.

use serde::Serialize;
use std::fmt;

/// Why a probe got no HTTP response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Operation timed out (connect or total).
    Timeout,
    /// Network-level failure (refused, reset, DNS, etc.).
    Connection,
    /// Not an http(s) URL; never sent.
    UnsupportedScheme,
    /// Anything else curl reported.
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connection => "connection error",
            TransportKind::UnsupportedScheme => "unsupported scheme",
            TransportKind::Other => "transfer error",
        };
        f.write_str(s)
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
    {
        return TransportKind::Connection;
    }
    if e.is_unsupported_protocol() || e.is_url_malformed() {
        return TransportKind::UnsupportedScheme;
    }
    TransportKind::Other
}

/// True for `http://` and `https://` URLs, the only ones the prober sends.
pub fn is_probeable(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
