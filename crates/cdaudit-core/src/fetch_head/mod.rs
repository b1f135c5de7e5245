//! HTTP HEAD probing.
//!
//! Uses the curl crate (libcurl) to check that a URL answers and to read its
//! declared `Content-Length`. One easy handle is reused for the whole run so
//! libcurl can keep connections to the same host alive between probes.

mod classify;
mod parse;

pub use classify::{classify_curl_error, is_probeable, TransportKind};

use anyhow::Result;
use std::str;
use std::time::Duration;

use crate::config::ProbeConfig;

/// Response metadata of a HEAD request that got an HTTP answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadResult {
    /// Final status code (after redirects when they are followed).
    pub status: u32,
    /// Size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

/// Outcome of a single probe: success, HTTP error, or no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 2xx response.
    Success(HeadResult),
    /// Any other status code.
    HttpError(u32),
    /// No HTTP response (timeout, refused connection, ...).
    Transport { kind: TransportKind, message: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }
}

/// Something that can answer HEAD requests. Blocking, single attempt.
pub trait HeadProbe {
    fn head(&mut self, url: &str, timeout: Duration) -> ProbeOutcome;
}

/// libcurl-backed prober holding one reused easy handle.
pub struct CurlProber {
    easy: curl::easy::Easy,
}

impl CurlProber {
    /// Builds the shared handle with the settings common to every probe.
    pub fn new(cfg: &ProbeConfig) -> Result<Self> {
        let mut easy = curl::easy::Easy::new();
        easy.nobody(true)?; // HEAD request
        easy.follow_location(cfg.follow_redirects)?;
        easy.connect_timeout(cfg.connect_timeout())?;
        easy.useragent(&cfg.user_agent)?;
        Ok(Self { easy })
    }

    fn perform(&mut self, url: &str, timeout: Duration) -> Result<HeadResult, curl::Error> {
        let mut headers: Vec<String> = Vec::new();

        self.easy.url(url)?;
        self.easy.timeout(timeout)?;
        {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let code = self.easy.response_code()?;
        Ok(parse::parse_headers(code, &headers))
    }
}

impl HeadProbe for CurlProber {
    fn head(&mut self, url: &str, timeout: Duration) -> ProbeOutcome {
        if !is_probeable(url) {
            return ProbeOutcome::Transport {
                kind: TransportKind::UnsupportedScheme,
                message: "only http and https URLs are probed".to_string(),
            };
        }
        match self.perform(url, timeout) {
            Ok(head) if (200..300).contains(&head.status) => ProbeOutcome::Success(head),
            Ok(head) => ProbeOutcome::HttpError(head.status),
            Err(e) => ProbeOutcome::Transport {
                kind: classify_curl_error(&e),
                message: e.to_string(),
            },
        }
    }
}
