// 🌐 Fetcher - obtain the raw CSV text
// Remote sheet export over HTTP(S), or a saved export on disk

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const USER_AGENT: &str = concat!("seed-locations/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// SOURCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// http:// or https:// export link
    Url(String),
    /// Previously downloaded export
    File(PathBuf),
}

impl Source {
    /// Anything that is not an http(s) URL is treated as a local path
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ============================================================================
// PAYLOAD
// ============================================================================

/// Raw delimited text plus the checksum of the bytes it was decoded from
#[derive(Debug, Clone)]
pub struct Payload {
    pub text: String,
    pub sha256: String,
}

impl Payload {
    /// Decode UTF-8 bytes, dropping a leading byte-order mark
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let sha256 = checksum(&bytes);
        let text = String::from_utf8(bytes).context("CSV payload is not valid UTF-8")?;
        let text = match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };

        Ok(Payload { text, sha256 })
    }
}

/// Hex SHA-256 of the payload bytes
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// FETCH
// ============================================================================

/// Read the whole payload; blocks until it is fully received or fails
pub fn fetch(source: &Source) -> Result<Payload> {
    let bytes = match source {
        Source::Url(url) => fetch_url(url)?,
        Source::File(path) => read_file(path)?,
    };

    let payload = Payload::from_bytes(bytes)?;
    info!(
        source = %source,
        bytes = payload.text.len(),
        sha256 = %payload.sha256,
        "fetched CSV payload"
    );

    Ok(payload)
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("GET {} failed", url))?;

    let status = response.status();
    debug!(%status, url, "received response");
    if !status.is_success() {
        return Err(anyhow!("GET {} returned HTTP {}", url, status));
    }

    let body = response
        .bytes()
        .with_context(|| format!("Failed to read body from {}", url))?;

    Ok(body.to_vec())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read CSV file {}", path.display()))
}
