#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP client for source archive downloads
//!
//! Thin wrapper over `reqwest` with bounded retries, streamed writes to
//! disk, and optional sha256 verification of the downloaded file.

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{download_file, DownloadOptions};

/// Derive the destination file name from a URL path
#[must_use]
pub fn filename_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_from_url_strips_query() {
        assert_eq!(
            filename_from_url("https://example.org/src/hdf5-1.12.2.tar.gz?token=x"),
            Some("hdf5-1.12.2.tar.gz".to_string())
        );
        assert_eq!(filename_from_url("https://example.org/"), None);
    }
}
