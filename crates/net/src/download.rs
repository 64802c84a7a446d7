//! Streamed file downloads with optional checksum verification

use crate::client::NetClient;
use futures::StreamExt;
use h5pack_errors::{BuildError, Error, NetworkError};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Options controlling a single download
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// Expected sha256 of the downloaded file, verified when set
    pub sha256: Option<String>,
}

/// Download a URL to a file, streaming chunks to disk
///
/// The file is hashed while it is written; when `options.sha256` is set
/// and does not match, the partial file is removed and an error returned.
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the server responds with a
/// non-success status, the file cannot be written, or the checksum does
/// not match.
pub async fn download_file(
    client: &NetClient,
    url: &str,
    dest: &Path,
    options: &DownloadOptions,
) -> Result<(), Error> {
    info!(url, dest = %dest.display(), "downloading source archive");

    let response = client.get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: format!("GET {url}"),
        }
        .into());
    }

    let total = response.content_length().unwrap_or(0);

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;
    let mut stream = response.bytes_stream();
    let mut hasher = Sha256::new();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| NetworkError::DownloadFailed(e.to_string()))?;
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;
        downloaded += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| Error::io_with_path(&e, dest))?;
    debug!(downloaded, total, "download complete");

    if let Some(expected) = &options.sha256 {
        let actual = format!("{:x}", hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            let _ = tokio::fs::remove_file(dest).await;
            return Err(BuildError::HashMismatch {
                file: dest.display().to_string(),
                expected: expected.clone(),
                actual,
            }
            .into());
        }
    }

    Ok(())
}
