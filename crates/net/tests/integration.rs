//! Integration tests for streamed downloads

use h5pack_errors::{BuildError, Error};
use h5pack_net::{download_file, DownloadOptions, NetClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// sha256 of b"hello"
const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Serve one HTTP response with the given body, returning the archive URL
async fn serve_once(body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;

        let header = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(header.as_bytes()).await.unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}/hdf5-1.12.2.tar.gz")
}

#[tokio::test]
async fn download_verifies_matching_checksum() {
    let url = serve_once(b"hello").await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("hdf5-1.12.2.tar.gz");

    let client = NetClient::with_defaults().unwrap();
    download_file(
        &client,
        &url,
        &dest,
        &DownloadOptions {
            sha256: Some(HELLO_SHA256.to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"hello");
}

#[tokio::test]
async fn checksum_mismatch_removes_the_partial_file() {
    let url = serve_once(b"hello").await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("hdf5-1.12.2.tar.gz");

    let client = NetClient::with_defaults().unwrap();
    let err = download_file(
        &client,
        &url,
        &dest,
        &DownloadOptions {
            sha256: Some("deadbeef".repeat(8)),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Build(BuildError::HashMismatch { .. })
    ));
    assert!(err.to_string().contains(HELLO_SHA256));
    assert!(!dest.exists());
}

#[tokio::test]
async fn download_without_checksum_keeps_the_file() {
    let url = serve_once(b"hello").await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("hdf5-1.12.2.tar.gz");

    let client = NetClient::with_defaults().unwrap();
    download_file(&client, &url, &dest, &DownloadOptions::default())
        .await
        .unwrap();

    assert!(dest.is_file());
}
