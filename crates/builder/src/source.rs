//! Source acquisition: download, extract, rename, platform patch

use crate::patch;
use h5pack_config::Config;
use h5pack_errors::{BuildError, Error, Result};
use h5pack_net::{download_file, DownloadOptions, NetClient};
use h5pack_types::Recipe;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::BuildPaths;

/// Install-name prefix token emitted into `configure` by older libtool
const INSTALL_NAME_PATTERN: &str = r"-install_name \$rpath/";
const INSTALL_NAME_RELOCATABLE: &str = "-install_name @rpath/";

/// Fetch and unpack the versioned source archive into the work directory
///
/// The archive extracts to `<name>-<version>/`, which is renamed to the
/// fixed working directory name. On macOS shared builds the generated
/// `configure` script is patched so shared libraries get `@rpath`-based
/// install names.
///
/// # Errors
///
/// Any failure here is fatal: download errors, checksum mismatch,
/// extraction errors, a missing versioned directory, or (on macOS shared
/// builds) a configure script without the expected token.
pub async fn acquire(
    recipe: &Recipe,
    config: &Config,
    net: &NetClient,
    paths: &BuildPaths,
) -> Result<()> {
    fs::create_dir_all(&paths.work_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &paths.work_dir))?;

    let url = config.source_url(&recipe.version.to_string());
    let archive_name = h5pack_net::filename_from_url(&url)
        .unwrap_or_else(|| format!("{}.tar.gz", recipe.versioned_dir_name()));
    let archive_path = paths.work_dir.join(&archive_name);

    download_file(
        net,
        &url,
        &archive_path,
        &DownloadOptions {
            sha256: config.source.sha256.clone(),
        },
    )
    .await
    .map_err(|e| match e {
        Error::Network(_) => BuildError::FetchFailed { url: url.clone() }.into(),
        other => other,
    })?;

    extract_tar_gz(&archive_path, &paths.work_dir).await?;

    let versioned_dir = paths.work_dir.join(recipe.versioned_dir_name());
    if !versioned_dir.is_dir() {
        return Err(BuildError::SourceDirMissing {
            path: versioned_dir.display().to_string(),
        }
        .into());
    }

    // Fresh working tree on every invocation.
    if paths.source_dir.exists() {
        fs::remove_dir_all(&paths.source_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &paths.source_dir))?;
    }
    fs::rename(&versioned_dir, &paths.source_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &paths.source_dir))?;
    info!(source = %paths.source_dir.display(), "source tree ready");

    if recipe.settings.os.is_macos() && recipe.options.shared {
        patch::replace_in_file(
            &paths.source_dir.join("configure"),
            INSTALL_NAME_PATTERN,
            INSTALL_NAME_RELOCATABLE,
        )
        .await?;
    }

    Ok(())
}

/// Extract a gzip-compressed tar archive, preserving its top-level layout
pub async fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    use async_compression::tokio::bufread::GzipDecoder;
    use tokio::io::BufReader;

    let temp_dir = tempfile::tempdir().map_err(|e| BuildError::ExtractionFailed {
        message: format!("failed to create temp directory: {e}"),
    })?;
    let temp_tar = temp_dir.path().join("archive.tar");

    // Decompress to a plain tar first.
    {
        let input = fs::File::open(archive)
            .await
            .map_err(|e| BuildError::ExtractionFailed {
                message: format!("failed to open archive: {e}"),
            })?;
        let mut output =
            fs::File::create(&temp_tar)
                .await
                .map_err(|e| BuildError::ExtractionFailed {
                    message: format!("failed to create temp file: {e}"),
                })?;
        let mut decoder = GzipDecoder::new(BufReader::new(input));
        tokio::io::copy(&mut decoder, &mut output)
            .await
            .map_err(|e| BuildError::ExtractionFailed {
                message: format!("failed to decompress gzip archive: {e}"),
            })?;
    }

    let dest = dest.to_path_buf();
    let temp_tar_for_task: PathBuf = temp_tar.clone();
    tokio::task::spawn_blocking(move || {
        let tar = std::fs::File::open(&temp_tar_for_task).map_err(|e| {
            BuildError::ExtractionFailed {
                message: format!("failed to open decompressed file: {e}"),
            }
        })?;
        let mut archive = tar::Archive::new(tar);
        archive
            .unpack(&dest)
            .map_err(|e| BuildError::ExtractionFailed {
                message: format!("failed to extract entries: {e}"),
            })?;
        Ok::<(), BuildError>(())
    })
    .await
    .map_err(|e| BuildError::ExtractionFailed {
        message: format!("task join error: {e}"),
    })??;

    drop(temp_dir);
    Ok(())
}
