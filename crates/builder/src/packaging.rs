//! Final package assembly from the staging install tree

use h5pack_errors::{BuildError, Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Fixed subdirectories copied from staging into the package layout
const LAYOUT_DIRS: &[&str] = &["bin", "include", "lib"];

/// Copy staged artifacts and license/changelog files into the package
///
/// Everything under the staging `bin/`, `include/`, and `lib/` trees is
/// copied verbatim (no filtering); `LICENSE.*` and `CHANGES.*` from the
/// source tree root land in the package root.
///
/// # Errors
///
/// Returns an error when a copy fails; a staging subdirectory that was
/// never created by the install step is skipped, not an error.
pub async fn package(staging_dir: &Path, source_dir: &Path, package_dir: &Path) -> Result<()> {
    fs::create_dir_all(package_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, package_dir))?;

    for dir in LAYOUT_DIRS {
        let src = staging_dir.join(dir);
        if !src.is_dir() {
            debug!(dir, "staging subdirectory absent, skipping");
            continue;
        }
        copy_tree(&src, &package_dir.join(dir)).await?;
    }

    copy_matching(source_dir, "LICENSE.*", package_dir).await?;
    copy_matching(source_dir, "CHANGES.*", package_dir).await?;

    Ok(())
}

/// Recursively copy a directory tree
fn copy_tree<'a>(
    src: &'a Path,
    dst: &'a Path,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        fs::create_dir_all(dst)
            .await
            .map_err(|e| Error::io_with_path(&e, dst))?;

        let mut entries = fs::read_dir(src)
            .await
            .map_err(|e| Error::io_with_path(&e, src))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, src))?
        {
            let src_path = entry.path();
            let dst_path = dst.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(|e| {
                Error::io_with_path(&e, &src_path)
            })?;

            if file_type.is_dir() {
                copy_tree(&src_path, &dst_path).await?;
            } else {
                fs::copy(&src_path, &dst_path).await.map_err(|e| {
                    Error::from(BuildError::PackagingFailed {
                        message: format!("copy {} failed: {e}", src_path.display()),
                    })
                })?;
            }
        }

        Ok(())
    })
}

/// Copy files in a directory whose names match a glob pattern
async fn copy_matching(src_dir: &Path, pattern: &str, dst_dir: &Path) -> Result<()> {
    let glob = globset::Glob::new(pattern)
        .map_err(|e| {
            Error::from(BuildError::PackagingFailed {
                message: format!("bad glob {pattern}: {e}"),
            })
        })?
        .compile_matcher();

    let mut entries = match fs::read_dir(src_dir).await {
        Ok(entries) => entries,
        // No source tree means nothing to copy.
        Err(_) => return Ok(()),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::io_with_path(&e, src_dir))?
    {
        let name: PathBuf = entry.file_name().into();
        if glob.is_match(&name) {
            let dst = dst_dir.join(entry.file_name());
            fs::copy(entry.path(), &dst).await.map_err(|e| {
                Error::from(BuildError::PackagingFailed {
                    message: format!("copy {} failed: {e}", entry.path().display()),
                })
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(path, contents).await.unwrap();
    }

    #[tokio::test]
    async fn package_copies_layout_and_metadata_files() {
        let root = tempfile::tempdir().unwrap();
        let staging = root.path().join("install");
        let source = root.path().join("hdf5");
        let pkg = root.path().join("package");

        write(&staging.join("bin/h5dump"), "binary").await;
        write(&staging.join("bin/h5cc"), "wrapper").await;
        write(&staging.join("include/hdf5.h"), "header").await;
        write(&staging.join("lib/libhdf5.so.200"), "lib").await;
        write(&staging.join("lib/pkgconfig/hdf5.pc"), "pc").await;
        write(&source.join("LICENSE.txt"), "license").await;
        write(&source.join("CHANGES.md"), "changes").await;
        write(&source.join("README.md"), "readme").await;

        package(&staging, &source, &pkg).await.unwrap();

        assert!(pkg.join("bin/h5dump").is_file());
        assert!(pkg.join("bin/h5cc").is_file());
        assert!(pkg.join("include/hdf5.h").is_file());
        assert!(pkg.join("lib/libhdf5.so.200").is_file());
        // nested directories are copied too
        assert!(pkg.join("lib/pkgconfig/hdf5.pc").is_file());
        assert!(pkg.join("LICENSE.txt").is_file());
        assert!(pkg.join("CHANGES.md").is_file());
        // no selective filtering beyond the named patterns
        assert!(!pkg.join("README.md").exists());
    }

    #[tokio::test]
    async fn missing_staging_subdirs_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let staging = root.path().join("install");
        let source = root.path().join("hdf5");
        let pkg = root.path().join("package");

        // static build: no bin/ tree at all
        write(&staging.join("lib/libhdf5.a"), "lib").await;
        write(&source.join("LICENSE.txt"), "license").await;

        package(&staging, &source, &pkg).await.unwrap();

        assert!(pkg.join("lib/libhdf5.a").is_file());
        assert!(!pkg.join("bin").exists());
    }
}
