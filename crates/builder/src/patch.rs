//! In-place text patching of generated build files

use h5pack_errors::{BuildError, Error, Result};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Wrapper prefix assignment as emitted by older upstream releases
const WRAPPER_PREFIX_PATTERN: &str = r#"prefix="""#;

/// Replacement computing the prefix from the wrapper's own location
const WRAPPER_PREFIX_RELOCATABLE: &str = r#"prefix="$(cd "$( dirname "$0" )" && pwd)/..""#;

/// Replace a single occurrence of `from` with `to` in a text file
///
/// # Errors
///
/// Returns `BuildError::PatchFailed` when the file cannot be read or
/// written, or when the pattern does not occur. The two causes are
/// deliberately not distinguished; callers decide whether the patch is
/// mandatory or advisory.
pub async fn replace_in_file(path: &Path, from: &str, to: &str) -> Result<()> {
    let file = path.display().to_string();

    let contents = fs::read_to_string(path).await.map_err(|e| {
        Error::from(BuildError::PatchFailed {
            file: file.clone(),
            message: e.to_string(),
        })
    })?;

    if !contents.contains(from) {
        return Err(BuildError::PatchFailed {
            file,
            message: format!("pattern not found: {from}"),
        }
        .into());
    }

    let patched = contents.replacen(from, to, 1);
    fs::write(path, patched).await.map_err(|e| {
        Error::from(BuildError::PatchFailed {
            file,
            message: e.to_string(),
        })
    })?;

    Ok(())
}

/// Make the generated compiler wrapper relocatable, best-effort
///
/// The wrapper hard-codes an empty install prefix; substituting a shell
/// expression lets it compute the prefix relative to its own location at
/// invocation time. The wrapper is `h5pcc` for parallel builds, `h5cc`
/// otherwise. Newer upstream versions no longer carry the empty
/// assignment, so every failure here is swallowed.
pub async fn patch_compiler_wrapper(staging_dir: &Path, parallel: bool) {
    let wrapper = if parallel { "h5pcc" } else { "h5cc" };
    let wrapper_path = staging_dir.join("bin").join(wrapper);

    if let Err(e) = replace_in_file(
        &wrapper_path,
        WRAPPER_PREFIX_PATTERN,
        WRAPPER_PREFIX_RELOCATABLE,
    )
    .await
    {
        debug!(wrapper, error = %e, "compiler wrapper patch skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_in_file_patches_single_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("configure");
        fs::write(&file, "-install_name \\$rpath/libhdf5.dylib\n")
            .await
            .unwrap();

        replace_in_file(&file, r"-install_name \$rpath/", "-install_name @rpath/")
            .await
            .unwrap();

        let contents = fs::read_to_string(&file).await.unwrap();
        assert_eq!(contents, "-install_name @rpath/libhdf5.dylib\n");
    }

    #[tokio::test]
    async fn replace_in_file_errors_on_missing_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("configure");
        fs::write(&file, "nothing to see\n").await.unwrap();

        let err = replace_in_file(&file, "absent", "present").await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn wrapper_patch_rewrites_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).await.unwrap();
        let wrapper = dir.path().join("bin").join("h5cc");
        fs::write(&wrapper, "#!/bin/sh\nprefix=\"\"\nCFLAGS=\"\"\n")
            .await
            .unwrap();

        patch_compiler_wrapper(dir.path(), false).await;

        let contents = fs::read_to_string(&wrapper).await.unwrap();
        assert!(contents.contains(r#"prefix="$(cd "$( dirname "$0" )" && pwd)/..""#));
        // unrelated assignments are untouched
        assert!(contents.contains("CFLAGS=\"\""));
    }

    #[tokio::test]
    async fn wrapper_patch_is_silent_when_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).await.unwrap();
        let wrapper = dir.path().join("bin").join("h5pcc");
        fs::write(&wrapper, "#!/bin/sh\nprefix=\"/usr/local\"\n")
            .await
            .unwrap();

        // pattern absent: no panic, file unchanged
        patch_compiler_wrapper(dir.path(), true).await;
        let contents = fs::read_to_string(&wrapper).await.unwrap();
        assert_eq!(contents, "#!/bin/sh\nprefix=\"/usr/local\"\n");

        // wrapper missing entirely: still silent
        patch_compiler_wrapper(tempfile::tempdir().unwrap().path(), false).await;
    }
}
