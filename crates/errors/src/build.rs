//! Build phase error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum BuildError {
    #[error("build failed: {message}")]
    Failed { message: String },

    #[error("missing build dependency: {name}")]
    MissingBuildDep { name: String },

    #[error("fetch failed: {url}")]
    FetchFailed { url: String },

    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("patch failed: {file} - {message}")]
    PatchFailed { file: String, message: String },

    #[error("configure failed: {message}")]
    ConfigureFailed { message: String },

    #[error("compile failed: {message}")]
    CompileFailed { message: String },

    #[error("install failed: {message}")]
    InstallFailed { message: String },

    #[error("packaging failed: {message}")]
    PackagingFailed { message: String },

    #[error("hash mismatch for {file}: expected {expected}, got {actual}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("source directory not found: {path}")]
    SourceDirMissing { path: String },
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingBuildDep { .. } => {
                Some("Install the missing build dependency (development headers included).")
            }
            Self::FetchFailed { .. } => {
                Some("Check network access or point source.url_template at a mirror.")
            }
            Self::PatchFailed { .. } => {
                Some("The upstream source layout may have changed for this version.")
            }
            Self::HashMismatch { .. } => {
                Some("Re-download the archive or update the configured checksum.")
            }
            Self::ConfigureFailed { .. } | Self::CompileFailed { .. } => {
                Some("Inspect the toolchain output above for the failing step.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Failed { .. } => "build.failed",
            Self::MissingBuildDep { .. } => "build.missing_build_dep",
            Self::FetchFailed { .. } => "build.fetch_failed",
            Self::ExtractionFailed { .. } => "build.extraction_failed",
            Self::PatchFailed { .. } => "build.patch_failed",
            Self::ConfigureFailed { .. } => "build.configure_failed",
            Self::CompileFailed { .. } => "build.compile_failed",
            Self::InstallFailed { .. } => "build.install_failed",
            Self::PackagingFailed { .. } => "build.packaging_failed",
            Self::HashMismatch { .. } => "build.hash_mismatch",
            Self::SourceDirMissing { .. } => "build.source_dir_missing",
        };
        Some(code)
    }
}
