//! Version and constraint parsing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum VersionError {
    #[error("invalid version: {input}")]
    InvalidVersion { input: String },

    #[error("invalid version constraint: {input}")]
    InvalidConstraint { input: String },

    #[error("incompatible version: {version} does not satisfy {constraint}")]
    IncompatibleVersion { version: String, constraint: String },

    #[error("version parse error: {message}")]
    ParseError { message: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion { .. } | Self::ParseError { .. } => {
                Some("Use version strings like 1.12.2 (partial versions are padded with zeros).")
            }
            Self::InvalidConstraint { .. } => {
                Some("Use comparison constraints like >=1.2 or ==1.12.0.")
            }
            Self::IncompatibleVersion { .. } => {
                Some("Upgrade the dependency so it satisfies the declared minimum version.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidVersion { .. } => "version.invalid_version",
            Self::InvalidConstraint { .. } => "version.invalid_constraint",
            Self::IncompatibleVersion { .. } => "version.incompatible_version",
            Self::ParseError { .. } => "version.parse_error",
        };
        Some(code)
    }
}
