//! Version constraint parsing for dependency declarations
//!
//! Supports the small constraint vocabulary recipe requirements use:
//! - `==1.2.3` - Exact version
//! - `>=1.2` - Minimum version (partial versions are zero-padded)
//! - `<=2.0.0` - Maximum version
//! - `!=1.5.0` - Exclude version
//! - Multiple constraints: `>=1.2,<2.0`

use h5pack_errors::VersionError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single version constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionConstraint {
    Exact(Version),
    GreaterEqual(Version),
    LessEqual(Version),
    Greater(Version),
    Less(Version),
    NotEqual(Version),
}

impl VersionConstraint {
    /// Check if a version satisfies this constraint
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::GreaterEqual(v) => version >= v,
            Self::LessEqual(v) => version <= v,
            Self::Greater(v) => version > v,
            Self::Less(v) => version < v,
            Self::NotEqual(v) => version != v,
        }
    }

    fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();

        for (prefix, ctor) in [
            ("==", Self::Exact as fn(Version) -> Self),
            (">=", Self::GreaterEqual),
            ("<=", Self::LessEqual),
            ("!=", Self::NotEqual),
            (">", Self::Greater),
            ("<", Self::Less),
        ] {
            if let Some(version_str) = s.strip_prefix(prefix) {
                return Ok(ctor(parse_loose(version_str.trim())?));
            }
        }

        Err(VersionError::InvalidConstraint {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "=={v}"),
            Self::GreaterEqual(v) => write!(f, ">={v}"),
            Self::LessEqual(v) => write!(f, "<={v}"),
            Self::Greater(v) => write!(f, ">{v}"),
            Self::Less(v) => write!(f, "<{v}"),
            Self::NotEqual(v) => write!(f, "!={v}"),
        }
    }
}

/// A set of version constraints, all of which must hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    pub constraints: Vec<VersionConstraint>,
}

impl VersionSpec {
    /// Check if a version satisfies every constraint in the set
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(version))
    }
}

impl FromStr for VersionSpec {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let constraints = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(VersionConstraint::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if constraints.is_empty() {
            return Err(VersionError::InvalidConstraint {
                input: s.to_string(),
            });
        }

        Ok(Self { constraints })
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.constraints.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parse a version string, zero-padding missing minor/patch components
///
/// Upstream tools report versions like `1.2` or `1.2.11`; semver requires
/// all three components.
///
/// # Errors
///
/// Returns `VersionError::InvalidVersion` if the input is not a dotted
/// sequence of up to three numeric components.
pub fn parse_loose(input: &str) -> Result<Version, VersionError> {
    let input = input.trim();
    let invalid = || VersionError::InvalidVersion {
        input: input.to_string(),
    };

    let mut parts = input.splitn(3, '.');
    let major = parts
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(invalid)?
        .parse::<u64>()
        .map_err(|_| invalid())?;
    let minor = match parts.next() {
        Some(p) => p.parse::<u64>().map_err(|_| invalid())?,
        None => 0,
    };
    let patch = match parts.next() {
        // Some distributions tack suffixes onto the patch component
        Some(p) => p
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse::<u64>()
            .map_err(|_| invalid())?,
        None => 0,
    };

    Ok(Version::new(major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_loose_pads_missing_components() {
        assert_eq!(parse_loose("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(parse_loose("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_loose("1.2.11").unwrap(), Version::new(1, 2, 11));
    }

    #[test]
    fn parse_loose_rejects_garbage() {
        assert!(parse_loose("").is_err());
        assert!(parse_loose("one.two").is_err());
    }

    #[test]
    fn spec_minimum_version() {
        let spec = VersionSpec::from_str(">=1.2").unwrap();
        assert!(spec.matches(&Version::new(1, 2, 0)));
        assert!(spec.matches(&Version::new(1, 2, 13)));
        assert!(spec.matches(&Version::new(1, 3, 0)));
        assert!(!spec.matches(&Version::new(1, 1, 9)));
    }

    #[test]
    fn spec_multiple_constraints() {
        let spec = VersionSpec::from_str(">=1.2,<2.0,!=1.5.0").unwrap();
        assert!(spec.matches(&Version::new(1, 4, 9)));
        assert!(!spec.matches(&Version::new(1, 5, 0)));
        assert!(!spec.matches(&Version::new(2, 0, 0)));
    }
}
