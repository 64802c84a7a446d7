//! Requirements resolution against the host toolchain
//!
//! Each declared dependency is probed through `pkg-config`; an absent or
//! too-old dependency aborts the build before any expensive work.

use h5pack_errors::{BuildError, Result, VersionError};
use h5pack_types::version::parse_loose;
use h5pack_types::Requirement;
use semver::Version;
use tokio::process::Command;
use tracing::debug;

/// A requirement together with the version the host provides
#[derive(Debug, Clone)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: Version,
}

/// Probe tool asked for the installed version of each dependency
const PKG_CONFIG: &str = "pkg-config";

/// Resolve every declared requirement, failing on the first miss
///
/// # Errors
///
/// Returns `BuildError::MissingBuildDep` when `pkg-config` cannot find
/// the package, or `VersionError::IncompatibleVersion` when the found
/// version does not satisfy the declared constraint.
pub async fn resolve(requirements: &[Requirement]) -> Result<Vec<ResolvedDependency>> {
    resolve_with(PKG_CONFIG, requirements).await
}

async fn resolve_with(tool: &str, requirements: &[Requirement]) -> Result<Vec<ResolvedDependency>> {
    let mut resolved = Vec::with_capacity(requirements.len());

    for req in requirements {
        let version = probe(tool, &req.name).await?;
        debug!(name = %req.name, %version, constraint = %req.spec, "probed dependency");

        if !req.spec.matches(&version) {
            return Err(VersionError::IncompatibleVersion {
                version: version.to_string(),
                constraint: format!("{}{}", req.name, req.spec),
            }
            .into());
        }

        resolved.push(ResolvedDependency {
            name: req.name.clone(),
            version,
        });
    }

    Ok(resolved)
}

/// Ask the probe tool for the version of a package
async fn probe(tool: &str, name: &str) -> Result<Version> {
    let missing = || BuildError::MissingBuildDep {
        name: name.to_string(),
    };

    let output = Command::new(tool)
        .args(["--modversion", name])
        .output()
        .await
        .map_err(|_| missing())?;

    if !output.status.success() {
        return Err(missing().into());
    }

    let reported = String::from_utf8_lossy(&output.stdout);
    let version = parse_loose(reported.trim()).map_err(|_| missing())?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5pack_errors::Error;
    use h5pack_types::VersionSpec;
    use std::str::FromStr;

    fn zlib_at_least_1_2() -> Vec<Requirement> {
        vec![Requirement {
            name: "zlib".to_string(),
            spec: VersionSpec::from_str(">=1.2").unwrap(),
            static_link: true,
        }]
    }

    /// A fake probe tool reporting a fixed version for every package
    fn fake_probe_tool(dir: &std::path::Path, reported: &str) -> String {
        let path = dir.join("pkg-version");
        std::fs::write(&path, format!("#!/bin/sh\necho {reported}\n")).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path.display().to_string()
    }

    #[tokio::test]
    async fn unknown_dependency_is_fatal() {
        let reqs = vec![Requirement {
            name: "h5pack-test-no-such-package".to_string(),
            spec: VersionSpec::from_str(">=1.0").unwrap(),
            static_link: true,
        }];
        assert!(resolve(&reqs).await.is_err());
    }

    #[tokio::test]
    async fn too_old_dependency_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_probe_tool(dir.path(), "1.1.4");

        let err = resolve_with(&tool, &zlib_at_least_1_2()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Version(h5pack_errors::VersionError::IncompatibleVersion { .. })
        ));
        assert!(err.to_string().contains("1.1.4"));
    }

    #[tokio::test]
    async fn satisfying_version_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let tool = fake_probe_tool(dir.path(), "1.2.13");

        let resolved = resolve_with(&tool, &zlib_at_least_1_2()).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "zlib");
        assert_eq!(resolved[0].version, Version::new(1, 2, 13));
    }

    #[tokio::test]
    async fn empty_requirements_resolve_trivially() {
        assert!(resolve(&[]).await.unwrap().is_empty());
    }
}
