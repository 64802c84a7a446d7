//! Autotools configure/make/install invocation

use crate::environment::BuildEnvironment;
use h5pack_errors::{BuildError, Result};
use std::path::Path;

/// Drives the conventional configure-script toolchain sequence
pub struct Autotools<'a> {
    env: &'a BuildEnvironment,
    jobs: usize,
}

impl<'a> Autotools<'a> {
    #[must_use]
    pub fn new(env: &'a BuildEnvironment, jobs: usize) -> Self {
        Self { env, jobs }
    }

    /// Run `./configure` in the source tree with the derived flag list
    ///
    /// # Errors
    ///
    /// Returns `BuildError::ConfigureFailed` on a non-zero exit.
    pub async fn configure(&self, source_dir: &Path, args: &[String]) -> Result<()> {
        let mut cmd_line = "./configure".to_string();
        for arg in args {
            cmd_line.push(' ');
            cmd_line.push_str(arg);
        }

        let result = self
            .env
            .execute("sh", &["-c", &cmd_line], Some(source_dir))
            .await?;

        if !result.success {
            return Err(BuildError::ConfigureFailed {
                message: tail(&result.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// Run `make -jN`
    ///
    /// # Errors
    ///
    /// Returns `BuildError::CompileFailed` on a non-zero exit.
    pub async fn make(&self, source_dir: &Path) -> Result<()> {
        let jobs_arg = format!("-j{}", self.jobs);
        let result = self
            .env
            .execute("make", &[jobs_arg.as_str()], Some(source_dir))
            .await?;

        if !result.success {
            return Err(BuildError::CompileFailed {
                message: tail(&result.stderr),
            }
            .into());
        }
        Ok(())
    }

    /// Run `make install` into the configured prefix
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InstallFailed` on a non-zero exit.
    pub async fn install(&self, source_dir: &Path) -> Result<()> {
        let result = self
            .env
            .execute("make", &["install"], Some(source_dir))
            .await?;

        if !result.success {
            return Err(BuildError::InstallFailed {
                message: tail(&result.stderr),
            }
            .into());
        }
        Ok(())
    }
}

/// Last lines of a command's stderr, enough to identify the failure
fn tail(stderr: &str) -> String {
    const KEEP: usize = 20;
    let lines: Vec<&str> = stderr.lines().collect();
    if lines.len() <= KEEP {
        stderr.trim_end().to_string()
    } else {
        lines[lines.len() - KEEP..].join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn shell_env() -> BuildEnvironment {
        BuildEnvironment::from_vars(HashMap::from([(
            "PATH".to_string(),
            "/usr/bin:/bin".to_string(),
        )]))
    }

    #[tokio::test]
    async fn configure_runs_the_script_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        // fake configure recording its arguments
        std::fs::write(
            dir.path().join("configure"),
            "#!/bin/sh\necho \"$@\" > args.txt\n",
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                dir.path().join("configure"),
                std::fs::Permissions::from_mode(0o755),
            )
            .unwrap();
        }

        let env = shell_env();
        let toolchain = Autotools::new(&env, 2);
        toolchain
            .configure(
                dir.path(),
                &["--prefix=/tmp/x".to_string(), "--enable-hl".to_string()],
            )
            .await
            .unwrap();

        let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(recorded.trim(), "--prefix=/tmp/x --enable-hl");
    }

    #[tokio::test]
    async fn configure_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("configure"),
            "#!/bin/sh\necho 'checking zlib... no' >&2\nexit 1\n",
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                dir.path().join("configure"),
                std::fs::Permissions::from_mode(0o755),
            )
            .unwrap();
        }

        let env = shell_env();
        let toolchain = Autotools::new(&env, 1);
        let err = toolchain.configure(dir.path(), &[]).await.unwrap_err();
        assert!(err.to_string().contains("configure failed"));
    }

    #[test]
    fn tail_keeps_short_output_whole() {
        assert_eq!(tail("a\nb\n"), "a\nb");
    }
}
