//! Explicit build environment threaded through phases
//!
//! The variable map is an owned structure applied to child processes via
//! `Command::envs`. The driver's own process environment is never mutated
//! between phases; the toolchain still observes the same variables at
//! invocation time.

use h5pack_errors::{BuildError, Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Variables inherited from the invoking process
const INHERITED_VARS: &[&str] = &[
    "PATH", "HOME", "USER", "SHELL", "TERM", "LANG", "LC_ALL", "TMPDIR", "CC", "CXX", "MPICC",
    "MPICXX", "CFLAGS", "CXXFLAGS", "CPPFLAGS", "LDFLAGS",
];

/// Result of one executed toolchain command
#[derive(Debug, Clone)]
pub struct BuildCommandResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Environment variable map for toolchain invocations
#[derive(Debug, Clone, Default)]
pub struct BuildEnvironment {
    env_vars: HashMap<String, String>,
}

impl BuildEnvironment {
    /// Seed the environment from the invoking process
    #[must_use]
    pub fn new() -> Self {
        let mut env_vars = HashMap::new();
        for var in INHERITED_VARS {
            if let Ok(value) = std::env::var(var) {
                env_vars.insert((*var).to_string(), value);
            }
        }
        Self { env_vars }
    }

    /// Construct from an explicit variable map (used by tests)
    #[must_use]
    pub fn from_vars(env_vars: HashMap<String, String>) -> Self {
        Self { env_vars }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.env_vars.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env_vars.insert(key.into(), value.into());
    }

    /// Set a variable only when it is currently absent
    pub fn set_default(&mut self, key: &str, value: impl Into<String>) {
        if !self.env_vars.contains_key(key) {
            self.env_vars.insert(key.to_string(), value.into());
        }
    }

    /// Append a linker flag to `LDFLAGS`, preserving any prior value
    ///
    /// The prior value comes first, then a single space, then the flag.
    pub fn append_ldflags(&mut self, flag: &str) {
        let prior = self.env_vars.get("LDFLAGS").cloned().unwrap_or_default();
        self.env_vars
            .insert("LDFLAGS".to_string(), format!("{prior} {flag}"));
    }

    #[must_use]
    pub fn env_vars(&self) -> &HashMap<String, String> {
        &self.env_vars
    }

    /// Execute a command with this environment applied
    ///
    /// Returns the captured result; a non-zero exit is reported in the
    /// result, not as an error, so callers map it to their phase error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the command cannot be spawned at all.
    pub async fn execute(
        &self,
        program: &str,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<BuildCommandResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.env_clear();
        cmd.envs(&self.env_vars);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        debug!(program, args = args.join(" "), "executing");

        let output = cmd.output().await.map_err(|e| {
            Error::from(BuildError::Failed {
                message: format!("{program}: {e}"),
            })
        })?;

        Ok(BuildCommandResult {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Execute a command, discarding the outcome entirely
    ///
    /// Used by the advisory post-processing steps where neither a spawn
    /// failure nor a non-zero exit may block the remaining work.
    pub async fn execute_unchecked(&self, program: &str, args: &[&str], working_dir: Option<&Path>) {
        match self.execute(program, args, working_dir).await {
            Ok(result) if !result.success => {
                debug!(program, exit_code = ?result.exit_code, "advisory command failed");
            }
            Err(e) => {
                debug!(program, error = %e, "advisory command could not run");
            }
            Ok(_) => {}
        }
    }
}
