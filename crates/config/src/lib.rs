#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for h5pack
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (h5pack.toml)
//! - Environment variables
//! - CLI flags (applied by the binary, highest precedence)

use h5pack_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default upstream release archive URL template
///
/// Placeholders: `{series}` (major.minor), `{version}` (full version).
pub const DEFAULT_URL_TEMPLATE: &str = "https://support.hdfgroup.org/ftp/HDF5/releases/\
hdf5-{series}/hdf5-{version}/src/hdf5-{version}.tar.gz";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// Source acquisition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// Optional sha256 of the source tarball; verified when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_jobs")]
    pub jobs: usize, // 0 = auto-detect
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Scratch directory for download, extraction, and staging
    pub work_path: Option<PathBuf>,
    /// Final package layout root
    pub package_path: Option<PathBuf>,
}

// Default implementations

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            sha256: None,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: 0, // 0 = auto-detect
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes
            retries: 3,
            retry_delay: 1, // 1 second
        }
    }
}

// Default value functions for serde
fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_build_jobs() -> usize {
    0 // 0 = auto-detect
}

fn default_timeout() -> u64 {
    300 // 5 minutes
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1 // 1 second
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from an optional path, falling back to defaults
    ///
    /// When no path is given, `h5pack.toml` in the current directory is
    /// used if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => {
                let local = Path::new("h5pack.toml");
                if local.exists() {
                    Self::load_from_file(local).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // H5PACK_URL_TEMPLATE
        if let Ok(template) = std::env::var("H5PACK_URL_TEMPLATE") {
            self.source.url_template = template;
        }

        // H5PACK_SHA256
        if let Ok(sha256) = std::env::var("H5PACK_SHA256") {
            self.source.sha256 = Some(sha256);
        }

        // H5PACK_BUILD_JOBS
        if let Ok(jobs) = std::env::var("H5PACK_BUILD_JOBS") {
            self.build.jobs = jobs.parse().map_err(|_| ConfigError::InvalidValue {
                field: "H5PACK_BUILD_JOBS".to_string(),
                value: jobs,
            })?;
        }

        // H5PACK_NETWORK_RETRIES
        if let Ok(retries) = std::env::var("H5PACK_NETWORK_RETRIES") {
            self.network.retries = retries.parse().map_err(|_| ConfigError::InvalidValue {
                field: "H5PACK_NETWORK_RETRIES".to_string(),
                value: retries,
            })?;
        }

        Ok(())
    }

    /// Get the work path (with default)
    #[must_use]
    pub fn work_path(&self) -> PathBuf {
        self.paths
            .work_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("build"))
    }

    /// Get the package path (with default)
    #[must_use]
    pub fn package_path(&self) -> PathBuf {
        self.paths
            .package_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("package"))
    }

    /// Expand the source URL template for a version string
    #[must_use]
    pub fn source_url(&self, version: &str) -> String {
        let series = version
            .splitn(3, '.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".");
        self.source
            .url_template
            .replace("{series}", &series)
            .replace("{version}", version)
    }
}

/// Calculate build jobs based on CPU count
#[must_use]
pub fn calculate_build_jobs(config_value: usize) -> usize {
    if config_value > 0 {
        config_value // User override
    } else {
        // Use 75% of CPUs for builds, minimum 1
        let cpus = num_cpus::get();
        (cpus * 3 / 4).max(1)
    }
}
