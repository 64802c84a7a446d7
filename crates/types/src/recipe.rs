//! The HDF5 recipe: identity, options, and dependency declarations

use crate::settings::Settings;
use crate::version::VersionSpec;
use h5pack_errors::ConfigError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed working directory name the versioned source tree is renamed to
pub const SOURCE_SUBFOLDER: &str = "hdf5";

/// User-toggleable boolean build options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Build the C++ bindings library
    pub cxx: bool,
    /// Build shared libraries instead of static ones
    pub shared: bool,
    /// Build with parallel (MPI) support
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cxx: true,
            shared: true,
            parallel: false,
        }
    }
}

impl Options {
    /// Validate option compatibility before any build work starts
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::IncompatibleOptions` when both `cxx` and
    /// `parallel` are enabled; the upstream build system rejects that
    /// combination.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cxx && self.parallel {
            return Err(ConfigError::IncompatibleOptions {
                first: "cxx".to_string(),
                second: "parallel".to_string(),
            });
        }
        Ok(())
    }
}

/// A declared external dependency with its version constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub spec: VersionSpec,
    /// Whether the dependency is consumed as a static artifact
    pub static_link: bool,
}

/// The complete build/package specification for one HDF5 version
///
/// Constructed fresh per invocation; nothing persists across builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub version: Version,
    pub description: String,
    pub license: String,
    pub options: Options,
    pub settings: Settings,
}

impl Recipe {
    /// The HDF5 recipe for a given upstream version
    #[must_use]
    pub fn hdf5(version: Version, options: Options, settings: Settings) -> Self {
        Self {
            name: "hdf5".to_string(),
            version,
            description: "HDF5 C and C++ libraries".to_string(),
            license: "https://support.hdfgroup.org/ftp/HDF5/releases/COPYING".to_string(),
            options,
            settings,
        }
    }

    /// External dependencies that must resolve before configuration
    ///
    /// # Panics
    ///
    /// Never panics; the constraint literal is well-formed.
    #[must_use]
    pub fn requirements(&self) -> Vec<Requirement> {
        vec![Requirement {
            name: "zlib".to_string(),
            spec: VersionSpec::from_str(">=1.2").expect("static constraint"),
            static_link: true,
        }]
    }

    /// Validate the option combination (fail fast, before acquisition)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::IncompatibleOptions` for the cxx/parallel
    /// combination.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }

    /// Archive directory name produced by extraction (`<name>-<version>`)
    #[must_use]
    pub fn versioned_dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}
