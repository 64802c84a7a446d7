//! Environment-derived build settings
//!
//! Settings are not toggled per-package; they describe the platform and
//! toolchain the build runs against.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Macos,
    Windows,
    Freebsd,
}

impl Os {
    /// Detect the host operating system
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "freebsd") {
            Self::Freebsd
        } else {
            Self::Linux
        }
    }

    #[must_use]
    pub fn is_linux(self) -> bool {
        self == Self::Linux
    }

    #[must_use]
    pub fn is_macos(self) -> bool {
        self == Self::Macos
    }

    #[must_use]
    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Freebsd => write!(f, "freebsd"),
        }
    }
}

/// Target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm64,
    X86_64,
}

impl Arch {
    /// Detect the host architecture
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else {
            Self::X86_64
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arm64 => write!(f, "arm64"),
            Self::X86_64 => write!(f, "x86_64"),
        }
    }
}

/// Build type selecting the configure build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Release,
    Debug,
}

impl BuildType {
    #[must_use]
    pub fn is_debug(self) -> bool {
        self == Self::Debug
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => write!(f, "release"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// Complete settings tuple supplied by the invoking environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub arch: Arch,
    #[serde(default)]
    pub build_type: BuildType,
    /// Compiler identifier, informational only; the toolchain is chosen
    /// through CC/CXX at invocation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
}

impl Settings {
    /// Settings for the host platform with a release build type
    #[must_use]
    pub fn host() -> Self {
        Self {
            os: Os::current(),
            arch: Arch::current(),
            build_type: BuildType::Release,
            compiler: None,
        }
    }

    #[must_use]
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::host()
    }
}
