//! Command line interface definition

use clap::{Parser, Subcommand};
use h5pack_types::{Arch, BuildType, Os};
use std::path::PathBuf;

/// h5pack - build and packaging driver for the HDF5 libraries
#[derive(Parser)]
#[command(name = "h5pack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and packaging driver for the HDF5 libraries")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Per-recipe option toggles shared by the build and info commands
#[derive(Parser)]
pub struct OptionArgs {
    /// Skip the C++ bindings library
    #[arg(long)]
    pub no_cxx: bool,

    /// Build static libraries instead of shared ones
    #[arg(long = "static")]
    pub static_libs: bool,

    /// Build with parallel (MPI) support
    #[arg(long)]
    pub parallel: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download, build, install, and package one HDF5 version
    #[command(alias = "b")]
    Build {
        /// Upstream version to build (e.g. 1.12.2)
        version: String,

        #[command(flatten)]
        options: OptionArgs,

        /// Build mode passed to configure
        #[arg(long, value_enum, default_value_t = BuildType::Release)]
        build_type: BuildType,

        /// Target operating system (defaults to the host)
        #[arg(long, value_enum)]
        os: Option<Os>,

        /// Target architecture (defaults to the host)
        #[arg(long, value_enum)]
        arch: Option<Arch>,

        /// Number of parallel build jobs (0=auto)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Scratch directory for download, extraction, and staging
        #[arg(long, value_name = "PATH")]
        work_dir: Option<PathBuf>,

        /// Output directory for the package layout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Override the source archive URL template
        #[arg(long, value_name = "TEMPLATE")]
        url_template: Option<String>,

        /// Expected sha256 of the source archive
        #[arg(long, value_name = "HEX")]
        sha256: Option<String>,
    },

    /// Show the package metadata an option set would export
    Info {
        #[command(flatten)]
        options: OptionArgs,
    },
}

impl OptionArgs {
    /// Translate the CLI toggles into recipe options
    #[must_use]
    pub fn to_options(&self) -> h5pack_types::Options {
        h5pack_types::Options {
            cxx: !self.no_cxx,
            shared: !self.static_libs,
            parallel: self.parallel,
        }
    }
}
