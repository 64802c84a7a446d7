#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Recipe driver for building and packaging HDF5
//!
//! Sequences the five lifecycle phases: requirements resolution,
//! configuration validation, source acquisition, build & install, and
//! packaging. Execution is strictly sequential; the only mutable state
//! shared between phases is the [`BuildEnvironment`] variable map, which
//! is materialized onto child processes at spawn time instead of mutating
//! the process-global environment.

pub mod autotools;
pub mod environment;
pub mod flags;
pub mod packaging;
pub mod patch;
pub mod requirements;
pub mod rpath;
pub mod source;

use h5pack_config::Config;
use h5pack_errors::{Error, Result};
use h5pack_net::NetClient;
use h5pack_types::{PackageInfo, Recipe};
use std::path::PathBuf;
use tracing::info;

pub use environment::{BuildCommandResult, BuildEnvironment};

/// Directory layout for one build invocation
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Scratch root for download, extraction, and staging
    pub work_dir: PathBuf,
    /// Extracted source tree (fixed name under the work dir)
    pub source_dir: PathBuf,
    /// Staging install prefix written by `make install`
    pub staging_dir: PathBuf,
    /// Final package layout root
    pub package_dir: PathBuf,
}

impl BuildPaths {
    /// Derive the build layout from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let work_dir = config.work_path();
        Self {
            source_dir: work_dir.join(h5pack_types::recipe::SOURCE_SUBFOLDER),
            staging_dir: work_dir.join("install"),
            package_dir: config.package_path(),
            work_dir,
        }
    }
}

/// Everything one build invocation needs
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub recipe: Recipe,
    pub config: Config,
    pub paths: BuildPaths,
}

impl BuildContext {
    #[must_use]
    pub fn new(recipe: Recipe, config: Config) -> Self {
        let paths = BuildPaths::from_config(&config);
        Self {
            recipe,
            config,
            paths,
        }
    }
}

/// The recipe driver
pub struct Builder {
    net: NetClient,
}

impl Builder {
    #[must_use]
    pub fn new(net: NetClient) -> Self {
        Self { net }
    }

    /// Run the full pipeline for one recipe
    ///
    /// # Errors
    ///
    /// Returns a configuration error for incompatible options, or a build
    /// error when requirements cannot be resolved or any toolchain step
    /// exits non-zero. The two advisory post-install touches (compiler
    /// wrapper patch, rpath injection) never fail the build.
    pub async fn build(&self, ctx: &BuildContext) -> Result<PackageInfo> {
        let recipe = &ctx.recipe;

        // Fail fast on incompatible options, before any other phase.
        recipe.validate().map_err(Error::from)?;

        let resolved = requirements::resolve(&recipe.requirements()).await?;
        for dep in &resolved {
            info!(name = %dep.name, version = %dep.version, "resolved requirement");
        }

        source::acquire(recipe, &ctx.config, &self.net, &ctx.paths).await?;

        let mut env = BuildEnvironment::new();
        flags::apply_build_env(recipe.options, &recipe.settings, &mut env);
        let args = flags::configure_args(recipe.options, &recipe.settings, &ctx.paths.staging_dir);

        let jobs = h5pack_config::calculate_build_jobs(ctx.config.build.jobs);
        let toolchain = autotools::Autotools::new(&env, jobs);
        toolchain.configure(&ctx.paths.source_dir, &args).await?;
        toolchain.make(&ctx.paths.source_dir).await?;
        toolchain.install(&ctx.paths.source_dir).await?;

        patch::patch_compiler_wrapper(&ctx.paths.staging_dir, recipe.options.parallel).await;

        if recipe.settings.os.is_macos() && recipe.options.shared {
            rpath::add_rpath_to_executables(&env, &ctx.paths.staging_dir.join("bin")).await;
        }

        packaging::package(&ctx.paths.staging_dir, &ctx.paths.source_dir, &ctx.paths.package_dir)
            .await?;

        info!(package = %ctx.paths.package_dir.display(), "package assembled");
        Ok(PackageInfo::new(recipe.options, recipe.settings.os))
    }
}
