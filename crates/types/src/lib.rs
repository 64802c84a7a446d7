#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared types for the h5pack recipe driver
//!
//! Defines the recipe data model (options, settings, requirements),
//! version constraints, and the package metadata export surface.

pub mod package;
pub mod recipe;
pub mod settings;
pub mod version;

pub use package::PackageInfo;
pub use recipe::{Options, Recipe, Requirement};
pub use settings::{Arch, BuildType, Os, Settings};
pub use version::{VersionConstraint, VersionSpec};
