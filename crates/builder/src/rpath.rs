//! Runtime search path injection for installed executables
//!
//! On macOS, shared libraries are located through install names; the
//! installed tools need an `@executable_path`-relative search path so
//! they load the packaged libraries without absolute paths baked in at
//! build time. Each `install_name_tool` invocation is advisory: its exit
//! status is ignored and one failure never blocks the rest.

use crate::environment::BuildEnvironment;
use std::path::Path;
use tracing::debug;

/// Executables installed by the upstream build, patched one by one
pub const EXECUTABLES: &[&str] = &[
    "gif2h5",
    "h52gif",
    "h5clear",
    "h5copy",
    "h5debug",
    "h5diff",
    "h5dump",
    "h5format_convert",
    "h5import",
    "h5jam",
    "h5ls",
    "h5mkgrp",
    "h5perf_serial",
    "h5repack",
    "h5repart",
    "h5stat",
    "h5unjam",
    "h5watch",
];

/// Add a library search path relative to each executable's own location
///
/// The working directory is scoped per spawned command; the driver's own
/// current directory is never changed.
pub async fn add_rpath_to_executables(env: &BuildEnvironment, bin_dir: &Path) {
    debug!(bin_dir = %bin_dir.display(), "injecting @executable_path rpaths");
    for exe in EXECUTABLES {
        env.execute_unchecked(
            "install_name_tool",
            &["-add_rpath", "@executable_path/../lib", exe],
            Some(bin_dir),
        )
        .await;
    }
}
