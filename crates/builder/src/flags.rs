//! Configure flag derivation
//!
//! The flag sequence and the environment delta are pure functions of
//! (options, settings, prefix, inherited environment); identical inputs
//! always produce identical output.

use crate::environment::BuildEnvironment;
use h5pack_types::{Options, Settings};
use std::path::Path;

/// Linker flag making installed binaries find their libraries relative
/// to their own location on Linux
pub const ORIGIN_RPATH_FLAG: &str = "-Wl,-rpath='$ORIGIN/../lib'";

/// Derive the ordered configure argument list
#[must_use]
pub fn configure_args(options: Options, settings: &Settings, prefix: &Path) -> Vec<String> {
    let mut args = vec![
        format!("--prefix={}", prefix.display()),
        "--enable-hl".to_string(),
        "--disable-sharedlib-rpath".to_string(),
    ];

    if settings.build_type.is_debug() {
        args.push("--enable-build-mode=debug".to_string());
    }

    if options.cxx {
        args.push("--enable-cxx".to_string());
    }

    if options.shared {
        args.push("--enable-shared".to_string());
        args.push("--disable-static".to_string());
    } else {
        args.push("--disable-shared".to_string());
        args.push("--enable-static".to_string());
    }

    if options.parallel {
        args.push("--enable-parallel".to_string());
    }

    args
}

/// Apply the option-dependent environment mutations
///
/// Parallel builds default `CC`/`CXX` to the MPI compiler wrappers when
/// the user has not set them; Linux shared builds append the `$ORIGIN`
/// rpath flag to `LDFLAGS`, preserving any prior value.
pub fn apply_build_env(options: Options, settings: &Settings, env: &mut BuildEnvironment) {
    if options.parallel {
        let mpicc = env.get("MPICC").unwrap_or("mpicc").to_string();
        let mpicxx = env.get("MPICXX").unwrap_or("mpic++").to_string();
        env.set_default("CC", mpicc);
        env.set_default("CXX", mpicxx);
    }

    if settings.os.is_linux() && options.shared {
        env.append_ldflags(ORIGIN_RPATH_FLAG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h5pack_types::{Arch, BuildType, Os};
    use std::collections::HashMap;

    fn settings(os: Os, build_type: BuildType) -> Settings {
        Settings {
            os,
            arch: Arch::X86_64,
            build_type,
            compiler: None,
        }
    }

    #[test]
    fn shared_and_static_flags_are_exclusive() {
        let shared = configure_args(
            Options {
                cxx: false,
                shared: true,
                parallel: false,
            },
            &settings(Os::Linux, BuildType::Release),
            Path::new("/tmp/prefix"),
        );
        assert!(shared.contains(&"--enable-shared".to_string()));
        assert!(shared.contains(&"--disable-static".to_string()));
        assert!(!shared.contains(&"--disable-shared".to_string()));
        assert!(!shared.contains(&"--enable-static".to_string()));

        let static_ = configure_args(
            Options {
                cxx: false,
                shared: false,
                parallel: false,
            },
            &settings(Os::Linux, BuildType::Release),
            Path::new("/tmp/prefix"),
        );
        assert!(static_.contains(&"--disable-shared".to_string()));
        assert!(static_.contains(&"--enable-static".to_string()));
        assert!(!static_.contains(&"--enable-shared".to_string()));
    }

    #[test]
    fn flag_derivation_is_deterministic() {
        let options = Options::default();
        let s = settings(Os::Macos, BuildType::Debug);
        let a = configure_args(options, &s, Path::new("/work/install"));
        let b = configure_args(options, &s, Path::new("/work/install"));
        assert_eq!(a, b);
    }

    #[test]
    fn debug_build_mode_flag() {
        let args = configure_args(
            Options::default(),
            &settings(Os::Linux, BuildType::Debug),
            Path::new("/p"),
        );
        assert!(args.contains(&"--enable-build-mode=debug".to_string()));

        let args = configure_args(
            Options::default(),
            &settings(Os::Linux, BuildType::Release),
            Path::new("/p"),
        );
        assert!(!args.contains(&"--enable-build-mode=debug".to_string()));
    }

    #[test]
    fn parallel_defaults_mpi_compilers_when_unset() {
        let mut env = BuildEnvironment::from_vars(HashMap::new());
        apply_build_env(
            Options {
                cxx: false,
                shared: false,
                parallel: true,
            },
            &settings(Os::Linux, BuildType::Release),
            &mut env,
        );
        assert_eq!(env.get("CC"), Some("mpicc"));
        assert_eq!(env.get("CXX"), Some("mpic++"));
    }

    #[test]
    fn parallel_respects_user_mpi_wrappers() {
        let mut env = BuildEnvironment::from_vars(HashMap::from([(
            "MPICC".to_string(),
            "/opt/mpi/bin/mpicc".to_string(),
        )]));
        apply_build_env(
            Options {
                cxx: false,
                shared: false,
                parallel: true,
            },
            &settings(Os::Linux, BuildType::Release),
            &mut env,
        );
        assert_eq!(env.get("CC"), Some("/opt/mpi/bin/mpicc"));
        assert_eq!(env.get("CXX"), Some("mpic++"));
    }

    #[test]
    fn linux_shared_appends_origin_rpath_after_prior_ldflags() {
        let mut env = BuildEnvironment::from_vars(HashMap::from([(
            "LDFLAGS".to_string(),
            "-L/custom/lib".to_string(),
        )]));
        apply_build_env(
            Options::default(),
            &settings(Os::Linux, BuildType::Release),
            &mut env,
        );
        assert_eq!(
            env.get("LDFLAGS"),
            Some("-L/custom/lib -Wl,-rpath='$ORIGIN/../lib'")
        );
    }

    #[test]
    fn no_rpath_flag_off_linux_or_for_static() {
        let mut env = BuildEnvironment::from_vars(HashMap::new());
        apply_build_env(
            Options::default(),
            &settings(Os::Macos, BuildType::Release),
            &mut env,
        );
        assert_eq!(env.get("LDFLAGS"), None);

        let mut env = BuildEnvironment::from_vars(HashMap::new());
        apply_build_env(
            Options {
                cxx: true,
                shared: false,
                parallel: false,
            },
            &settings(Os::Linux, BuildType::Release),
            &mut env,
        );
        assert_eq!(env.get("LDFLAGS"), None);
    }
}
